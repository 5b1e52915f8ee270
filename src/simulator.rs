use crate::covariance::MotionCovariance;
use crate::error::Result;
use crate::noise::NoiseGenerator;
use crate::pose::{Increment, Pose2d};
use rand::{rngs::StdRng, Rng};
use tracing::trace;

/// Something that advances a pose estimate by body-frame increments.
pub trait MotionModel {
    fn step(&mut self, increment: &Increment);

    /// Noise-free running estimate.
    fn expected_pose(&self) -> Pose2d;

    /// Pose actually reached. Equal to the expected pose for noiseless models.
    fn true_pose(&self) -> Pose2d {
        self.expected_pose()
    }

    fn is_noisy(&self) -> bool {
        false
    }
}

/// Noise-free dead reckoning.
#[derive(Debug, Clone)]
pub struct MotionSimulator {
    pose: Pose2d,
}

impl MotionSimulator {
    pub fn new(initial: Pose2d) -> Self {
        Self { pose: initial }
    }

    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    pub fn reset(&mut self, pose: Pose2d) {
        self.pose = pose;
    }
}

impl MotionModel for MotionSimulator {
    fn step(&mut self, increment: &Increment) {
        self.pose = self.pose.compose(increment);
    }

    fn expected_pose(&self) -> Pose2d {
        self.pose
    }
}

/// Dead reckoning with Gaussian process noise on every increment.
///
/// The expected trajectory ignores the noise and only depends on the commanded
/// increments. The true trajectory composes `increment + ε` with
/// `ε ~ N(0, covariance)`.
#[derive(Debug, Clone)]
pub struct NoisyMotionSimulator<R = StdRng> {
    expected: MotionSimulator,
    true_pose: Pose2d,
    covariance: MotionCovariance,
    noise: NoiseGenerator<R>,
}

impl NoisyMotionSimulator<StdRng> {
    pub fn with_seed(initial: Pose2d, covariance: MotionCovariance, seed: u64) -> Self {
        Self::new(initial, covariance, NoiseGenerator::seeded(seed))
    }

    /// Validates the variances and builds a seeded simulator.
    pub fn from_variances(initial: Pose2d, variances: [f64; 3], seed: u64) -> Result<Self> {
        let covariance = MotionCovariance::from_diagonal(variances)?;
        Ok(Self::with_seed(initial, covariance, seed))
    }
}

impl<R: Rng> NoisyMotionSimulator<R> {
    pub fn new(initial: Pose2d, covariance: MotionCovariance, noise: NoiseGenerator<R>) -> Self {
        Self {
            expected: MotionSimulator::new(initial),
            true_pose: initial,
            covariance,
            noise,
        }
    }

    pub fn covariance(&self) -> &MotionCovariance {
        &self.covariance
    }

    /// Puts both trajectories back on `pose`. The noise stream continues.
    pub fn reset(&mut self, pose: Pose2d) {
        self.expected.reset(pose);
        self.true_pose = pose;
    }
}

impl<R: Rng> MotionModel for NoisyMotionSimulator<R> {
    fn step(&mut self, increment: &Increment) {
        self.expected.step(increment);
        let noise = self.noise.sample(&self.covariance);
        let noisy_increment = increment.perturbed(&noise);
        self.true_pose = self.true_pose.compose(&noisy_increment);
        trace!(
            eps_x = noise.x,
            eps_y = noise.y,
            eps_theta = noise.z,
            "Applied noisy increment"
        );
    }

    fn expected_pose(&self) -> Pose2d {
        self.expected.pose()
    }

    fn true_pose(&self) -> Pose2d {
        self.true_pose
    }

    fn is_noisy(&self) -> bool {
        true
    }
}
