//! Seedable Gaussian noise for motion and sensor simulation.

use crate::covariance::MotionCovariance;
use nalgebra as na;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Owns the random generator used to perturb a single trajectory.
///
/// Every simulator gets its own generator so independent trajectories never
/// share random state.
#[derive(Debug, Clone)]
pub struct NoiseGenerator<R = StdRng> {
    rng: R,
}

impl NoiseGenerator<StdRng> {
    /// Deterministic generator, same seed gives the same stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> NoiseGenerator<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Zero mean Gaussian with the given standard deviation.
    pub fn gaussian(&mut self, std_dev: f64) -> f64 {
        let n: f64 = self.rng.sample(StandardNormal);
        n * std_dev
    }

    /// Draws `ε ~ N(0, covariance)`.
    ///
    /// Always consumes three normal draws. A zero variance gives an exact zero
    /// for that axis.
    pub fn sample(&mut self, covariance: &MotionCovariance) -> na::Vector3<f64> {
        let std_devs = covariance.std_devs();
        na::Vector3::new(
            self.gaussian(std_devs.x),
            self.gaussian(std_devs.y),
            self.gaussian(std_devs.z),
        )
    }
}
