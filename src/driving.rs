use crate::pose::Increment;
use crate::simulator::MotionModel;
use crate::visualization::{PoseSink, PoseStyle};
use anyhow::Result;
use serde::Deserialize;
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SquarePathConfig {
    #[serde(default = "default_step_length")]
    pub step_length: f64,
    #[serde(default = "default_steps_per_side")]
    pub steps_per_side: usize,
    #[serde(default = "default_turn_angle")]
    pub turn_angle: f64,
}

fn default_step_length() -> f64 {
    2.0
}

fn default_steps_per_side() -> usize {
    4
}

fn default_turn_angle() -> f64 {
    -FRAC_PI_2
}

impl Default for SquarePathConfig {
    fn default() -> Self {
        Self {
            step_length: default_step_length(),
            steps_per_side: default_steps_per_side(),
            turn_angle: default_turn_angle(),
        }
    }
}

/// Endless stream of increments tracing a square: `steps_per_side` straight
/// moves followed by one turn in place.
#[derive(Debug, Clone)]
pub struct SquarePath {
    config: SquarePathConfig,
    step: usize,
}

impl SquarePath {
    pub fn new(config: SquarePathConfig) -> Self {
        Self { config, step: 0 }
    }

    /// Increment commanded at step counter `step`.
    pub fn increment_at(&self, step: usize) -> Increment {
        let cycle = self.config.steps_per_side + 1;
        if step % cycle == self.config.steps_per_side {
            Increment::turn(self.config.turn_angle)
        } else {
            Increment::straight(self.config.step_length)
        }
    }

    /// Increments needed to drive all four sides once.
    pub fn loop_length(&self) -> usize {
        4 * (self.config.steps_per_side + 1)
    }
}

impl Default for SquarePath {
    fn default() -> Self {
        Self::new(SquarePathConfig::default())
    }
}

impl Iterator for SquarePath {
    type Item = Increment;

    fn next(&mut self) -> Option<Increment> {
        let increment = self.increment_at(self.step);
        self.step += 1;
        Some(increment)
    }
}

/// Applies each increment to the model and draws the resulting poses.
///
/// The true pose is only drawn for noisy models.
pub fn drive<M, I, S>(model: &mut M, increments: I, sink: &mut S) -> Result<()>
where
    M: MotionModel + ?Sized,
    I: IntoIterator<Item = Increment>,
    S: PoseSink + ?Sized,
{
    for (step, increment) in increments.into_iter().enumerate() {
        model.step(&increment);
        let expected = model.expected_pose();
        sink.draw(&expected, PoseStyle::Expected)?;
        if model.is_noisy() {
            let true_pose = model.true_pose();
            sink.draw(&true_pose, PoseStyle::True)?;
            debug!(step, %expected, %true_pose, "Step");
        } else {
            debug!(step, %expected, "Step");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::MotionCovariance;
    use crate::pose::Pose2d;
    use crate::simulator::{MotionSimulator, NoisyMotionSimulator};
    use crate::visualization::TrajectoryRecorder;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn pattern_turns_after_each_side() {
        let path = SquarePath::default();
        let turns: Vec<usize> = (0..20)
            .filter(|step| path.increment_at(*step).is_turn())
            .collect();
        assert_eq!(turns, vec![4, 9, 14, 19]);
        assert_eq!(path.increment_at(0), Increment::straight(2.0));
        assert_eq!(path.increment_at(4), Increment::turn(-FRAC_PI_2));
        assert_eq!(path.loop_length(), 20);
    }

    #[test]
    fn full_loop_closes_square() {
        let start = Pose2d::new(0.0, 0.0, FRAC_PI_2);
        let mut simulator = MotionSimulator::new(start);
        let path = SquarePath::default();
        let length = path.loop_length();
        let mut recorder = TrajectoryRecorder::new();
        drive(&mut simulator, path.take(length), &mut recorder).unwrap();

        let end = simulator.pose();
        assert_relative_eq!(end.x, start.x, epsilon = 1e-9);
        assert_relative_eq!(end.y, start.y, epsilon = 1e-9);
        assert_relative_eq!(end.theta, start.theta - 2.0 * PI, epsilon = 1e-12);
        assert_eq!(recorder.expected().len(), 20);
        assert!(recorder.true_poses().is_empty());
    }

    #[test]
    fn fifteen_steps_stay_inside_square() {
        let mut simulator = MotionSimulator::new(Pose2d::new(0.0, 0.0, FRAC_PI_2));
        let mut recorder = TrajectoryRecorder::new();
        drive(&mut simulator, SquarePath::default().take(15), &mut recorder).unwrap();

        for pose in recorder.expected() {
            assert!(pose.x > -1e-9 && pose.x < 8.0 + 1e-9);
            assert!(pose.y > -1e-9 && pose.y < 8.0 + 1e-9);
            let quarter_turns = pose.theta / FRAC_PI_2;
            assert_relative_eq!(quarter_turns, quarter_turns.round(), epsilon = 1e-9);
        }
        let end = simulator.pose();
        assert_relative_eq!(end.x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn noisy_drive_draws_both_poses() {
        let covariance = MotionCovariance::new(0.04, 0.04, 0.01).unwrap();
        let mut simulator =
            NoisyMotionSimulator::with_seed(Pose2d::new(0.0, 0.0, FRAC_PI_2), covariance, 11);
        let mut recorder = TrajectoryRecorder::new();
        drive(&mut simulator, SquarePath::default().take(15), &mut recorder).unwrap();
        assert_eq!(recorder.expected().len(), 15);
        assert_eq!(recorder.true_poses().len(), 15);
        assert_eq!(recorder.true_poses()[14], simulator.true_pose());
    }

    #[test]
    fn custom_path_parameters() {
        let path = SquarePath::new(SquarePathConfig {
            step_length: 1.0,
            steps_per_side: 2,
            turn_angle: FRAC_PI_2,
        });
        let increments: Vec<Increment> = path.take(6).collect();
        assert_eq!(
            increments,
            vec![
                Increment::straight(1.0),
                Increment::straight(1.0),
                Increment::turn(FRAC_PI_2),
                Increment::straight(1.0),
                Increment::straight(1.0),
                Increment::turn(FRAC_PI_2),
            ]
        );
    }
}
