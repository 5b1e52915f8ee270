#![doc = include_str!("../README.md")]
pub mod configuration;
pub mod covariance;
pub mod driving;
pub mod error;
pub mod laser;
pub mod logging;
pub mod noise;
pub mod pose;
pub mod simulator;
pub mod trials;
pub mod visualization;

pub use covariance::{estimate_covariance, MotionCovariance};
pub use error::MotionError;
pub use pose::{Increment, Pose2d};
pub use simulator::{MotionModel, MotionSimulator, NoisyMotionSimulator};
