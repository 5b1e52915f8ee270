//! Simulated planar laser range finder.
//!
//! Beams are cast against a map made of a single polyline. Readings are
//! expressed in the sensor frame as (range, angle) pairs.

use crate::error::{MotionError, Result};
use crate::noise::NoiseGenerator;
use crate::pose::Pose2d;
use nalgebra as na;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

const PARALLEL_EPSILON: f64 = 1e-12;
/// Hits this close past a segment end still count, so beams aimed at a vertex
/// shared by two segments cannot slip between them.
const CORNER_TOLERANCE: f64 = 0.05;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LaserConfig {
    /// Field of view in radians, centered on the sensor heading.
    pub fov: f64,
    /// Angle between consecutive beams in radians.
    pub resolution: f64,
    pub max_distance: f64,
    /// Variances of range and angle noise.
    #[serde(default)]
    pub noise: [f64; 2],
    /// Sensor pose in the robot frame.
    #[serde(default)]
    pub mount: Pose2d,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaserReading {
    pub range: f64,
    pub angle: f64,
}

impl LaserReading {
    /// World position of the measured point when taken from `sensor_pose`.
    pub fn to_world(&self, sensor_pose: &Pose2d) -> na::Point2<f64> {
        let heading = sensor_pose.theta + self.angle;
        sensor_pose.position() + na::Vector2::new(heading.cos(), heading.sin()) * self.range
    }
}

#[derive(Debug, Clone)]
pub struct Laser2d {
    fov: f64,
    resolution: f64,
    max_distance: f64,
    range_std: f64,
    angle_std: f64,
    mount: Pose2d,
    pose: Pose2d,
}

impl Laser2d {
    pub fn new(config: &LaserConfig) -> Result<Self> {
        let positive = [
            ("fov", config.fov),
            ("resolution", config.resolution),
            ("max_distance", config.max_distance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(MotionError::InvalidSensor(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let [range_var, angle_var] = config.noise;
        if !(range_var.is_finite() && range_var >= 0.0 && angle_var.is_finite() && angle_var >= 0.0)
        {
            return Err(MotionError::InvalidCovariance(format!(
                "laser noise variances must be finite and non-negative, got {:?}",
                config.noise
            )));
        }
        Ok(Self {
            fov: config.fov,
            resolution: config.resolution,
            max_distance: config.max_distance,
            range_std: range_var.sqrt(),
            angle_std: angle_var.sqrt(),
            mount: config.mount,
            pose: config.mount,
        })
    }

    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose2d) {
        self.pose = pose;
    }

    /// Places the sensor on a robot standing at `robot_pose`.
    pub fn follow(&mut self, robot_pose: &Pose2d) {
        self.pose = robot_pose.compose(&self.mount.as_increment());
    }

    pub fn beam_count(&self) -> usize {
        (self.fov / self.resolution).floor() as usize + 1
    }

    fn beam_angle(&self, beam: usize) -> f64 {
        beam as f64 * self.resolution - self.fov / 2.0
    }

    /// Distance along a beam to the closest map segment, capped at the
    /// maximum range.
    fn cast(&self, heading: f64, map: &[na::Point2<f64>]) -> f64 {
        let origin = self.pose.position();
        let direction = na::Vector2::new(heading.cos(), heading.sin());
        map.windows(2)
            .filter_map(|segment| {
                let edge = segment[1] - segment[0];
                let denominator = cross(&direction, &edge);
                if denominator.abs() < PARALLEL_EPSILON {
                    return None;
                }
                let offset = segment[0] - origin;
                let distance = cross(&offset, &edge) / denominator;
                let along_segment = cross(&offset, &direction) / denominator;
                let slack = CORNER_TOLERANCE / edge.norm();
                (distance >= 0.0 && (-slack..=1.0 + slack).contains(&along_segment))
                    .then_some(distance)
            })
            .fold(self.max_distance, f64::min)
    }

    pub fn take_observation<R: Rng>(
        &self,
        map: &[na::Point2<f64>],
        noise: &mut NoiseGenerator<R>,
    ) -> Vec<LaserReading> {
        let readings: Vec<LaserReading> = (0..self.beam_count())
            .map(|beam| {
                let angle = self.beam_angle(beam);
                let range = self.cast(self.pose.theta + angle, map);
                LaserReading {
                    range: range + noise.gaussian(self.range_std),
                    angle: angle + noise.gaussian(self.angle_std),
                }
            })
            .collect();
        trace!(beams = readings.len(), pose = %self.pose, "Laser observation");
        readings
    }
}

fn cross(a: &na::Vector2<f64>, b: &na::Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
