use crate::error::{MotionError, Result};
use crate::pose::Pose2d;
use nalgebra as na;
use serde::{Deserialize, Serialize};
use tracing::debug;

const AXES: [&str; 3] = ["x", "y", "theta"];

/// Diagonal 3x3 motion noise covariance.
///
/// Diagonal entries are finite and non-negative, off-diagonal entries are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct MotionCovariance {
    matrix: na::Matrix3<f64>,
}

impl MotionCovariance {
    pub fn new(var_x: f64, var_y: f64, var_theta: f64) -> Result<Self> {
        Self::from_diagonal([var_x, var_y, var_theta])
    }

    pub fn from_diagonal(variances: [f64; 3]) -> Result<Self> {
        for (axis, variance) in AXES.iter().zip(variances) {
            if !variance.is_finite() || variance < 0.0 {
                return Err(MotionError::InvalidCovariance(format!(
                    "variance of {} must be finite and non-negative, got {}",
                    axis, variance
                )));
            }
        }
        Ok(Self {
            matrix: na::Matrix3::from_diagonal(&na::Vector3::from(variances)),
        })
    }

    pub fn from_matrix(matrix: na::Matrix3<f64>) -> Result<Self> {
        for row in 0..3 {
            for col in 0..3 {
                if row != col && matrix[(row, col)] != 0.0 {
                    return Err(MotionError::InvalidCovariance(format!(
                        "cross-axis term ({}, {}) must be zero, got {}",
                        row,
                        col,
                        matrix[(row, col)]
                    )));
                }
            }
        }
        Self::from_diagonal(matrix.diagonal().into())
    }

    pub fn zeros() -> Self {
        Self {
            matrix: na::Matrix3::zeros(),
        }
    }

    pub fn matrix(&self) -> &na::Matrix3<f64> {
        &self.matrix
    }

    pub fn variances(&self) -> na::Vector3<f64> {
        self.matrix.diagonal()
    }

    pub fn std_devs(&self) -> na::Vector3<f64> {
        self.variances().map(f64::sqrt)
    }

    pub fn is_zero(&self) -> bool {
        self.matrix.iter().all(|value| *value == 0.0)
    }
}

impl Default for MotionCovariance {
    fn default() -> Self {
        Self::zeros()
    }
}

impl TryFrom<[f64; 3]> for MotionCovariance {
    type Error = MotionError;

    fn try_from(variances: [f64; 3]) -> Result<Self> {
        Self::from_diagonal(variances)
    }
}

impl From<MotionCovariance> for [f64; 3] {
    fn from(covariance: MotionCovariance) -> Self {
        covariance.variances().into()
    }
}

const MIN_SAMPLES: usize = 2;

fn check_sample_count(samples: &[Pose2d]) -> Result<()> {
    if samples.len() < MIN_SAMPLES {
        return Err(MotionError::InsufficientData {
            required: MIN_SAMPLES,
            provided: samples.len(),
        });
    }
    Ok(())
}

/// Per-axis mean of the samples.
pub fn sample_mean(samples: &[Pose2d]) -> Result<Pose2d> {
    check_sample_count(samples)?;
    let sum = samples
        .iter()
        .fold(na::Vector3::zeros(), |sum, pose| sum + pose.to_vector());
    Ok(Pose2d::from_vector(&(sum / samples.len() as f64)))
}

/// Estimates a diagonal motion covariance from repeated observations of the
/// same commanded motion.
///
/// Each axis gets its population variance (sum of squared deviations divided
/// by `n`). Cross-axis correlation is not modelled.
pub fn estimate_covariance(samples: &[Pose2d]) -> Result<MotionCovariance> {
    let mean = sample_mean(samples)?.to_vector();
    let squared_deviations = samples.iter().fold(na::Vector3::zeros(), |sum, pose| {
        let deviation = pose.to_vector() - mean;
        sum + deviation.component_mul(&deviation)
    });
    let variances = squared_deviations / samples.len() as f64;
    debug!(
        samples = samples.len(),
        var_x = variances.x,
        var_y = variances.y,
        var_theta = variances.z,
        "Estimated motion covariance"
    );
    MotionCovariance::from_diagonal(variances.into())
}
