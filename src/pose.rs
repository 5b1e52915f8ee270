use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, ops::Add};

/// Robot pose in the plane: position plus heading in radians.
///
/// Heading is never wrapped implicitly. Use [`Pose2d::normalized`] to bring it
/// back into (−π, π].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// Relative motion expressed in the frame of the pose it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Increment {
    pub dx: f64,
    pub dy: f64,
    pub dtheta: f64,
}

impl Pose2d {
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn from_na(position: na::Point2<f64>, rotation: na::Rotation2<f64>) -> Self {
        Self::new(position.x, position.y, rotation.angle())
    }

    pub fn from_vector(vector: &na::Vector3<f64>) -> Self {
        Self::new(vector.x, vector.y, vector.z)
    }

    pub fn position(&self) -> na::Point2<f64> {
        na::Point2::new(self.x, self.y)
    }

    pub fn rotation(&self) -> na::Rotation2<f64> {
        na::Rotation2::new(self.theta)
    }

    pub fn to_vector(&self) -> na::Vector3<f64> {
        na::Vector3::new(self.x, self.y, self.theta)
    }

    /// Planar composition `self ⊕ increment`.
    ///
    /// The increment is rotated by this pose's heading, translated by its
    /// position, and the headings are summed. Not commutative.
    pub fn compose(&self, increment: &Increment) -> Pose2d {
        let (sin, cos) = self.theta.sin_cos();
        Pose2d {
            x: self.x + increment.dx * cos - increment.dy * sin,
            y: self.y + increment.dx * sin + increment.dy * cos,
            theta: self.theta + increment.dtheta,
        }
    }

    /// Pose `p⁻¹` such that `p ⊕ p⁻¹` is the origin.
    pub fn inverse(&self) -> Pose2d {
        let (sin, cos) = self.theta.sin_cos();
        Pose2d {
            x: -self.x * cos - self.y * sin,
            y: self.x * sin - self.y * cos,
            theta: -self.theta,
        }
    }

    /// Increment that carries `self` onto `other`, i.e. `self⁻¹ ⊕ other`.
    pub fn between(&self, other: &Pose2d) -> Increment {
        let (sin, cos) = self.theta.sin_cos();
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        Increment {
            dx: cos * dx + sin * dy,
            dy: -sin * dx + cos * dy,
            dtheta: other.theta - self.theta,
        }
    }

    /// Same pose with heading wrapped into (−π, π].
    pub fn normalized(&self) -> Pose2d {
        Pose2d {
            theta: normalize_angle(self.theta),
            ..*self
        }
    }

    pub fn as_increment(&self) -> Increment {
        Increment::new(self.x, self.y, self.theta)
    }
}

impl fmt::Display for Pose2d {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}] -> {:.2}",
            self.x,
            self.y,
            self.theta.to_degrees()
        )
    }
}

impl Add<Increment> for Pose2d {
    type Output = Pose2d;

    fn add(self, increment: Increment) -> Pose2d {
        self.compose(&increment)
    }
}

impl Increment {
    pub const fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Forward motion along the current heading.
    pub const fn straight(distance: f64) -> Self {
        Self::new(distance, 0.0, 0.0)
    }

    /// Rotation in place.
    pub const fn turn(angle: f64) -> Self {
        Self::new(0.0, 0.0, angle)
    }

    pub fn from_vector(vector: &na::Vector3<f64>) -> Self {
        Self::new(vector.x, vector.y, vector.z)
    }

    pub fn to_vector(&self) -> na::Vector3<f64> {
        na::Vector3::new(self.dx, self.dy, self.dtheta)
    }

    /// Elementwise `self + noise`.
    pub fn perturbed(&self, noise: &na::Vector3<f64>) -> Increment {
        Increment::new(
            self.dx + noise.x,
            self.dy + noise.y,
            self.dtheta + noise.z,
        )
    }

    pub fn is_turn(&self) -> bool {
        self.dtheta != 0.0
    }
}

/// Wraps an angle into (−π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
