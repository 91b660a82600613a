//! Common types for the pose animation system

use std::fmt;
use std::str::FromStr;

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Rigid body pose: world position plus orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Pose {
    /// Origin with no rotation
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Create a new pose
    pub const fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    /// Pose on the ground plane (z = 0) with identity orientation
    pub const fn planar(x: f64, y: f64) -> Self {
        Self::new(DVec3::new(x, y, 0.0), DQuat::IDENTITY)
    }

    /// Heading around the world Z axis, in radians
    pub fn yaw(&self) -> f64 {
        self.rotation.to_euler(EulerRot::ZYX).0
    }

    /// Compare two poses within `epsilon`
    ///
    /// Rotations are compared up to sign, since `q` and `-q` describe the
    /// same orientation.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        if !self.position.abs_diff_eq(other.position, epsilon) {
            return false;
        }
        let dot = self.rotation.dot(other.rotation).abs();
        (1.0 - dot).abs() <= epsilon
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Trait for types that can be linearly interpolated
pub trait Lerp: Clone {
    /// Linear interpolation between self and other
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for DVec3 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            Lerp::lerp(&self.x, &other.x, t),
            Lerp::lerp(&self.y, &other.y, t),
            Lerp::lerp(&self.z, &other.z, t),
        )
    }
}

impl Lerp for DQuat {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        // Shortest-arc slerp; glam flips the sign of `other` when needed
        self.slerp(*other, t).normalize()
    }
}

impl Lerp for Pose {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            position: Lerp::lerp(&self.position, &other.position, t),
            rotation: Lerp::lerp(&self.rotation, &other.rotation, t),
        }
    }
}

/// How poses between two keyframes are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Hold the earlier keyframe until the next one is reached
    Step,
    /// Per-axis linear position, slerp rotation
    #[default]
    Linear,
    /// Catmull-Rom position spline through neighbouring keyframes, slerp rotation
    Spline,
}

impl Interpolation {
    pub const ALL: [Self; 3] = [Self::Step, Self::Linear, Self::Spline];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Step => "step",
            Self::Linear => "linear",
            Self::Spline => "spline",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "step" | "none" => Ok(Self::Step),
            "linear" => Ok(Self::Linear),
            "spline" | "catmull-rom" => Ok(Self::Spline),
            other => {
                let expected: Vec<&str> = Self::ALL.iter().map(|mode| mode.as_str()).collect();
                Err(format!(
                    "unknown interpolation '{other}' (expected one of: {})",
                    expected.join(", ")
                ))
            }
        }
    }
}

/// Axis-aligned bounds on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds2 {
    /// Bounds of a single point
    pub const fn point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    /// Bounds of a set of points, `None` when the set is empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut bounds = Self::point(x, y);
        for (x, y) in iter {
            bounds.include(x, y);
        }
        Some(bounds)
    }

    /// Grow the bounds to contain the given point
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    /// Whether the point lies inside or on the boundary
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

impl fmt::Display for Bounds2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x [{:.2}, {:.2}] y [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}
