//! Keyframe pose animation for kinematic simulator obstacles
//!
//! Obstacles follow precomputed closed-loop waypoint paths. Each path lives
//! in a data table; this crate validates the tables, interpolates a pose for
//! any simulation time, and hands it to host models.

pub mod animation;
pub mod error;
pub mod trajectory;

// Re-export common types
pub use animation::{AnimationPlayer, KeyFrame, KinematicModel, Pose, PoseAnimation, Scene};
pub use error::{AnimError, Result};
pub use trajectory::{ObstacleRegistry, TrajectoryRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
