//! Keyframe pose animation system
//!
//! This module provides playback support for kinematic obstacles, including:
//! - Time-sorted keyframe storage with last-write-wins replacement
//! - Keyframe interpolation (step, linear, Catmull-Rom spline)
//! - Loop wrapping and end clamping
//! - Playback state and scene stepping for host models
//!
//! # Example
//!
//! ```rust
//! use obstacle_anim::animation::PoseAnimation;
//!
//! let animation = PoseAnimation::builder("obs_demo", 10.0, true)
//!     .planar_key_frame(0.0, 0.0, 0.0)
//!     .planar_key_frame(10.0, 10.0, 0.0)
//!     .build()?;
//!
//! let pose = animation.sample(5.0);
//! assert_eq!(pose.position.x, 5.0);
//! # Ok::<(), obstacle_anim::AnimError>(())
//! ```

mod interpolation;
mod keyframe;
mod player;
mod pose_animation;
mod types;

pub use interpolation::{
    KeyFrameBracket, bracket, catmull_rom, interpolate, normalize_time, segment_fraction,
};
pub use keyframe::{KeyFrame, KeyFrameSequence, TIME_EPSILON};
pub use player::{AnimationPlayer, KinematicModel, Scene, SceneEntry};
pub use pose_animation::{DEFAULT_DURATION_TOLERANCE, PoseAnimation, PoseAnimationBuilder};
pub use types::{Bounds2, Interpolation, Lerp, Pose};
