use std::io;
use thiserror::Error;

/// Error types for trajectory loading and animation construction
#[derive(Error, Debug)]
pub enum AnimError {
    /// I/O Error while reading a trajectory file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON trajectory record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML trajectory record
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Trajectory file extension is not one we can parse
    #[error("Unsupported trajectory format: {0}")]
    UnsupportedFormat(String),

    /// Animation has fewer than two keyframes
    #[error("Animation '{name}' has {count} keyframe(s), at least 2 are required")]
    TooFewKeyFrames { name: String, count: usize },

    /// Animation duration is not a positive finite number
    #[error("Animation '{name}' has invalid duration {duration}")]
    InvalidDuration { name: String, duration: f64 },

    /// Keyframe time is negative or not finite
    #[error("Animation '{name}' has invalid keyframe time {time}")]
    InvalidKeyFrameTime { name: String, time: f64 },

    /// Keyframe translation or rotation contains NaN or infinity
    #[error("Animation '{name}' has a non-finite value in the keyframe at {time}")]
    NonFiniteValue { name: String, time: f64 },

    /// Two authored keyframes share a timestamp but disagree on the pose
    #[error("Animation '{name}' has conflicting keyframes at time {time}")]
    DuplicateKeyFrameTime { name: String, time: f64 },

    /// Last keyframe does not land on the animation duration
    #[error(
        "Animation '{name}' has duration {duration} but its last keyframe is at {last_time} (tolerance {tolerance})"
    )]
    DurationMismatch {
        name: String,
        duration: f64,
        last_time: f64,
        tolerance: f64,
    },

    /// Registry already holds an obstacle with this id
    #[error("Duplicate obstacle id: {0}")]
    DuplicateObstacle(String),

    /// Registry has no obstacle with this id
    #[error("Unknown obstacle id: {0}")]
    UnknownObstacle(String),
}

impl AnimError {
    /// Whether the error describes a malformed trajectory (an authoring bug)
    /// rather than a failure to read or look up the data
    pub fn is_malformed_trajectory(&self) -> bool {
        matches!(
            self,
            Self::TooFewKeyFrames { .. }
                | Self::InvalidDuration { .. }
                | Self::InvalidKeyFrameTime { .. }
                | Self::NonFiniteValue { .. }
                | Self::DuplicateKeyFrameTime { .. }
                | Self::DurationMismatch { .. }
        )
    }
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;
