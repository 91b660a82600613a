//! Serializable trajectory records
//!
//! A record is the authoring form of one obstacle's animation:
//!
//! ```yaml
//! id: obs_demo
//! duration: 10.0
//! loop: true
//! keyframes:
//!   - [0.0, 0.0, 0.0]          # time, x, y
//!   - { time: 10.0, x: 10.0, y: 0.0, yaw: 1.57 }
//! ```

use std::fs;
use std::path::Path;

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

use crate::animation::{Bounds2, Interpolation, KeyFrame, PoseAnimation};
use crate::error::{AnimError, Result};

/// On-disk encodings for trajectory records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryFormat {
    Yaml,
    Json,
}

impl TrajectoryFormat {
    /// Pick a format by file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(AnimError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Keyframe with every field spelled out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyFrameSpec {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub z: f64,
    /// Rotation about X, radians
    #[serde(default, skip_serializing_if = "is_zero")]
    pub roll: f64,
    /// Rotation about Y, radians
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pitch: f64,
    /// Rotation about Z, radians
    #[serde(default, skip_serializing_if = "is_zero")]
    pub yaw: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// One authored keyframe: `[time, x, y]` or a full map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyFrameRecord {
    Planar(f64, f64, f64),
    Full(KeyFrameSpec),
}

impl KeyFrameRecord {
    pub fn time(&self) -> f64 {
        match self {
            Self::Planar(time, _, _) => *time,
            Self::Full(full) => full.time,
        }
    }

    pub fn xy(&self) -> (f64, f64) {
        match self {
            Self::Planar(_, x, y) => (*x, *y),
            Self::Full(full) => (full.x, full.y),
        }
    }

    /// Shift the position on the ground plane
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match *self {
            Self::Planar(time, x, y) => Self::Planar(time, x + dx, y + dy),
            Self::Full(full) => Self::Full(KeyFrameSpec {
                x: full.x + dx,
                y: full.y + dy,
                ..full
            }),
        }
    }

    pub fn to_key_frame(&self) -> KeyFrame {
        match *self {
            Self::Planar(time, x, y) => KeyFrame::planar(time, x, y),
            Self::Full(full) => KeyFrame::new(
                full.time,
                DVec3::new(full.x, full.y, full.z),
                // Intrinsic Z-Y'-X'': yaw, then pitch, then roll
                DQuat::from_euler(EulerRot::ZYX, full.yaw, full.pitch, full.roll),
            ),
        }
    }
}

impl From<&KeyFrame> for KeyFrameRecord {
    fn from(kf: &KeyFrame) -> Self {
        let (yaw, pitch, roll) = kf.rotation.to_euler(EulerRot::ZYX);
        if kf.translation.z == 0.0 && yaw == 0.0 && pitch == 0.0 && roll == 0.0 {
            Self::Planar(kf.time, kf.translation.x, kf.translation.y)
        } else {
            Self::Full(KeyFrameSpec {
                time: kf.time,
                x: kf.translation.x,
                y: kf.translation.y,
                z: kf.translation.z,
                roll,
                pitch,
                yaw,
            })
        }
    }
}

fn default_loop() -> bool {
    true
}

/// Authoring record for one obstacle trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrajectoryRecord {
    /// Obstacle id, also used as the animation name
    pub id: String,
    /// Length of one cycle in seconds
    pub duration: f64,
    #[serde(rename = "loop", default = "default_loop")]
    pub looping: bool,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Overrides the default last-keyframe/duration tolerance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_tolerance: Option<f64>,
    pub keyframes: Vec<KeyFrameRecord>,
}

impl TrajectoryRecord {
    /// Parse a record from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a record from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a record in the given format
    pub fn from_str_as(text: &str, format: TrajectoryFormat) -> Result<Self> {
        match format {
            TrajectoryFormat::Yaml => Self::from_yaml_str(text),
            TrajectoryFormat::Json => Self::from_json_str(text),
        }
    }

    /// Load a record from a `.yaml`, `.yml` or `.json` file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = TrajectoryFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        let record = Self::from_str_as(&text, format)?;
        log::debug!(
            "Loaded trajectory '{}' from {} ({} keyframes)",
            record.id,
            path.display(),
            record.keyframes.len()
        );
        Ok(record)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize in the given format
    pub fn to_string_as(&self, format: TrajectoryFormat) -> Result<String> {
        match format {
            TrajectoryFormat::Yaml => self.to_yaml_string(),
            TrajectoryFormat::Json => self.to_json_string(),
        }
    }

    /// Record describing an existing animation
    pub fn from_animation(animation: &PoseAnimation) -> Self {
        Self {
            id: animation.name().to_string(),
            duration: animation.duration(),
            looping: animation.is_looping(),
            interpolation: animation.interpolation(),
            duration_tolerance: None,
            keyframes: animation
                .key_frames()
                .iter()
                .map(KeyFrameRecord::from)
                .collect(),
        }
    }

    /// Validate the record and build its animation
    ///
    /// Keyframes may be authored in any order. Repeating a timestamp is
    /// only accepted when both entries describe the same pose.
    pub fn to_animation(&self) -> Result<PoseAnimation> {
        let mut builder = PoseAnimation::builder(&self.id, self.duration, self.looping)
            .interpolation(self.interpolation);
        if let Some(tolerance) = self.duration_tolerance {
            builder = builder.duration_tolerance(tolerance);
        }

        let mut previous_time = f64::NEG_INFINITY;
        let mut out_of_order = false;

        for record in &self.keyframes {
            let key_frame = record.to_key_frame();
            if key_frame.time < previous_time {
                out_of_order = true;
            }
            previous_time = previous_time.max(key_frame.time);

            if let Some(replaced) = builder.push(key_frame) {
                if !replaced.same_as(&key_frame) {
                    return Err(AnimError::DuplicateKeyFrameTime {
                        name: self.id.clone(),
                        time: key_frame.time,
                    });
                }
                log::warn!(
                    "Trajectory '{}' repeats the keyframe at t={}, keeping one",
                    self.id,
                    key_frame.time
                );
            }
        }

        if out_of_order {
            log::warn!(
                "Trajectory '{}' keyframes are not in time order, sorting them",
                self.id
            );
        }

        builder.build()
    }

    /// Ground-plane bounds of the keyframe positions
    pub fn bounds(&self) -> Option<Bounds2> {
        Bounds2::from_points(self.keyframes.iter().map(KeyFrameRecord::xy))
    }

    /// Copy of the record with every keyframe shifted on the ground plane
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            keyframes: self
                .keyframes
                .iter()
                .map(|kf| kf.translated(dx, dy))
                .collect(),
            ..self.clone()
        }
    }
}
