//! Named, optionally looping pose animations built from keyframes

use glam::{DQuat, DVec3};

use super::interpolation::{self, KeyFrameBracket};
use super::keyframe::{KeyFrame, KeyFrameSequence};
use super::types::{Bounds2, Interpolation, Pose};
use crate::error::{AnimError, Result};

/// Allowed gap between the last keyframe time and the animation duration
pub const DEFAULT_DURATION_TOLERANCE: f64 = 0.01;

/// A validated keyframe animation
///
/// Built once through [`PoseAnimationBuilder`] and never mutated afterwards,
/// so sampling can proceed from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseAnimation {
    name: String,
    duration: f64,
    looping: bool,
    interpolation: Interpolation,
    key_frames: KeyFrameSequence,
}

impl PoseAnimation {
    /// Start building an animation
    pub fn builder(name: impl Into<String>, duration: f64, looping: bool) -> PoseAnimationBuilder {
        PoseAnimationBuilder::new(name, duration, looping)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of one cycle in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn key_frame_count(&self) -> usize {
        self.key_frames.len()
    }

    pub fn key_frames(&self) -> &KeyFrameSequence {
        &self.key_frames
    }

    /// Elapsed time mapped onto one cycle (wrapped or clamped)
    pub fn local_time(&self, time: f64) -> f64 {
        interpolation::normalize_time(time, self.duration, self.looping)
    }

    /// Bracketing keyframes for an elapsed time
    pub fn bracket(&self, time: f64) -> KeyFrameBracket {
        interpolation::bracket(self.key_frames.as_slice(), self.lookup_time(time)).unwrap_or(
            KeyFrameBracket {
                index: 0,
                fraction: 0.0,
            },
        )
    }

    /// Local time used to find keyframes
    ///
    /// The last keyframe may sit slightly past `duration`. A finished
    /// non-looping animation rests on it instead of stopping short on the
    /// final segment.
    fn lookup_time(&self, time: f64) -> f64 {
        let local = self.local_time(time);
        if !self.looping && local >= self.duration {
            let last_time = self.key_frames.last().map_or(local, |kf| kf.time);
            local.max(last_time)
        } else {
            local
        }
    }

    /// Interpolated pose at an elapsed time since the animation started
    ///
    /// Looping animations jump back to the first keyframe at every multiple
    /// of the duration, whether or not the first and last poses agree.
    pub fn sample(&self, time: f64) -> Pose {
        self.sample_with(time, self.interpolation)
    }

    /// Same as [`sample`](Self::sample) with an explicit interpolation mode
    pub fn sample_with(&self, time: f64, mode: Interpolation) -> Pose {
        let local = self.lookup_time(time);
        interpolation::interpolate(self.key_frames.as_slice(), local, mode)
            .unwrap_or(Pose::IDENTITY)
    }

    /// Pose of the first keyframe
    pub fn start_pose(&self) -> Pose {
        self.key_frames.first().map_or(Pose::IDENTITY, KeyFrame::pose)
    }

    /// Pose of the last keyframe
    pub fn end_pose(&self) -> Pose {
        self.key_frames.last().map_or(Pose::IDENTITY, KeyFrame::pose)
    }

    /// Whether the loop boundary is free of a jump
    pub fn is_seamless(&self, epsilon: f64) -> bool {
        self.start_pose().approx_eq(&self.end_pose(), epsilon)
    }

    /// Ground-plane bounds of the keyframe positions
    ///
    /// Linear paths never leave this box. Splines may overshoot it.
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_points(
            self.key_frames
                .iter()
                .map(|kf| (kf.translation.x, kf.translation.y)),
        )
        .unwrap_or(Bounds2::point(0.0, 0.0))
    }

    /// Copy of this animation shifted by a constant offset
    pub fn translated(&self, offset: DVec3) -> Self {
        let mut moved = self.clone();
        for kf in moved.key_frames.frames_mut() {
            kf.translation += offset;
        }
        moved
    }
}

/// Builder collecting keyframes before validation
#[derive(Debug, Clone)]
pub struct PoseAnimationBuilder {
    name: String,
    duration: f64,
    looping: bool,
    interpolation: Interpolation,
    duration_tolerance: f64,
    key_frames: KeyFrameSequence,
}

impl PoseAnimationBuilder {
    /// Create a new builder
    ///
    /// # Arguments
    /// * `name` - Animation name, unique per obstacle
    /// * `duration` - Length of one cycle in seconds
    /// * `looping` - Whether playback repeats after `duration`
    pub fn new(name: impl Into<String>, duration: f64, looping: bool) -> Self {
        Self {
            name: name.into(),
            duration,
            looping,
            interpolation: Interpolation::default(),
            duration_tolerance: DEFAULT_DURATION_TOLERANCE,
            key_frames: KeyFrameSequence::new(),
        }
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn duration_tolerance(mut self, tolerance: f64) -> Self {
        self.duration_tolerance = tolerance.abs();
        self
    }

    /// Add a keyframe; a later keyframe at the same time wins
    pub fn key_frame(mut self, key_frame: KeyFrame) -> Self {
        self.key_frames.insert(key_frame);
        self
    }

    /// Add a ground-plane keyframe with identity orientation
    pub fn planar_key_frame(self, time: f64, x: f64, y: f64) -> Self {
        self.key_frame(KeyFrame::planar(time, x, y))
    }

    /// In-place variant of [`key_frame`](Self::key_frame), returning the
    /// keyframe it replaced
    pub fn push(&mut self, key_frame: KeyFrame) -> Option<KeyFrame> {
        self.key_frames.insert(key_frame)
    }

    /// Validate and produce the animation
    pub fn build(self) -> Result<PoseAnimation> {
        let Self {
            name,
            duration,
            looping,
            interpolation,
            duration_tolerance,
            mut key_frames,
        } = self;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnimError::InvalidDuration { name, duration });
        }

        if key_frames.len() < 2 {
            return Err(AnimError::TooFewKeyFrames {
                count: key_frames.len(),
                name,
            });
        }

        for kf in key_frames.iter() {
            if !kf.time.is_finite() || kf.time < 0.0 {
                return Err(AnimError::InvalidKeyFrameTime {
                    name,
                    time: kf.time,
                });
            }
            if !kf.is_finite() || kf.rotation.length_squared() == 0.0 {
                return Err(AnimError::NonFiniteValue {
                    name,
                    time: kf.time,
                });
            }
        }

        let last_time = key_frames.last().map_or(0.0, |kf| kf.time);
        if (last_time - duration).abs() > duration_tolerance {
            return Err(AnimError::DurationMismatch {
                name,
                duration,
                last_time,
                tolerance: duration_tolerance,
            });
        }

        for kf in key_frames.frames_mut() {
            kf.rotation = normalize_rotation(kf.rotation);
        }

        log::debug!(
            "Built animation '{}' ({} keyframes, {:.2}s, loop={}, {})",
            name,
            key_frames.len(),
            duration,
            looping,
            interpolation
        );

        Ok(PoseAnimation {
            name,
            duration,
            looping,
            interpolation,
            key_frames,
        })
    }
}

fn normalize_rotation(rotation: DQuat) -> DQuat {
    if rotation.is_normalized() {
        rotation
    } else {
        rotation.normalize()
    }
}
