//! Animation playback and the boundary to the host simulator
//!
//! The host owns the models. Each tick it advances a [`Scene`] (or individual
//! [`AnimationPlayer`]s) by the elapsed simulation time, and the resulting
//! poses are written to the models kinematically, without physics forces.

use super::pose_animation::PoseAnimation;
use super::types::Pose;

/// A host-side rigid body that can be placed directly in the world
pub trait KinematicModel {
    /// Name used to find the model in a scene
    fn name(&self) -> &str;

    /// Overwrite the model's world transform
    fn set_world_pose(&mut self, pose: &Pose);
}

/// Playback state for one animation
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    animation: PoseAnimation,
    /// Elapsed time since the animation started (seconds)
    time: f64,
}

impl AnimationPlayer {
    /// Create a player positioned at the start of the animation
    pub fn new(animation: PoseAnimation) -> Self {
        Self {
            animation,
            time: 0.0,
        }
    }

    /// Create a player that starts part-way through the animation
    pub fn with_start_time(animation: PoseAnimation, time: f64) -> Self {
        let mut player = Self::new(animation);
        player.set_time(time);
        player
    }

    pub fn animation(&self) -> &PoseAnimation {
        &self.animation
    }

    /// Elapsed time since the animation started
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Elapsed time mapped onto the current cycle
    pub fn local_time(&self) -> f64 {
        self.animation.local_time(self.time)
    }

    /// Number of completed cycles
    pub fn cycle(&self) -> u64 {
        if self.time <= 0.0 {
            return 0;
        }
        (self.time / self.animation.duration()).floor() as u64
    }

    /// Whether a non-looping animation has reached its last keyframe
    pub fn is_finished(&self) -> bool {
        !self.animation.is_looping() && self.time >= self.animation.duration()
    }

    /// Advance playback by `delta` seconds
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn update(&mut self, delta: f64) {
        if !delta.is_finite() || delta < 0.0 {
            log::warn!(
                "Ignoring invalid time step {} for animation '{}'",
                delta,
                self.animation.name()
            );
            return;
        }
        self.time += delta;
    }

    /// Jump to an absolute elapsed time
    pub fn set_time(&mut self, time: f64) {
        if time.is_finite() {
            self.time = time.max(0.0);
        } else {
            log::warn!(
                "Ignoring invalid time {} for animation '{}'",
                time,
                self.animation.name()
            );
        }
    }

    /// Interpolated pose at the current time
    pub fn pose(&self) -> Pose {
        self.animation.sample(self.time)
    }

    /// Write the current pose to a model and return it
    pub fn apply_to<M: KinematicModel + ?Sized>(&self, model: &mut M) -> Pose {
        let pose = self.pose();
        model.set_world_pose(&pose);
        pose
    }
}

/// A model paired with the animation that drives it
#[derive(Debug, Clone)]
pub struct SceneEntry<M> {
    pub model: M,
    pub player: AnimationPlayer,
}

impl<M: KinematicModel> SceneEntry<M> {
    fn advance(&mut self, delta: f64) {
        self.player.update(delta);
        self.player.apply_to(&mut self.model);
    }

    fn seek(&mut self, time: f64) {
        self.player.set_time(time);
        self.player.apply_to(&mut self.model);
    }
}

/// Explicit table of animated models
///
/// Models are attached at load time and stepped together once per tick.
#[derive(Debug, Clone)]
pub struct Scene<M> {
    entries: Vec<SceneEntry<M>>,
}

impl<M> Default for Scene<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<M: KinematicModel> Scene<M> {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an animation to a model; the model is posed at the first keyframe
    pub fn attach(&mut self, mut model: M, animation: PoseAnimation) {
        log::debug!(
            "Attaching animation '{}' to model '{}'",
            animation.name(),
            model.name()
        );
        let player = AnimationPlayer::new(animation);
        player.apply_to(&mut model);
        self.entries.push(SceneEntry { model, player });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every animation by `delta` seconds and pose its model
    pub fn step(&mut self, delta: f64) {
        for entry in &mut self.entries {
            entry.advance(delta);
        }
    }

    /// Move every animation to an absolute time and pose its model
    ///
    /// Unlike [`step`](Self::step), repeated calls do not accumulate
    /// rounding error.
    pub fn set_time(&mut self, time: f64) {
        for entry in &mut self.entries {
            entry.seek(time);
        }
    }

    pub fn entries(&self) -> &[SceneEntry<M>] {
        &self.entries
    }

    pub fn models(&self) -> impl Iterator<Item = &M> {
        self.entries.iter().map(|entry| &entry.model)
    }

    /// Find an entry by model name
    pub fn get(&self, name: &str) -> Option<&SceneEntry<M>> {
        self.entries.iter().find(|entry| entry.model.name() == name)
    }

    /// Detach all models, returning them
    pub fn into_models(self) -> Vec<M> {
        self.entries.into_iter().map(|entry| entry.model).collect()
    }
}

#[cfg(feature = "parallel")]
impl<M: KinematicModel + Send> Scene<M> {
    /// Same as [`step`](Self::step), updating entries concurrently
    pub fn step_parallel(&mut self, delta: f64) {
        use rayon::prelude::*;

        self.entries
            .par_iter_mut()
            .for_each(|entry| entry.advance(delta));
    }

    /// Same as [`set_time`](Self::set_time), updating entries concurrently
    pub fn set_time_parallel(&mut self, time: f64) {
        use rayon::prelude::*;

        self.entries
            .par_iter_mut()
            .for_each(|entry| entry.seek(time));
    }
}
