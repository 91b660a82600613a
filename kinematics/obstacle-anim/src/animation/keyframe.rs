//! Keyframes and the time-sorted keyframe sequence

use glam::{DQuat, DVec3};

use super::types::Pose;

/// Two keyframe times closer than this are treated as the same instant
pub const TIME_EPSILON: f64 = 1e-9;

/// A timestamped pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFrame {
    /// Seconds since the start of the animation
    pub time: f64,
    pub translation: DVec3,
    pub rotation: DQuat,
}

impl KeyFrame {
    /// Create a new keyframe
    pub const fn new(time: f64, translation: DVec3, rotation: DQuat) -> Self {
        Self {
            time,
            translation,
            rotation,
        }
    }

    /// Keyframe on the ground plane with identity orientation
    pub const fn planar(time: f64, x: f64, y: f64) -> Self {
        Self::new(time, DVec3::new(x, y, 0.0), DQuat::IDENTITY)
    }

    /// The pose this keyframe pins down
    pub fn pose(&self) -> Pose {
        Pose::new(self.translation, self.rotation)
    }

    /// Whether translation and rotation are all finite
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite()
    }

    /// Same instant and the same pose
    pub fn same_as(&self, other: &Self) -> bool {
        same_time(self.time, other.time) && self.pose().approx_eq(&other.pose(), TIME_EPSILON)
    }
}

pub(crate) fn same_time(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}

/// Keyframes kept sorted ascending by time
///
/// Insertion order is free; two keyframes never share a timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFrameSequence {
    frames: Vec<KeyFrame>,
}

impl KeyFrameSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Insert a keyframe at its sorted position
    ///
    /// A keyframe at an already present time replaces the existing one,
    /// which is returned.
    pub fn insert(&mut self, key_frame: KeyFrame) -> Option<KeyFrame> {
        let index = self
            .frames
            .partition_point(|kf| kf.time < key_frame.time - TIME_EPSILON);

        if let Some(existing) = self.frames.get_mut(index) {
            if same_time(existing.time, key_frame.time) {
                log::debug!(
                    "Replacing keyframe at t={} ({:?} -> {:?})",
                    existing.time,
                    existing.translation,
                    key_frame.translation
                );
                return Some(std::mem::replace(existing, key_frame));
            }
        }

        self.frames.insert(index, key_frame);
        None
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> Option<&KeyFrame> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&KeyFrame> {
        self.frames.last()
    }

    pub fn get(&self, index: usize) -> Option<&KeyFrame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyFrame> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[KeyFrame] {
        &self.frames
    }

    /// Keyframe times in ascending order
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.frames.iter().map(|kf| kf.time)
    }

    /// Find the index of the keyframe at or before the given time
    ///
    /// Returns `Some(0)` for times before the first keyframe and `None` only
    /// when the sequence is empty.
    pub fn find_index(&self, time: f64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        Some(
            self.frames
                .partition_point(|kf| kf.time <= time)
                .saturating_sub(1),
        )
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [KeyFrame] {
        &mut self.frames
    }
}

impl FromIterator<KeyFrame> for KeyFrameSequence {
    fn from_iter<I: IntoIterator<Item = KeyFrame>>(iter: I) -> Self {
        let mut sequence = Self::new();
        for key_frame in iter {
            sequence.insert(key_frame);
        }
        sequence
    }
}

impl<'a> IntoIterator for &'a KeyFrameSequence {
    type Item = &'a KeyFrame;
    type IntoIter = std::slice::Iter<'a, KeyFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_time_order() {
        let mut sequence = KeyFrameSequence::new();
        sequence.insert(KeyFrame::planar(5.0, 1.0, 0.0));
        sequence.insert(KeyFrame::planar(0.0, 0.0, 0.0));
        sequence.insert(KeyFrame::planar(10.0, 2.0, 0.0));
        sequence.insert(KeyFrame::planar(2.5, 0.5, 0.0));

        let times: Vec<f64> = sequence.times().collect();
        assert_eq!(times, vec![0.0, 2.5, 5.0, 10.0]);
    }

    #[test]
    fn test_insert_same_time_replaces() {
        let mut sequence = KeyFrameSequence::new();
        assert!(sequence.insert(KeyFrame::planar(1.0, 1.0, 1.0)).is_none());
        sequence.insert(KeyFrame::planar(2.0, 2.0, 2.0));

        let replaced = sequence.insert(KeyFrame::planar(1.0, 9.0, 9.0));
        assert_eq!(replaced, Some(KeyFrame::planar(1.0, 1.0, 1.0)));
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.first().unwrap().translation, DVec3::new(9.0, 9.0, 0.0));
    }

    #[test]
    fn test_near_duplicate_times_are_distinct() {
        let sequence: KeyFrameSequence = [
            KeyFrame::planar(55.94, -1.11, 3.03),
            KeyFrame::planar(55.36, -1.0, 3.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.get(0).unwrap().time, 55.36);
    }

    #[test]
    fn test_find_index_empty() {
        let sequence = KeyFrameSequence::new();
        assert_eq!(sequence.find_index(0.0), None);
    }

    #[test]
    fn test_find_index_single() {
        let sequence: KeyFrameSequence = [KeyFrame::planar(1.0, 0.0, 0.0)].into_iter().collect();
        assert_eq!(sequence.find_index(0.0), Some(0));
        assert_eq!(sequence.find_index(1.0), Some(0));
        assert_eq!(sequence.find_index(2.0), Some(0));
    }

    #[test]
    fn test_find_index_multiple() {
        let sequence: KeyFrameSequence = [0.0, 1.0, 2.0, 3.0]
            .into_iter()
            .map(|t| KeyFrame::planar(t, t, 0.0))
            .collect();

        // Before first
        assert_eq!(sequence.find_index(-1.0), Some(0));
        assert_eq!(sequence.find_index(0.0), Some(0));

        // Between keyframes
        assert_eq!(sequence.find_index(0.5), Some(0));
        assert_eq!(sequence.find_index(1.5), Some(1));
        assert_eq!(sequence.find_index(2.5), Some(2));

        // At keyframes
        assert_eq!(sequence.find_index(1.0), Some(1));
        assert_eq!(sequence.find_index(2.0), Some(2));

        // After last
        assert_eq!(sequence.find_index(4.0), Some(3));
    }

    #[test]
    fn test_same_as() {
        let a = KeyFrame::planar(1.0, 2.0, 3.0);
        assert!(a.same_as(&KeyFrame::planar(1.0, 2.0, 3.0)));
        assert!(!a.same_as(&KeyFrame::planar(1.0, 2.0, 3.5)));
        assert!(!a.same_as(&KeyFrame::planar(1.5, 2.0, 3.0)));
    }
}
