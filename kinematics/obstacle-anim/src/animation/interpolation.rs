//! Keyframe interpolation for pose animations

use glam::DVec3;

use super::keyframe::KeyFrame;
use super::types::{Interpolation, Lerp, Pose};

/// Bracketing keyframe pair for a query time
///
/// `index` is the earlier keyframe; `fraction` is how far the query lies
/// towards `index + 1`. At or past the last keyframe `index` is the last one
/// and `fraction` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFrameBracket {
    pub index: usize,
    pub fraction: f64,
}

/// Map an elapsed time onto the animation's local timeline
///
/// Looping animations wrap (negative times included); others are clamped
/// into `[0, duration]`.
pub fn normalize_time(time: f64, duration: f64, looping: bool) -> f64 {
    if time.is_nan() || duration <= 0.0 {
        return 0.0;
    }

    if looping {
        if time.is_infinite() {
            return 0.0;
        }
        let local = time.rem_euclid(duration);
        // rem_euclid can round up to exactly `duration` for tiny negatives
        if local >= duration { 0.0 } else { local }
    } else {
        time.clamp(0.0, duration)
    }
}

/// Position of `time` within `[start, end]`, clamped to `[0, 1]`
///
/// Zero-length intervals yield 0.
pub fn segment_fraction(time: f64, start: f64, end: f64) -> f64 {
    let length = end - start;
    if length > 0.0 {
        ((time - start) / length).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Locate the keyframes surrounding `time`
///
/// Returns None if there are no keyframes.
pub fn bracket(key_frames: &[KeyFrame], time: f64) -> Option<KeyFrameBracket> {
    let first = key_frames.first()?;
    let last_index = key_frames.len() - 1;

    if time <= first.time {
        return Some(KeyFrameBracket {
            index: 0,
            fraction: 0.0,
        });
    }

    if time >= key_frames[last_index].time {
        return Some(KeyFrameBracket {
            index: last_index,
            fraction: 0.0,
        });
    }

    // Largest index whose time is <= query
    let index = key_frames
        .partition_point(|kf| kf.time <= time)
        .saturating_sub(1);
    let start = key_frames[index].time;
    let end = key_frames[index + 1].time;

    Some(KeyFrameBracket {
        index,
        fraction: segment_fraction(time, start, end),
    })
}

/// Uniform Catmull-Rom spline through `p1` and `p2`
pub fn catmull_rom(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Interpolate a pose at `time` on the local timeline
///
/// Returns None if there are no keyframes. Query times at or outside the
/// first and last keyframes return those keyframes' poses.
pub fn interpolate(key_frames: &[KeyFrame], time: f64, mode: Interpolation) -> Option<Pose> {
    let KeyFrameBracket { index, fraction } = bracket(key_frames, time)?;

    let current = &key_frames[index];
    let Some(next) = key_frames.get(index + 1) else {
        return Some(current.pose());
    };

    if fraction <= 0.0 {
        return Some(current.pose());
    }
    if fraction >= 1.0 {
        return Some(next.pose());
    }

    let pose = match mode {
        Interpolation::Step => current.pose(),
        Interpolation::Linear => current.pose().lerp(&next.pose(), fraction),
        Interpolation::Spline => {
            let before = if index == 0 {
                current.translation
            } else {
                key_frames[index - 1].translation
            };
            let after = key_frames
                .get(index + 2)
                .map_or(next.translation, |kf| kf.translation);

            Pose::new(
                catmull_rom(
                    before,
                    current.translation,
                    next.translation,
                    after,
                    fraction,
                ),
                Lerp::lerp(&current.rotation, &next.rotation, fraction),
            )
        }
    };

    log::trace!(
        "t={time:.4} bracket [{index}, {}] f={fraction:.4} -> {:?}",
        index + 1,
        pose.position
    );

    Some(pose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;
    use std::f64::consts::FRAC_PI_2;

    fn line() -> Vec<KeyFrame> {
        vec![
            KeyFrame::planar(0.0, 0.0, 0.0),
            KeyFrame::planar(10.0, 10.0, 0.0),
        ]
    }

    #[test]
    fn test_normalize_time_looping() {
        assert_eq!(normalize_time(0.0, 10.0, true), 0.0);
        assert_eq!(normalize_time(4.0, 10.0, true), 4.0);
        assert_eq!(normalize_time(10.0, 10.0, true), 0.0);
        assert_eq!(normalize_time(23.0, 10.0, true), 3.0);
        assert_eq!(normalize_time(-2.0, 10.0, true), 8.0);
    }

    #[test]
    fn test_normalize_time_clamped() {
        assert_eq!(normalize_time(4.0, 10.0, false), 4.0);
        assert_eq!(normalize_time(10.0, 10.0, false), 10.0);
        assert_eq!(normalize_time(25.0, 10.0, false), 10.0);
        assert_eq!(normalize_time(-1.0, 10.0, false), 0.0);
    }

    #[test]
    fn test_normalize_time_degenerate_input() {
        assert_eq!(normalize_time(f64::NAN, 10.0, true), 0.0);
        assert_eq!(normalize_time(f64::INFINITY, 10.0, true), 0.0);
        assert_eq!(normalize_time(f64::INFINITY, 10.0, false), 10.0);
        assert_eq!(normalize_time(5.0, 0.0, true), 0.0);
    }

    #[test]
    fn test_segment_fraction() {
        assert_eq!(segment_fraction(5.0, 0.0, 10.0), 0.5);
        assert_eq!(segment_fraction(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(segment_fraction(15.0, 0.0, 10.0), 1.0);
        // Zero-length interval
        assert_eq!(segment_fraction(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_bracket() {
        let key_frames = vec![
            KeyFrame::planar(0.0, 0.0, 0.0),
            KeyFrame::planar(2.0, 0.0, 0.0),
            KeyFrame::planar(6.0, 0.0, 0.0),
        ];

        assert_eq!(bracket(&[], 1.0), None);
        assert_eq!(
            bracket(&key_frames, 1.0),
            Some(KeyFrameBracket {
                index: 0,
                fraction: 0.5
            })
        );
        assert_eq!(
            bracket(&key_frames, 3.0),
            Some(KeyFrameBracket {
                index: 1,
                fraction: 0.25
            })
        );
        assert_eq!(bracket(&key_frames, 6.0).map(|b| b.index), Some(2));
        assert_eq!(bracket(&key_frames, -1.0).map(|b| b.index), Some(0));
    }

    #[test]
    fn test_interpolate_linear() {
        let key_frames = line();

        // At start
        let pose = interpolate(&key_frames, 0.0, Interpolation::Linear).unwrap();
        assert_eq!(pose.position, DVec3::ZERO);

        // At middle
        let pose = interpolate(&key_frames, 5.0, Interpolation::Linear).unwrap();
        assert!((pose.position.x - 5.0).abs() < 1e-12);
        assert_eq!(pose.position.y, 0.0);

        // At end
        let pose = interpolate(&key_frames, 10.0, Interpolation::Linear).unwrap();
        assert_eq!(pose.position, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_interpolate_step() {
        let key_frames = line();

        // Holds the first keyframe until the second is reached
        let pose = interpolate(&key_frames, 9.99, Interpolation::Step).unwrap();
        assert_eq!(pose.position, DVec3::ZERO);

        let pose = interpolate(&key_frames, 10.0, Interpolation::Step).unwrap();
        assert_eq!(pose.position.x, 10.0);
    }

    #[test]
    fn test_interpolate_spline_passes_through_keyframes() {
        let key_frames = vec![
            KeyFrame::planar(0.0, 0.0, 0.0),
            KeyFrame::planar(1.0, 1.0, 1.0),
            KeyFrame::planar(2.0, 2.0, 0.0),
            KeyFrame::planar(3.0, 3.0, 1.0),
        ];

        for kf in &key_frames {
            let pose = interpolate(&key_frames, kf.time, Interpolation::Spline).unwrap();
            assert_eq!(pose.position, kf.translation);
        }

        // Collinear x coordinates stay linear under Catmull-Rom
        let pose = interpolate(&key_frames, 1.5, Interpolation::Spline).unwrap();
        assert!((pose.position.x - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_rotation() {
        let key_frames = vec![
            KeyFrame::new(0.0, DVec3::ZERO, DQuat::IDENTITY),
            KeyFrame::new(4.0, DVec3::ZERO, DQuat::from_rotation_z(FRAC_PI_2)),
        ];

        let pose = interpolate(&key_frames, 2.0, Interpolation::Linear).unwrap();
        assert!((pose.yaw() - FRAC_PI_2 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate_empty() {
        assert_eq!(interpolate(&[], 1.0, Interpolation::Linear), None);
    }

    #[test]
    fn test_catmull_rom_endpoints() {
        let p0 = DVec3::new(-1.0, 3.0, 0.0);
        let p1 = DVec3::new(0.0, 0.0, 0.0);
        let p2 = DVec3::new(4.0, 2.0, 0.0);
        let p3 = DVec3::new(5.0, -1.0, 0.0);

        assert!(catmull_rom(p0, p1, p2, p3, 0.0).abs_diff_eq(p1, 1e-12));
        assert!(catmull_rom(p0, p1, p2, p3, 1.0).abs_diff_eq(p2, 1e-12));
    }
}
