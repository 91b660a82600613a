//! Property tests for pose sampling

use obstacle_anim::PoseAnimation;
use obstacle_anim::animation::KeyFrame;
use proptest::prelude::*;

/// Strictly increasing keyframe times starting at 0, plus positions
///
/// The duration differs from the last keyframe time by less than the
/// default tolerance, on either side.
fn animation_strategy(looping: bool) -> impl Strategy<Value = PoseAnimation> {
    (
        prop::collection::vec((0.05f64..20.0, -10.0f64..10.0, -10.0f64..10.0), 2..12),
        -0.009f64..0.009,
    )
        .prop_map(move |(steps, jitter)| {
            let mut time = 0.0;
            let mut key_frames = Vec::with_capacity(steps.len());
            for (i, (gap, x, y)) in steps.into_iter().enumerate() {
                if i > 0 {
                    time += gap;
                }
                key_frames.push(KeyFrame::planar(time, x, y));
            }

            let mut builder = PoseAnimation::builder("generated", time + jitter, looping);
            for kf in key_frames {
                builder = builder.key_frame(kf);
            }
            builder.build().expect("generated animation is valid")
        })
}

proptest! {
    #[test]
    fn looping_sample_is_periodic(animation in animation_strategy(true), t in 0.0f64..500.0) {
        let a = animation.sample(t);
        let b = animation.sample(t + animation.duration());
        prop_assert!(a.approx_eq(&b, 1e-6), "{:?} vs {:?}", a, b);
    }

    #[test]
    fn linear_sample_never_overshoots_segment(
        animation in animation_strategy(true),
        t in 0.0f64..500.0
    ) {
        let bracket = animation.bracket(t);
        let key_frames = animation.key_frames();
        let start = key_frames.get(bracket.index).unwrap().translation;
        let end = key_frames.get(bracket.index + 1).map_or(start, |kf| kf.translation);
        let position = animation.sample(t).position;

        let eps = 1e-9;
        prop_assert!(position.x >= start.x.min(end.x) - eps);
        prop_assert!(position.x <= start.x.max(end.x) + eps);
        prop_assert!(position.y >= start.y.min(end.y) - eps);
        prop_assert!(position.y <= start.y.max(end.y) + eps);
    }

    #[test]
    fn clamped_sample_holds_end_pose(
        animation in animation_strategy(false),
        extra in 0.0f64..1000.0
    ) {
        let end = animation.end_pose();
        prop_assert_eq!(animation.sample(animation.duration() + extra), end);
        let last_time = animation.key_frames().last().unwrap().time;
        prop_assert_eq!(animation.sample(last_time.max(animation.duration())), end);
    }

    #[test]
    fn sample_stays_inside_keyframe_bounds(
        animation in animation_strategy(true),
        t in -100.0f64..500.0
    ) {
        let bounds = animation.bounds();
        let position = animation.sample(t).position;
        let eps = 1e-9;
        prop_assert!(position.x >= bounds.min_x - eps && position.x <= bounds.max_x + eps);
        prop_assert!(position.y >= bounds.min_y - eps && position.y <= bounds.max_y + eps);
    }
}

#[test]
fn two_keyframe_midpoint() {
    let animation = PoseAnimation::builder("line", 10.0, true)
        .planar_key_frame(0.0, 0.0, 0.0)
        .planar_key_frame(10.0, 10.0, 0.0)
        .build()
        .unwrap();

    let pose = animation.sample(5.0);
    assert_eq!(pose.position.x, 5.0);
    assert_eq!(pose.position.y, 0.0);
}

#[test]
fn single_keyframe_is_rejected() {
    let result = PoseAnimation::builder("single", 1.0, true)
        .planar_key_frame(1.0, 0.0, 0.0)
        .build();
    assert!(result.is_err());
}
