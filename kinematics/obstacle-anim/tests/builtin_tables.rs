//! Integration tests for the embedded obstacle trajectory tables

use glam::DVec3;
use obstacle_anim::animation::{Interpolation, KeyFrame, Pose};
use obstacle_anim::{ObstacleRegistry, PoseAnimation};
use test_case::test_case;

fn builtin(id: &str) -> PoseAnimation {
    ObstacleRegistry::builtin()
        .expect("built-in tables parse")
        .build(id)
        .expect("built-in table is valid")
}

#[test]
fn test_every_builtin_table_builds() {
    let registry = ObstacleRegistry::builtin().unwrap();
    let report = registry.build_all();

    assert!(report.is_clean(), "rejected: {:?}", report.rejected);
    assert_eq!(report.animations.len(), 5);
    for animation in &report.animations {
        assert!(animation.is_looping());
        assert_eq!(animation.interpolation(), Interpolation::Linear);
        assert_eq!(
            animation.key_frames().last().unwrap().time,
            animation.duration()
        );
    }
}

#[test_case("obs_7", 140.57, 10; "obs 7")]
#[test_case("obs_32", 78.99, 11; "obs 32")]
#[test_case("obs_98", 270.58, 9; "obs 98")]
#[test_case("obs_99", 113.33, 8; "obs 99")]
#[test_case("obs_180", 147.87, 11; "obs 180")]
fn test_builtin_table_shape(id: &str, duration: f64, key_frames: usize) {
    let animation = builtin(id);
    assert_eq!(animation.name(), id);
    assert_eq!(animation.duration(), duration);
    assert_eq!(animation.key_frame_count(), key_frames);
}

#[test]
fn test_obs_32_midpoint() {
    let animation = builtin("obs_32");
    assert_eq!(animation.duration(), 78.99);

    let pose = animation.sample(32.27);
    assert!((pose.position.x - 4.45).abs() < 0.01, "x = {}", pose.position.x);
    assert!((pose.position.y - 5.37).abs() < 0.01, "y = {}", pose.position.y);
    assert_eq!(pose.position.z, 0.0);
    assert_eq!(pose.rotation, glam::DQuat::IDENTITY);
}

#[test]
fn test_obs_32_near_duplicate_times_are_separate_keyframes() {
    let animation = builtin("obs_32");
    let times: Vec<f64> = animation.key_frames().times().collect();
    assert!(times.contains(&55.36));
    assert!(times.contains(&55.94));
    assert_eq!(animation.sample(55.36).position, DVec3::new(-1.0, 3.0, 0.0));
    assert_eq!(animation.sample(55.94).position, DVec3::new(-1.11, 3.03, 0.0));
}

#[test]
fn test_obs_98_loop_jumps_back_to_start() {
    let animation = builtin("obs_98");

    assert!(!animation.is_seamless(1e-6));
    assert_eq!(animation.start_pose(), Pose::planar(-5.78, 10.0));
    assert_eq!(animation.end_pose(), Pose::planar(0.0, -10.0));

    // Exactly at the boundary the next cycle has begun
    assert_eq!(animation.sample(270.58), animation.start_pose());
    assert!(
        animation
            .sample(270.579_999)
            .approx_eq(&animation.end_pose(), 1e-4)
    );
}

#[test]
fn test_sample_hits_every_keyframe_exactly() {
    let registry = ObstacleRegistry::builtin().unwrap();
    for animation in registry.build_all().animations {
        let key_frames: Vec<KeyFrame> = animation.key_frames().iter().copied().collect();
        // The last keyframe sits on the loop boundary and wraps to the first
        for kf in &key_frames[..key_frames.len() - 1] {
            assert_eq!(
                animation.sample(kf.time).position,
                kf.translation,
                "{} at t={}",
                animation.name(),
                kf.time
            );
        }
    }
}

#[test]
fn test_builtin_bounds_stay_inside_arena() {
    let registry = ObstacleRegistry::builtin().unwrap();
    for record in registry.records() {
        let bounds = record.bounds().unwrap();
        assert!(bounds.min_x >= -10.0 && bounds.max_x <= 10.0, "{}", record.id);
        assert!(bounds.min_y >= -10.0 && bounds.max_y <= 10.0, "{}", record.id);
    }
}

#[test]
fn test_builtin_round_trips_through_yaml() {
    let registry = ObstacleRegistry::builtin().unwrap();
    for record in registry.records() {
        let yaml = record.to_yaml_string().unwrap();
        let parsed = obstacle_anim::TrajectoryRecord::from_yaml_str(&yaml).unwrap();
        assert_eq!(&parsed, record);
    }
}
