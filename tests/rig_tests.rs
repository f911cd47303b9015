//! Arm Rig Tests
//!
//! Tests for:
//! - Frame order (animation, solve, pose) and target visibility
//! - Target dragging while idle and during playback
//! - Recording from the live target and motion modes
//! - Settings loading

use std::path::PathBuf;

use glam::Vec3;

use armature::app::{ArmRig, MotionMode, RigSettings};
use armature::scene::arm::END_EFFECTOR;
use armature::{ArmatureError, KinematicChain};

const DT: f32 = 1.0 / 60.0;

fn rig() -> ArmRig {
    ArmRig::new(&RigSettings::default()).unwrap()
}

fn record(rig: &mut ArmRig, points: &[Vec3]) {
    for &p in points {
        assert!(rig.drag_target(p));
        rig.add_keyframe();
    }
}

// ============================================================================
// Frame order
// ============================================================================

#[test]
fn update_solves_toward_animated_target() {
    let mut rig = rig();
    let start = rig.target().transform.position;
    record(&mut rig, &[Vec3::new(0.2, 0.4, 0.3)]);
    rig.drag_target(start);
    assert!(rig.play());

    rig.update(0.5);

    // Same frame: the solve already sees the position the animation wrote.
    let target = rig.target().transform.position;
    assert!(target.abs_diff_eq(start.lerp(Vec3::new(0.2, 0.4, 0.3), 0.5), 1e-4));
    assert!(rig.effector_position().unwrap().distance(target) < 1e-2);
    assert!(!rig.target().visible);
}

#[test]
fn pose_follows_solved_chain() {
    let mut rig = rig();
    rig.drag_target(Vec3::new(-0.3, 0.2, 0.4));
    rig.update(DT);

    let gripper = rig.gripper_origin().unwrap();
    let key = rig.skeleton().find(END_EFFECTOR).unwrap();
    let up = rig
        .skeleton()
        .world_matrix(key)
        .unwrap()
        .transform_vector3(Vec3::Y)
        .normalize();
    let effector = rig.effector_position().unwrap();
    assert!(up.abs_diff_eq((effector - gripper).normalize(), 1e-3));
}

#[test]
fn target_reappears_when_playback_ends() {
    let mut rig = rig();
    record(&mut rig, &[Vec3::new(0.4, 0.1, -0.2), Vec3::new(0.1, 0.5, 0.0)]);
    rig.play();

    let mut frames = 0;
    while rig.animation().is_playing() {
        rig.update(DT);
        frames += 1;
        assert!(frames < 1000);
    }
    rig.update(DT);
    assert!(rig.target().visible);
}

// ============================================================================
// Dragging
// ============================================================================

#[test]
fn drag_is_ignored_during_playback() {
    let mut rig = rig();
    record(&mut rig, &[Vec3::new(0.4, 0.1, -0.2)]);
    rig.play();
    rig.update(DT);

    let before = rig.target().transform.position;
    assert!(!rig.drag_target(Vec3::new(9.0, 9.0, 9.0)));
    assert_eq!(rig.target().transform.position, before);

    rig.stop();
    assert!(rig.target().visible);
    assert!(rig.drag_target(Vec3::new(0.1, 0.1, 0.1)));
}

#[test]
fn keyframes_record_live_target() {
    let mut rig = rig();
    let points = [Vec3::new(0.4, 0.1, -0.2), Vec3::new(0.1, 0.5, 0.0)];
    record(&mut rig, &points);

    let keyframes = rig.animation().keyframes();
    assert_eq!(keyframes.len(), 3);
    assert_eq!(keyframes[1].position(), points[0]);
    assert_eq!(keyframes[2].position(), points[1]);

    rig.reset_animation();
    assert_eq!(rig.animation().keyframes().len(), 1);
    assert!(!rig.play());
}

#[test]
fn spline_mode_uses_curve_samples() {
    let mut rig = rig();
    rig.set_motion_mode(MotionMode::Spline);
    record(
        &mut rig,
        &[Vec3::new(0.4, 0.1, -0.2), Vec3::new(0.1, 0.5, 0.0), Vec3::new(-0.3, 0.2, 0.2)],
    );
    rig.drag_target(Vec3::new(0.5, 0.0, -0.5));
    assert!(rig.play());
    assert_eq!(rig.animation().curve_samples().len(), 91);

    rig.update(1.0);
    assert!(rig.target().transform.position.abs_diff_eq(Vec3::new(0.4, 0.1, -0.2), 1e-3));
}

#[test]
fn debug_mode_toggles_skeleton() {
    let mut rig = rig();
    rig.set_debug_mode(true);
    assert!(rig.debug_mode());
    let root = rig.skeleton().root();
    assert!(rig.skeleton().get(root).unwrap().debug_mode());

    assert!(!rig.set_rotation("elbow", glam::Quat::IDENTITY));
}

#[test]
fn chain_has_one_link_per_arm_segment() {
    let rig = rig();
    assert_eq!(rig.chain().link_count(), 4);
    assert!((rig.chain().base().y - (-0.55)).abs() < 1e-6);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn settings_load_from_file() {
    let path: PathBuf = std::env::temp_dir().join(format!("armature_rig_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "motion_mode": "spline", "ground_offset": 0.0, "initial_target": [0.2, 0.8, 0.1] }"#,
    )
    .unwrap();

    let settings = RigSettings::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(settings.motion_mode, MotionMode::Spline);
    let rig = ArmRig::new(&settings).unwrap();
    assert_eq!(rig.target().transform.position, Vec3::new(0.2, 0.8, 0.1));
    assert!((rig.chain().base().y - 0.05).abs() < 1e-6);
}

#[test]
fn malformed_settings_are_errors() {
    assert!(matches!(
        RigSettings::from_json_str("{ not json"),
        Err(ArmatureError::JsonError(_))
    ));
    assert!(matches!(
        RigSettings::from_json_str(r#"{ "solver": { "max_iterations": 0 } }"#),
        Err(ArmatureError::InvalidSettings(_))
    ));
}
