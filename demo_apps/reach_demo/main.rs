//! Reach Demo
//!
//! Headless scripted session with the IK arm:
//! 1. Drags the target to a few points, recording a keyframe at each.
//! 2. Replays them at 60 Hz, logging the end effector as it follows.
//!
//! Usage:
//!   reach_demo [settings.json]
//!
//! Run with `RUST_LOG=info` (or `debug`) to see the output.

use anyhow::Context;
use armature::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
/// Log every n-th frame of playback.
const LOG_EVERY: usize = 15;

const WAYPOINTS: [Vec3; 4] = [
    Vec3::new(0.6, 0.1, 0.2),
    Vec3::new(0.1, 0.5, 0.5),
    Vec3::new(-0.5, 0.2, 0.1),
    Vec3::new(-0.2, -0.1, -0.6),
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => RigSettings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        None => RigSettings::default(),
    };

    let mut rig = ArmRig::new(&settings).context("building arm rig")?;
    rig.set_debug_mode(true);

    for point in WAYPOINTS {
        rig.drag_target(point);
        rig.update(FRAME_TIME);
        rig.add_keyframe();
    }
    log::info!(
        "Recorded {} keyframes, {:.1}s of motion ({:?})",
        rig.animation().keyframes().len() - 1,
        rig.animation().duration(),
        rig.motion_mode()
    );

    // Start from somewhere else so the anchor keyframe differs from the last one.
    rig.drag_target(settings.initial_target);
    rig.update(FRAME_TIME);

    if !rig.play() {
        anyhow::bail!("nothing to play");
    }

    let mut frame = 0;
    while rig.animation().is_playing() {
        rig.update(FRAME_TIME);
        if frame % LOG_EVERY == 0 {
            let target = rig.target().transform.position;
            let effector = rig.effector_position().unwrap_or(Vec3::ZERO);
            log::info!(
                "t={:5.2}s target={target:.3} effector={effector:.3} error={:.4}",
                rig.animation().current_time(),
                target.distance(effector)
            );
        }
        frame += 1;
    }

    log::info!("Playback finished after {frame} frames");
    Ok(())
}
