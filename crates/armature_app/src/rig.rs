//! The assembled scene: a draggable target, the animation that can drive it,
//! the standard arm and the chain it is solved with.
//!
//! Per frame, [`ArmRig::update`] runs animation, then the solve, then pose
//! propagation. The target is hidden for as long as playback owns it.

use glam::{Quat, Vec3};

use armature_animation::{AnimatedNode, KeyframeAnimation};
use armature_core::Result;
use armature_scene::arm::{self, LINK_BASE_OFFSET};
use armature_scene::{FabrikChain, KinematicChain, Node, SegmentTree, standard_arm};

use crate::settings::{MotionMode, RigSettings};

pub struct ArmRig<C: KinematicChain = FabrikChain> {
    target: Node,
    animation: KeyframeAnimation,
    skeleton: SegmentTree,
    chain: C,
    motion_mode: MotionMode,
    debug_mode: bool,
}

impl ArmRig<FabrikChain> {
    /// Builds the stock rig with a [`FabrikChain`] based at the top of the
    /// arm's base plate.
    pub fn new(settings: &RigSettings) -> Result<Self> {
        settings.validate()?;
        let base = Vec3::new(0.0, settings.ground_offset, 0.0) + LINK_BASE_OFFSET;
        Self::with_chain(settings, FabrikChain::with_settings(base, settings.solver))
    }
}

impl<C: KinematicChain> ArmRig<C> {
    /// Builds the rig around an empty `chain`. The chain must already be
    /// positioned in world space; the arm's links are appended to it.
    pub fn with_chain(settings: &RigSettings, mut chain: C) -> Result<Self> {
        settings.validate()?;

        let mut skeleton = standard_arm();
        let links = skeleton.attach_skeleton(&mut chain)?;
        skeleton.build_geometry()?;

        let root = skeleton.root();
        if let Some(root) = skeleton.get_mut(root) {
            root.transform.position.y = settings.ground_offset;
        }

        let mut target = Node::with_name("target");
        target.set_position(settings.initial_target);
        target.update_matrix();

        let animation = KeyframeAnimation::with_settings(settings.animation);

        let mut rig = Self {
            target,
            animation,
            skeleton,
            chain,
            motion_mode: settings.motion_mode,
            debug_mode: false,
        };
        rig.solve_and_pose();

        log::info!(
            "Arm rig ready: {} segments, {links} links, target at {}",
            rig.skeleton.len(),
            settings.initial_target
        );
        Ok(rig)
    }

    /// Advances one frame: animation, IK solve, pose propagation.
    pub fn update(&mut self, delta_time: f32) {
        self.animation
            .update(delta_time, self.motion_mode.uses_curve(), &mut self.target);
        self.target.visible = !self.animation.is_playing();
        self.target.update_matrix();
        self.solve_and_pose();
    }

    fn solve_and_pose(&mut self) {
        self.chain.solve(self.target.position());
        self.skeleton.update(&self.chain);
    }

    // ========================================================================
    // Host entry points
    // ========================================================================

    /// Records the target's current position as the next keyframe.
    pub fn add_keyframe(&mut self) {
        self.animation.add_keyframe(self.target.position());
    }

    /// Starts playback from the target's current position.
    pub fn play(&mut self) -> bool {
        self.animation.play(&self.target)
    }

    pub fn stop(&mut self) {
        self.animation.stop();
        self.target.visible = true;
    }

    /// Drops all recorded keyframes except the anchor.
    pub fn reset_animation(&mut self) {
        self.animation.clear_keyframes();
        self.target.visible = true;
    }

    /// Moves the target. Ignored while an animation is playing.
    pub fn drag_target(&mut self, position: Vec3) -> bool {
        if self.animation.is_playing() {
            log::debug!("Ignoring target drag during playback");
            return false;
        }
        self.target.set_position(position);
        self.target.update_matrix();
        true
    }

    pub fn set_debug_mode(&mut self, debug: bool) {
        self.debug_mode = debug;
        self.skeleton.set_debug_mode(debug);
    }

    /// Sets the local rotation of the named segment. The next
    /// [`update`](Self::update) overrides it for segments that carry a link.
    pub fn set_rotation(&mut self, name: &str, rotation: Quat) -> bool {
        let found = self.skeleton.set_rotation(name, rotation);
        if !found {
            log::warn!("No segment named '{name}'");
        }
        found
    }

    pub fn set_motion_mode(&mut self, mode: MotionMode) {
        if mode.uses_curve() && !self.animation.uses_curve(true) {
            log::warn!("Spline motion needs at least three keyframes; playback stays linear for now.");
        }
        self.motion_mode = mode;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn target(&self) -> &Node {
        &self.target
    }

    #[inline]
    #[must_use]
    pub fn animation(&self) -> &KeyframeAnimation {
        &self.animation
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &SegmentTree {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn chain(&self) -> &C {
        &self.chain
    }

    #[inline]
    #[must_use]
    pub fn motion_mode(&self) -> MotionMode {
        self.motion_mode
    }

    #[inline]
    #[must_use]
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Solved end point of the last link.
    #[must_use]
    pub fn effector_position(&self) -> Option<Vec3> {
        let last = self.chain.link_count().checked_sub(1)?;
        self.chain.end_point(last)
    }

    /// World-space origin of the end effector segment.
    #[must_use]
    pub fn gripper_origin(&self) -> Option<Vec3> {
        let key = self.skeleton.find(arm::END_EFFECTOR)?;
        self.skeleton
            .world_matrix(key)
            .map(|m| m.translation.into())
    }
}
