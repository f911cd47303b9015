//! # Armature
//!
//! Keyframe playback and hierarchical pose propagation for an
//! inverse-kinematics robot arm.
//!
//! A draggable target drives a kinematic chain. Target positions can be
//! recorded as keyframes and replayed, either piecewise-linearly or along a
//! Catmull-Rom spline. After every solve the arm's segment tree re-orients
//! each segment toward the solved end of its link.
//!
//! ```rust,ignore
//! use armature::prelude::*;
//!
//! let mut rig = ArmRig::new(&RigSettings::default())?;
//! rig.drag_target(Vec3::new(0.3, 0.2, 0.4));
//! rig.add_keyframe();
//! rig.drag_target(Vec3::new(-0.4, 0.1, 0.2));
//! rig.add_keyframe();
//! rig.play();
//!
//! while rig.animation().is_playing() {
//!     rig.update(1.0 / 60.0);
//! }
//! ```

pub use armature_animation as animation;
pub use armature_app as app;
pub use armature_core as errors;
pub use armature_scene as scene;

pub use armature_animation::{
    AnimatedNode, AnimationSettings, CatmullRomCurve3, CurveType, Keyframe, KeyframeAnimation,
};
pub use armature_app::{ArmRig, MotionMode, RigSettings};
pub use armature_core::{ArmatureError, Result};
pub use armature_scene::{
    FabrikChain, KinematicChain, Node, Segment, SegmentKey, SegmentShape, SegmentTree,
    SolverSettings, Transform, standard_arm,
};

pub mod prelude {
    pub use crate::{
        AnimatedNode, ArmRig, ArmatureError, KeyframeAnimation, KinematicChain, MotionMode,
        RigSettings, SegmentTree,
    };
    pub use glam::{Quat, Vec3};
}
