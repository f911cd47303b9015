//! Host-side assembly of the arm rig.
//!
//! [`ArmRig`] owns the target, the keyframe animation, the segment tree and
//! the chain, and exposes the entry points an interactive front end calls:
//! record / play / stop, drag the target, toggle debug display.

pub mod rig;
pub mod settings;

pub use rig::ArmRig;
pub use settings::{MotionMode, RigSettings};
