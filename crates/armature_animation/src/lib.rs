//! Keyframe animation for a single animated point.
//!
//! - [`Keyframe`]: a timestamped position
//! - [`CatmullRomCurve3`]: open spline through the keyframe positions
//! - [`KeyframeAnimation`]: recording, resampling and time-based playback
//! - [`AnimatedNode`]: the position the animation reads and drives

pub mod animation;
pub mod curve;
pub mod keyframe;
pub mod target;

pub use animation::{AnimationSettings, DEFAULT_CURVE_FPS, KEYFRAME_SPACING, KeyframeAnimation};
pub use curve::{CatmullRomCurve3, CurveType};
pub use keyframe::Keyframe;
pub use target::AnimatedNode;
