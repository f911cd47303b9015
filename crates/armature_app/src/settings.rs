//! Rig Settings
//!
//! Configuration for [`ArmRig`](crate::ArmRig). Every field has a default
//! matching the stock scene, so partial JSON files are accepted:
//!
//! ```rust,ignore
//! use armature_app::{RigSettings, MotionMode};
//!
//! let settings = RigSettings {
//!     motion_mode: MotionMode::Spline,
//!     ..Default::default()
//! };
//!
//! let from_disk = RigSettings::load("rig.json")?;
//! ```
//!
//! ```json
//! {
//!     "motion_mode": "spline",
//!     "animation": { "curve_fps": 60.0, "curve_type": { "kind": "chordal" } },
//!     "solver": { "max_iterations": 40 }
//! }
//! ```

use std::path::Path;

use armature_animation::AnimationSettings;
use armature_core::{ArmatureError, Result};
use armature_scene::SolverSettings;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How playback moves the target between keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Straight lines between keyframes.
    #[default]
    Linear,
    /// Catmull-Rom spline through all keyframes (needs at least three).
    Spline,
}

impl MotionMode {
    #[inline]
    #[must_use]
    pub fn uses_curve(self) -> bool {
        matches!(self, Self::Spline)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    pub animation: AnimationSettings,
    pub solver: SolverSettings,
    pub motion_mode: MotionMode,
    /// Where the draggable target starts.
    pub initial_target: Vec3,
    /// Vertical offset of the arm's root (the ground plane height).
    pub ground_offset: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            animation: AnimationSettings::default(),
            solver: SolverSettings::default(),
            motion_mode: MotionMode::Linear,
            initial_target: Vec3::new(0.5, 0.0, -0.5),
            ground_offset: -0.6,
        }
    }
}

impl RigSettings {
    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        self.solver.validate()?;

        if !self.initial_target.is_finite() {
            return Err(ArmatureError::InvalidSettings(format!(
                "initial_target must be finite, got {}",
                self.initial_target
            )));
        }
        if !self.ground_offset.is_finite() {
            return Err(ArmatureError::InvalidSettings(format!(
                "ground_offset must be finite, got {}",
                self.ground_offset
            )));
        }
        Ok(())
    }

    /// Parses and validates settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded rig settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
