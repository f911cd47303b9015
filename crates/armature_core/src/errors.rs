//! Error Types
//!
//! This module defines the error type shared by every Armature crate.
//!
//! # Overview
//!
//! The animation path itself never fails: recoverable precondition problems
//! (playing an empty recording, too few keyframes for a spline) are reported
//! through `log::warn!` and a `false` return. [`ArmatureError`] covers the
//! remaining failure modes:
//! - Invalid or unreadable configuration
//! - Segment lookups by name that match nothing
//! - Skeleton attach/detach ordering mistakes
//!
//! # Usage
//!
//! ```rust,ignore
//! use armature_core::{ArmatureError, Result};
//!
//! fn load() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Armature crates.
#[derive(Error, Debug)]
pub enum ArmatureError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A settings value is outside its accepted range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// File I/O error while reading a settings file.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Segment Tree Errors
    // ========================================================================
    /// No segment carries the requested name.
    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    /// `attach_skeleton` was called on a tree whose links are already bound.
    #[error("Skeleton is already attached to a kinematic chain")]
    SkeletonAlreadyAttached,

    /// Geometry was requested before link lengths were known.
    #[error("Skeleton must be attached before geometry can be built")]
    SkeletonNotAttached,
}

/// Alias for `Result<T, ArmatureError>`.
pub type Result<T> = std::result::Result<T, ArmatureError>;
