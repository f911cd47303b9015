use glam::Vec3;
use serde::{Deserialize, Serialize};

use armature_core::{ArmatureError, Result};

use crate::curve::{CatmullRomCurve3, CurveType};
use crate::keyframe::Keyframe;
use crate::target::AnimatedNode;

/// Seconds between consecutive recorded keyframes.
pub const KEYFRAME_SPACING: f32 = 1.0;

/// Default resampling rate of the spline, in samples per second.
pub const DEFAULT_CURVE_FPS: f32 = 30.0;

/// Minimum keyframe count for spline playback.
const MIN_CURVE_KEYFRAMES: usize = 3;

/// Tunables for [`KeyframeAnimation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Spline resampling rate (samples per second of playback).
    pub curve_fps: f32,
    pub curve_type: CurveType,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            curve_fps: DEFAULT_CURVE_FPS,
            curve_type: CurveType::default(),
        }
    }
}

impl AnimationSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.curve_fps.is_finite() || self.curve_fps <= 0.0 {
            return Err(ArmatureError::InvalidSettings(format!(
                "curve_fps must be a positive number, got {}",
                self.curve_fps
            )));
        }
        if let CurveType::Uniform { tension } = self.curve_type
            && !tension.is_finite()
        {
            return Err(ArmatureError::InvalidSettings(format!(
                "curve tension must be finite, got {tension}"
            )));
        }
        Ok(())
    }
}

/// Records target positions as keyframes and replays them on an
/// [`AnimatedNode`], either piecewise-linearly or along a resampled
/// Catmull-Rom spline.
///
/// # Lifecycle
///
/// 1. [`add_keyframe`](Self::add_keyframe) appends points one second apart.
/// 2. [`play`](Self::play) snapshots the node's live position into the anchor
///    keyframe, rebuilds the spline samples and rewinds.
/// 3. [`update`](Self::update) advances time each frame and writes the
///    interpolated position back to the node, until the last keyframe has
///    been passed or [`stop`](Self::stop) is called.
#[derive(Debug, Clone)]
pub struct KeyframeAnimation {
    keyframes: Vec<Keyframe>,

    curve: CatmullRomCurve3,
    curve_samples: Vec<Keyframe>,
    /// Keyframe count the current samples were built from.
    sampled_keyframes: usize,
    curve_fps: f32,

    playing: bool,
    current_time: f32,
    current_keyframe: usize,
}

impl Default for KeyframeAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyframeAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(AnimationSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: AnimationSettings) -> Self {
        let mut curve = CatmullRomCurve3::new(settings.curve_type);
        curve.push(Vec3::ZERO);

        Self {
            keyframes: vec![Keyframe::default()],
            curve,
            curve_samples: Vec::new(),
            sampled_keyframes: 0,
            curve_fps: settings.curve_fps,
            playing: false,
            current_time: 0.0,
            current_keyframe: 0,
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Appends a keyframe one second after the last one.
    pub fn add_keyframe(&mut self, position: Vec3) {
        let timestamp = self.duration() + KEYFRAME_SPACING;
        self.keyframes.push(Keyframe::new(timestamp, position));
        self.curve.push(position);

        log::debug!("Keyframe {} recorded at {timestamp}s: {position}", self.keyframes.len() - 1);
    }

    /// Drops every recorded keyframe, keeping only the anchor, and stops
    /// playback.
    pub fn clear_keyframes(&mut self) {
        self.keyframes.truncate(1);
        self.curve.clear();
        self.curve.push(self.keyframes[0].position());
        self.curve_samples.clear();
        self.sampled_keyframes = 0;
        self.playing = false;
        self.current_time = 0.0;
        self.current_keyframe = 0;
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// Starts (or restarts) playback from wherever `node` currently sits.
    ///
    /// Returns `false` without touching any state when there is nothing to
    /// animate. With exactly two keyframes playback starts but only linear
    /// interpolation is available.
    pub fn play<N: AnimatedNode + ?Sized>(&mut self, node: &N) -> bool {
        if self.keyframes.len() < 2 {
            log::warn!("No animation to play. Please add a keyframe.");
            return false;
        }

        let anchor = node.position();
        self.keyframes[0].set_position(anchor);
        self.curve.set_point(0, anchor);

        if self.uses_curve(true) {
            self.rebuild_curve_samples();
        } else {
            self.curve_samples.clear();
            self.sampled_keyframes = 0;
            log::warn!(
                "Insufficient keyframes to generate a curve; only linear interpolation will be available."
            );
        }

        self.current_time = 0.0;
        self.current_keyframe = 1;
        self.playing = true;

        log::info!(
            "Playing {} keyframes over {}s ({} curve samples)",
            self.keyframes.len(),
            self.duration(),
            self.curve_samples.len()
        );
        true
    }

    /// Pauses playback. Time and keyframe index are left as they are.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Advances playback by `delta_time` seconds and writes the new position
    /// to `node`. Does nothing while stopped.
    ///
    /// At most one keyframe boundary is crossed per call; if `delta_time`
    /// spans several intervals the remaining ones are caught up on later
    /// calls.
    pub fn update<N: AnimatedNode + ?Sized>(&mut self, delta_time: f32, use_curve: bool, node: &mut N) {
        if !self.playing {
            return;
        }

        self.current_time += delta_time;

        if self.current_time <= self.keyframes[self.current_keyframe].timestamp() {
            self.apply(use_curve, node);
        } else if self.current_keyframe < self.keyframes.len() - 1 {
            self.current_keyframe += 1;
            self.apply(use_curve, node);
        } else {
            self.playing = false;
            log::debug!("Playback finished at {}s", self.current_time);
        }
    }

    /// Whether spline playback is in effect for the given motion request.
    ///
    /// Both [`play`](Self::play) (curve generation) and
    /// [`update`](Self::update) (path selection) go through this predicate.
    #[inline]
    #[must_use]
    pub fn uses_curve(&self, use_curve: bool) -> bool {
        use_curve && self.keyframes.len() >= MIN_CURVE_KEYFRAMES
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Spline samples built by the last [`play`](Self::play). Empty when that
    /// call had fewer than three keyframes.
    #[inline]
    #[must_use]
    pub fn curve_samples(&self) -> &[Keyframe] {
        &self.curve_samples
    }

    #[inline]
    #[must_use]
    pub fn curve(&self) -> &CatmullRomCurve3 {
        &self.curve
    }

    #[inline]
    #[must_use]
    pub fn curve_fps(&self) -> f32 {
        self.curve_fps
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Index of the keyframe closing the interval being interpolated.
    #[inline]
    #[must_use]
    pub fn current_keyframe(&self) -> usize {
        self.current_keyframe
    }

    /// Timestamp of the last keyframe.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, Keyframe::timestamp)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn rebuild_curve_samples(&mut self) {
        let duration = self.duration();
        let divisions = (self.curve_fps * duration).ceil() as usize;
        let step = duration / divisions as f32;

        self.curve_samples = self
            .curve
            .sample_points(divisions)
            .into_iter()
            .enumerate()
            .map(|(i, position)| Keyframe::new(i as f32 * step, position))
            .collect();
        self.sampled_keyframes = self.keyframes.len();
    }

    fn apply<N: AnimatedNode + ?Sized>(&self, use_curve: bool, node: &mut N) {
        let position = if self.uses_curve(use_curve) && self.samples_cover_current() {
            self.lerp_curve_samples()
        } else {
            self.lerp_keyframes()
        };
        node.set_position(position);
    }

    /// Keyframes recorded after play() are not in the samples, either because
    /// none were built or because they end at the old last keyframe.
    fn samples_cover_current(&self) -> bool {
        self.curve_samples.len() >= 2 && self.current_keyframe < self.sampled_keyframes
    }

    fn lerp_keyframes(&self) -> Vec3 {
        let prev = &self.keyframes[self.current_keyframe - 1];
        let next = &self.keyframes[self.current_keyframe];
        lerp_between(prev, next, self.current_time)
    }

    fn lerp_curve_samples(&self) -> Vec3 {
        let last = self.curve_samples.len() - 1;
        let frame = ((self.current_time * self.curve_fps).ceil() as usize).clamp(1, last);
        lerp_between(&self.curve_samples[frame - 1], &self.curve_samples[frame], self.current_time)
    }
}

/// Linear blend between two keyframes at absolute time `time`.
///
/// The blend factor is not clamped: a tick that lands past `next` on the
/// frame it crosses a boundary extrapolates slightly beyond it.
fn lerp_between(prev: &Keyframe, next: &Keyframe, time: f32) -> Vec3 {
    let alpha = (time - prev.timestamp()) / (next.timestamp() - prev.timestamp());
    prev.position().lerp(next.position(), alpha)
}
