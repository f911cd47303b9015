use glam::Vec3;

/// A recorded `(time, position)` control point.
///
/// Keyframes are plain values: the position is copied in on construction, so
/// later changes to the caller's vector never reach a stored keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keyframe {
    timestamp: f32,
    position: Vec3,
}

impl Keyframe {
    #[must_use]
    pub fn new(timestamp: f32, position: Vec3) -> Self {
        Self {
            timestamp,
            position,
        }
    }

    /// Seconds since the start of the animation.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> f32 {
        self.timestamp
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Only the anchor keyframe is ever re-positioned after creation.
    #[inline]
    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_origin_at_zero() {
        let k = Keyframe::default();
        assert_eq!(k.timestamp(), 0.0);
        assert_eq!(k.position(), Vec3::ZERO);
    }

    #[test]
    fn stores_a_copy_of_the_position() {
        let mut source = Vec3::new(1.0, 2.0, 3.0);
        let k = Keyframe::new(1.0, source);
        source.x = 99.0;
        assert_eq!(k.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(source.x, 99.0);
    }
}
