use glam::Vec3;

/// Anything whose position a [`KeyframeAnimation`](crate::KeyframeAnimation)
/// can read and drive.
///
/// The animation never owns its target: the host passes the node in on
/// `play` (to snapshot the live position) and on every `update`.
pub trait AnimatedNode {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

impl AnimatedNode for Vec3 {
    #[inline]
    fn position(&self) -> Vec3 {
        *self
    }

    #[inline]
    fn set_position(&mut self, position: Vec3) {
        *self = position;
    }
}
