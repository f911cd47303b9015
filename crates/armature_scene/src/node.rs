use armature_animation::AnimatedNode;
use glam::{Affine3A, Vec3};

use crate::transform::Transform;

/// A free-standing scene object, such as the draggable IK target.
///
/// Unlike a [`Segment`](crate::Segment) it has no place in the arm's tree;
/// its local transform is its world transform.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    /// Hidden while an animation owns the node's position.
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("")
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            visible: true,
        }
    }

    /// Refreshes the cached matrices and returns the world matrix.
    pub fn update_matrix(&mut self) -> Affine3A {
        if self.transform.update_local_matrix() {
            let local = *self.transform.local_matrix();
            self.transform.set_world_matrix(local);
        }
        *self.transform.world_matrix()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedNode for Transform {
    #[inline]
    fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

impl AnimatedNode for Node {
    #[inline]
    fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }
}
