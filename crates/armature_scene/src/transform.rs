use glam::{Affine3A, Mat3, Quat, Vec3};

/// Transform component.
///
/// Holds a node's local position, rotation and scale (TRS) together with the
/// cached local/world matrices and the shadow state used for dirty checks.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    // ========================================================================
    // Dirty-checked matrix update
    // ========================================================================

    /// Rebuilds the local matrix if position, rotation or scale changed since
    /// the last call. Returns whether anything changed.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    /// Rotates about the local X axis.
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_x(angle);
    }

    /// Rotates about the local Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_y(angle);
    }

    /// Rotates about the local Z axis.
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_z(angle);
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// Written by the owner once the parent's world matrix is known.
    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Turns this transform so its local +Z axis faces `target`.
    ///
    /// `target` and `up` are in world space; `parent_world` is the world
    /// matrix of the parent this transform is expressed in. This is the
    /// object convention (+Z forward), not the camera one (-Z forward).
    pub fn look_at(&mut self, target: Vec3, up: Vec3, parent_world: &Affine3A) {
        let origin = parent_world.transform_point3(self.position);
        let world_rotation = facing_rotation(target - origin, up);

        let (_, parent_rotation, _) = parent_world.to_scale_rotation_translation();
        self.rotation = parent_rotation.inverse() * world_rotation;
    }

}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation whose +Z axis points along `forward`, with +Y as close to `up`
/// as possible.
fn facing_rotation(forward: Vec3, up: Vec3) -> Quat {
    let mut z = forward.try_normalize().unwrap_or(Vec3::Z);

    let mut x = up.cross(z);
    if x.length_squared() < 1e-12 {
        // forward is parallel to up
        if (up.z.abs() - 1.0).abs() < f32::EPSILON {
            z.x += 1e-4;
        } else {
            z.z += 1e-4;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
