//! The standard five-role robot arm.
//!
//! ```text
//! root ─ upper_arm (0.5) ─ middle_arm (0.4) ─ lower_arm (0.4) ─ end_effector (0.2)
//! ```
//!
//! The root has no link; every other role adds one link pointing up (+Y).

use glam::Vec3;

use crate::segment::{Segment, SegmentShape};
use crate::transform::Transform;
use crate::tree::SegmentTree;

pub const ROOT: &str = "root";
pub const UPPER_ARM: &str = "upper_arm";
pub const MIDDLE_ARM: &str = "middle_arm";
pub const LOWER_ARM: &str = "lower_arm";
pub const END_EFFECTOR: &str = "end_effector";

/// Where the first link starts, relative to the root segment (top of the
/// base plate).
pub const LINK_BASE_OFFSET: Vec3 = Vec3::new(0.0, 0.05, 0.0);

struct Role {
    name: &'static str,
    length: f32,
    shape: SegmentShape,
    /// Extra turn about Y after the 45° elbow bend.
    twist_degrees: Option<f32>,
}

const ROLES: [Role; 4] = [
    Role { name: UPPER_ARM, length: 0.5, shape: SegmentShape::Limb, twist_degrees: None },
    Role { name: MIDDLE_ARM, length: 0.4, shape: SegmentShape::Limb, twist_degrees: None },
    Role { name: LOWER_ARM, length: 0.4, shape: SegmentShape::Limb, twist_degrees: None },
    Role { name: END_EFFECTOR, length: 0.2, shape: SegmentShape::Gripper, twist_degrees: Some(90.0) },
];

/// Builds the standard arm as a straight parent-to-child chain.
///
/// The tree is not yet attached to any chain.
#[must_use]
pub fn standard_arm() -> SegmentTree {
    let mut tree = SegmentTree::new(Segment::new(ROOT).with_shape(SegmentShape::Base));
    let mut parent = tree.root();

    for (i, role) in ROLES.iter().enumerate() {
        let mut rest = Transform::new();
        if i > 0 {
            rest.rotate_z(45f32.to_radians());
        }
        if let Some(twist) = role.twist_degrees {
            rest.rotate_y(twist.to_radians());
        }

        let segment = Segment::new(role.name)
            .with_link(Vec3::Y, role.length)
            .with_shape(role.shape)
            .with_rest_rotation(rest.rotation);

        if let Some(key) = tree.add_child(parent, segment) {
            parent = key;
        }
    }

    tree
}
