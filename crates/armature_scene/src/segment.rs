use glam::{Affine3A, Quat, Vec3};
use smallvec::SmallVec;

use crate::SegmentKey;
use crate::transform::Transform;

/// Size of the axes gizmo every segment carries for debug display.
pub const AXES_HELPER_SIZE: f32 = 0.07;

/// The rigid link a segment contributes to the kinematic chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSpec {
    /// Rest direction of the link, in chain space.
    pub direction: Vec3,
    pub length: f32,
}

/// Which renderable parts a segment builds around itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentShape {
    #[default]
    None,
    /// Base plate with a dome on top.
    Base,
    /// Box along the link plus a joint ball at its tip.
    Limb,
    /// Two-finger pincher.
    Gripper,
}

/// Geometry of a renderable part. Descriptors only; nothing is tessellated
/// here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    /// Upper half of a sphere.
    Dome { radius: f32 },
    /// RGB axis lines of the given length.
    Axes { size: f32 },
}

/// A renderable part attached to a segment.
///
/// Attachments never take part in traversal. They form their own small
/// hierarchy inside the segment through `parent`, an index into the same
/// segment's attachment list.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub primitive: Primitive,
    /// Transform relative to the parent attachment, or to the segment.
    pub local: Affine3A,
    pub parent: Option<usize>,
    pub visible: bool,
    pub wireframe: bool,
}

impl Attachment {
    #[must_use]
    pub fn new(primitive: Primitive, local: Affine3A) -> Self {
        Self {
            primitive,
            local,
            parent: None,
            visible: true,
            wireframe: false,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    fn axes() -> Self {
        Self {
            visible: false,
            ..Self::new(Primitive::Axes { size: AXES_HELPER_SIZE }, Affine3A::IDENTITY)
        }
    }

    #[inline]
    #[must_use]
    pub fn is_axes(&self) -> bool {
        matches!(self.primitive, Primitive::Axes { .. })
    }
}

/// One rigid piece of the arm.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Role identifier, used by [`SegmentTree::set_rotation`](crate::SegmentTree::set_rotation).
    pub name: String,
    pub transform: Transform,
    /// Rotation applied when geometry is built, before any pose update.
    pub rest_rotation: Quat,
    pub shape: SegmentShape,

    link: Option<LinkSpec>,
    pub(crate) link_index: Option<usize>,

    pub(crate) parent: Option<SegmentKey>,
    pub(crate) children: SmallVec<[SegmentKey; 4]>,

    pub(crate) attachments: Vec<Attachment>,
    pub(crate) debug: bool,
}

impl Segment {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            rest_rotation: Quat::IDENTITY,
            shape: SegmentShape::None,
            link: None,
            link_index: None,
            parent: None,
            children: SmallVec::new(),
            attachments: vec![Attachment::axes()],
            debug: false,
        }
    }

    #[must_use]
    pub fn with_link(mut self, direction: Vec3, length: f32) -> Self {
        self.link = Some(LinkSpec { direction, length });
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: SegmentShape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_rest_rotation(mut self, rotation: Quat) -> Self {
        self.rest_rotation = rotation;
        self
    }

    #[inline]
    #[must_use]
    pub fn link(&self) -> Option<&LinkSpec> {
        self.link.as_ref()
    }

    /// Link length, or zero for a segment without a link.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.link.map_or(0.0, |l| l.length)
    }

    /// Chain index assigned by the last attach, if this segment has a link.
    #[inline]
    #[must_use]
    pub fn link_index(&self) -> Option<usize> {
        self.link_index
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<SegmentKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[SegmentKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    #[inline]
    #[must_use]
    pub fn debug_mode(&self) -> bool {
        self.debug
    }

    /// Transform of attachment `index` relative to this segment's origin.
    #[must_use]
    pub fn attachment_matrix(&self, index: usize) -> Option<Affine3A> {
        let mut attachment = self.attachments.get(index)?;
        let mut matrix = attachment.local;
        // Parents always precede their children in the list.
        while let Some(parent) = attachment.parent {
            attachment = self.attachments.get(parent)?;
            matrix = attachment.local * matrix;
        }
        Some(matrix)
    }

    pub(crate) fn set_debug_mode(&mut self, debug: bool) {
        self.debug = debug;
        for attachment in &mut self.attachments {
            if attachment.is_axes() {
                attachment.visible = debug;
            } else {
                attachment.wireframe = debug;
            }
        }
    }

    /// Replaces everything but the axes gizmo with the parts for `shape`.
    pub(crate) fn rebuild_attachments(&mut self) {
        self.attachments.retain(Attachment::is_axes);
        let first = self.attachments.len();
        let length = self.length();

        match self.shape {
            SegmentShape::None => {}
            SegmentShape::Base => {
                self.attachments.push(Attachment::new(
                    Primitive::Box { size: Vec3::new(0.5, 0.05, 0.5) },
                    Affine3A::from_translation(Vec3::new(0.0, 0.025, 0.0)),
                ));
                self.attachments.push(Attachment::new(
                    Primitive::Dome { radius: 0.1 },
                    Affine3A::from_translation(Vec3::new(0.0, 0.05, 0.0)),
                ));
            }
            SegmentShape::Limb => {
                self.attachments.push(Attachment::new(
                    Primitive::Box { size: Vec3::new(0.05, length, 0.05) },
                    Affine3A::from_translation(Vec3::new(0.0, length / 2.0, 0.0)),
                ));
                self.attachments.push(Attachment::new(
                    Primitive::Sphere { radius: 0.05 },
                    Affine3A::from_translation(Vec3::new(0.0, length, 0.0)),
                ));
            }
            SegmentShape::Gripper => {
                let finger = length / 1.5;
                let size = Vec3::new(0.025, finger, 0.025);
                let tip_offset = finger / 2.0 - 0.01225;

                let left = first;
                self.attachments.push(Attachment::new(
                    Primitive::Box { size },
                    rotate_z_then_up(45.0, length / 4.0 + 0.04),
                ));
                self.attachments.push(
                    Attachment::new(Primitive::Box { size }, knuckle(-75.0, finger, tip_offset))
                        .with_parent(left),
                );

                let right = self.attachments.len();
                self.attachments.push(Attachment::new(
                    Primitive::Box { size },
                    rotate_z_then_up(-45.0, finger / 2.0 + 0.04),
                ));
                self.attachments.push(
                    Attachment::new(Primitive::Box { size }, knuckle(75.0, finger, tip_offset))
                        .with_parent(right),
                );
            }
        }

        let debug = self.debug;
        for attachment in &mut self.attachments[first..] {
            attachment.wireframe = debug;
        }
    }
}

/// Rotate about Z, then move along the rotated Y axis.
fn rotate_z_then_up(degrees: f32, distance: f32) -> Affine3A {
    Affine3A::from_rotation_z(degrees.to_radians())
        * Affine3A::from_translation(Vec3::new(0.0, distance, 0.0))
}

/// Second finger phalanx: to the end of the first one, bend, then extend.
fn knuckle(degrees: f32, finger: f32, tip_offset: f32) -> Affine3A {
    Affine3A::from_translation(Vec3::new(0.0, finger / 2.0, 0.0))
        * rotate_z_then_up(degrees, tip_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn new_segment_has_hidden_axes() {
        let segment = Segment::new("s");
        assert_eq!(segment.attachments().len(), 1);
        assert!(segment.attachments()[0].is_axes());
        assert!(!segment.attachments()[0].visible);
        assert_eq!(segment.length(), 0.0);
    }

    #[test]
    fn limb_parts_follow_link_length() {
        let mut segment = Segment::new("limb")
            .with_link(Vec3::Y, 0.4)
            .with_shape(SegmentShape::Limb);
        segment.rebuild_attachments();

        let ball = segment.attachment_matrix(2).unwrap();
        assert!(Vec3::from(ball.translation).abs_diff_eq(Vec3::new(0.0, 0.4, 0.0), EPSILON));
        assert_eq!(segment.attachments()[1].primitive, Primitive::Box { size: Vec3::new(0.05, 0.4, 0.05) });
    }

    #[test]
    fn gripper_phalanx_composes_with_its_finger() {
        let mut segment = Segment::new("gripper")
            .with_link(Vec3::Y, 0.2)
            .with_shape(SegmentShape::Gripper);
        segment.rebuild_attachments();

        // axes, left finger, left tip, right finger, right tip
        assert_eq!(segment.attachments().len(), 5);
        assert_eq!(segment.attachments()[2].parent, Some(1));
        assert_eq!(segment.attachments()[4].parent, Some(3));

        let finger = segment.attachment_matrix(1).unwrap();
        let tip = segment.attachment_matrix(2).unwrap();
        assert!(tip.abs_diff_eq(finger * segment.attachments()[2].local, EPSILON));
        assert!(segment.attachment_matrix(9).is_none());
    }

    #[test]
    fn debug_mode_flips_axes_and_wireframe() {
        let mut segment = Segment::new("limb")
            .with_link(Vec3::Y, 0.4)
            .with_shape(SegmentShape::Limb);
        segment.rebuild_attachments();

        segment.set_debug_mode(true);
        assert!(segment.attachments()[0].visible);
        assert!(!segment.attachments()[0].wireframe);
        assert!(segment.attachments()[1..].iter().all(|a| a.wireframe && a.visible));
    }
}
