//! Segment tree and pose propagation.
//!
//! The arm is an explicit ownership tree of [`Segment`]s stored in a slot-map
//! arena. Renderable parts live in each segment's own attachment list and are
//! never visited by traversal.
//!
//! # Passes
//!
//! All passes are depth-first pre-order, children in insertion order:
//!
//! 1. [`SegmentTree::attach_skeleton`] appends one chain link per
//!    link-bearing segment, so link indices follow pre-order.
//! 2. [`SegmentTree::build_geometry`] places each segment at the tip of its
//!    parent and lays out its parts. Needs link lengths, hence after attach.
//! 3. [`SegmentTree::update`] re-orients every linked segment toward its
//!    solved link end point and refreshes world matrices. Runs every frame,
//!    after the solver.

use std::f32::consts::FRAC_PI_2;

use glam::{Affine3A, Quat, Vec3};
use slotmap::SlotMap;

use armature_core::{ArmatureError, Result};

use crate::SegmentKey;
use crate::chain::KinematicChain;
use crate::segment::Segment;

#[derive(Debug, Clone)]
pub struct SegmentTree {
    segments: SlotMap<SegmentKey, Segment>,
    root: SegmentKey,
    attached: bool,
}

impl SegmentTree {
    #[must_use]
    pub fn new(root: Segment) -> Self {
        let mut segments = SlotMap::with_key();
        let root = segments.insert(root);
        Self {
            segments,
            root,
            attached: false,
        }
    }

    /// Adds `segment` as the last child of `parent`.
    ///
    /// Returns `None` (and drops the segment) if `parent` is not in the tree.
    pub fn add_child(&mut self, parent: SegmentKey, mut segment: Segment) -> Option<SegmentKey> {
        if !self.segments.contains_key(parent) {
            log::warn!("Cannot add segment '{}': parent is not in the tree", segment.name);
            return None;
        }

        segment.parent = Some(parent);
        segment.children.clear();
        let key = self.segments.insert(segment);
        self.segments[parent].children.push(key);
        Some(key)
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> SegmentKey {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: SegmentKey) -> Option<&Segment> {
        self.segments.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: SegmentKey) -> Option<&mut Segment> {
        self.segments.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Segment keys in depth-first pre-order.
    #[must_use]
    pub fn preorder(&self) -> Vec<SegmentKey> {
        let mut order = Vec::with_capacity(self.segments.len());
        let mut stack = vec![self.root];

        while let Some(key) = stack.pop() {
            let Some(segment) = self.segments.get(key) else {
                continue;
            };
            order.push(key);
            // Reverse so the first child is popped first.
            stack.extend(segment.children.iter().rev().copied());
        }

        order
    }

    /// First segment named `name` in pre-order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<SegmentKey> {
        self.preorder()
            .into_iter()
            .find(|&key| self.segments[key].name == name)
    }

    /// World matrix computed by the last [`update`](Self::update).
    #[must_use]
    pub fn world_matrix(&self, key: SegmentKey) -> Option<Affine3A> {
        self.segments.get(key).map(|s| *s.transform.world_matrix())
    }

    // ========================================================================
    // Skeleton attach / detach
    // ========================================================================

    /// Appends one link to `chain` per link-bearing segment, in pre-order,
    /// and records each link's index on its segment. Returns the number of
    /// links added.
    pub fn attach_skeleton<C: KinematicChain + ?Sized>(&mut self, chain: &mut C) -> Result<usize> {
        if self.attached {
            return Err(ArmatureError::SkeletonAlreadyAttached);
        }

        let mut added = 0;
        for key in self.preorder() {
            let segment = &mut self.segments[key];
            if let Some(link) = segment.link().copied() {
                let index = chain.add_link(link.direction, link.length);
                segment.link_index = Some(index);
                added += 1;
                log::debug!("Segment '{}' bound to link {index}", segment.name);
            }
        }

        self.attached = true;
        log::info!("Skeleton attached: {added} links from {} segments", self.segments.len());
        Ok(added)
    }

    /// Forgets every link index and empties `chain`.
    pub fn detach_skeleton<C: KinematicChain + ?Sized>(&mut self, chain: &mut C) {
        for segment in self.segments.values_mut() {
            segment.link_index = None;
        }
        chain.clear();
        self.attached = false;
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Places every non-root segment at its parent's tip, applies its rest
    /// rotation and rebuilds its renderable parts.
    pub fn build_geometry(&mut self) -> Result<()> {
        if !self.attached {
            return Err(ArmatureError::SkeletonNotAttached);
        }

        for key in self.preorder() {
            let parent_length = self.segments[key]
                .parent
                .and_then(|p| self.segments.get(p))
                .map(Segment::length);

            let segment = &mut self.segments[key];
            if let Some(parent_length) = parent_length {
                segment.transform.position = Vec3::new(0.0, parent_length, 0.0);
                segment.transform.rotation = segment.rest_rotation;
            }
            segment.rebuild_attachments();
        }

        Ok(())
    }

    // ========================================================================
    // Pose propagation
    // ========================================================================

    /// Re-orients each linked segment so it points from its own origin to its
    /// link's solved end point, then refreshes all world matrices.
    ///
    /// Segments without a link (or whose link the chain no longer has) keep
    /// their local rotation. Their children are still visited.
    pub fn update<C: KinematicChain + ?Sized>(&mut self, chain: &C) {
        self.update_recursive(self.root, Affine3A::IDENTITY, chain);
    }

    fn update_recursive<C: KinematicChain + ?Sized>(
        &mut self,
        key: SegmentKey,
        parent_world: Affine3A,
        chain: &C,
    ) {
        let (world, children) = {
            let Some(segment) = self.segments.get_mut(key) else {
                return;
            };

            if let Some(end) = segment.link_index.and_then(|i| chain.end_point(i)) {
                segment.transform.look_at(end, Vec3::Y, &parent_world);
                // Segment geometry runs along +Y, look_at aims +Z.
                segment.transform.rotate_x(FRAC_PI_2);
            }

            segment.transform.update_local_matrix();
            let world = parent_world * *segment.transform.local_matrix();
            segment.transform.set_world_matrix(world);

            (world, segment.children.clone())
        };

        for child in children {
            self.update_recursive(child, world, chain);
        }
    }

    // ========================================================================
    // Broadcast / targeted setters
    // ========================================================================

    /// Shows axes gizmos and switches parts to wireframe on every segment.
    pub fn set_debug_mode(&mut self, debug: bool) {
        for key in self.preorder() {
            self.segments[key].set_debug_mode(debug);
        }
    }

    /// Sets the local rotation of the first segment named `name` (pre-order).
    /// Returns whether a segment matched.
    pub fn set_rotation(&mut self, name: &str, rotation: Quat) -> bool {
        match self.find(name) {
            Some(key) => {
                self.segments[key].transform.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Like [`set_rotation`](Self::set_rotation), but reports a missing name
    /// as an error.
    pub fn try_set_rotation(&mut self, name: &str, rotation: Quat) -> Result<()> {
        if self.set_rotation(name, rotation) {
            Ok(())
        } else {
            Err(ArmatureError::SegmentNotFound(name.to_string()))
        }
    }
}
