//! Articulated arm model.
//!
//! - [`SegmentTree`]: arena tree of rigid segments and the pose passes
//! - [`KinematicChain`]: the solver seam, with [`FabrikChain`] as reference
//! - [`Transform`] / [`Node`]: local TRS with cached matrices
//! - [`arm`]: the standard five-role robot arm

pub mod arm;
pub mod chain;
pub mod node;
pub mod segment;
pub mod transform;
pub mod tree;

pub use arm::standard_arm;
pub use chain::{FabrikChain, KinematicChain, Link, SolverSettings};
pub use node::Node;
pub use segment::{Attachment, LinkSpec, Primitive, Segment, SegmentShape};
pub use transform::Transform;
pub use tree::SegmentTree;

use slotmap::new_key_type;

new_key_type! {
    pub struct SegmentKey;
}
