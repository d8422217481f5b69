//! Bounding volume hierarchy over a shared polygon table.
//!
//! Each node of the tree covers an axis-aligned volume. Internal nodes cut
//! their volume in two with an axis-aligned plane; leaves list the polygons
//! overlapping their volume. The tree is built once and is read-only
//! afterwards.
//!
//! # Example
//!
//! ```ignore
//! use tissue_bvh::bvh::{CollectingVisitor, SpatialTree};
//! use tissue_bvh::{Scene, TreeConfig};
//!
//! let scene: Scene = /* place solids */;
//! let tree = SpatialTree::from_scene(&scene, &TreeConfig::split_three_axes())?;
//!
//! let mut visitor = CollectingVisitor::new();
//! tree.traverse_leaves(&mut visitor);
//! ```
//!
//! # Architecture
//!
//! - [`SpatialTree`]: the built tree and the polygon table it indexes
//! - [`Node`]: leaf or internal node
//! - [`TreeConstructor`]: recursive builder, generic over three policies:
//!   - [`AxisSelector`]: which axis (or axes) to split along
//!   - [`NodeSplitter`]: where to put the plane, or whether to stop
//!   - [`PolyCounter`]: which polygons go to which child
//! - [`LeafVisitor`]: depth-first leaf enumeration

mod axis;
mod constructor;
mod counter;
mod node;
mod splitter;
mod tree;
mod visitor;

pub use axis::{AxisSelector, FixedAxis, RotateAxis, WideAxes, WidestAxis};
pub use constructor::{
    TreeConstructor, DEFAULT_MAX_DEPTH, DEFAULT_MIN_SPLIT_POLYGONS, MAX_DEPTH_LIMIT, PARALLEL_BUILD_THRESHOLD,
};
pub use counter::{split_boxes, BBoxPolyCounter, CentroidPolyCounter, Partition, PolyCounter};
pub use node::{Node, NodeContext};
pub use splitter::{
    leaf_cost, split_cost, MeanCentroidSplitter, MiddleSpanSplitter, NoSplitAxes, NodeSplitter, SahSplitter,
    SplitDecision,
};
pub use tree::{SpatialTree, TreeStats};
pub use visitor::{CollectingVisitor, FnVisitor, LeafVisitor};
