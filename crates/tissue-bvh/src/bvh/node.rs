//! Tree nodes, and the view of a node while it is being built.

use crate::{Axis, BoundingBox, Polygon};

/// A node of the spatial tree.
///
/// Leaves hold indices into the polygon table the tree was built on; the same
/// index may appear in several leaves when a polygon straddles a split.
/// Internal nodes own both children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Terminal node testing its polygons directly.
    Leaf {
        /// Volume covered by this leaf.
        bbox: BoundingBox,
        /// Indices of the polygons overlapping this leaf.
        polygons: Vec<usize>,
    },
    /// Node split in two by an axis-aligned plane.
    Internal {
        /// Volume covered by both children.
        bbox: BoundingBox,
        /// Axis normal to the split plane.
        axis: Axis,
        /// Coordinate of the split plane along `axis`.
        split_line: f64,
        /// Child on the low side of the plane.
        left: Box<Node>,
        /// Child on the high side of the plane.
        right: Box<Node>,
    },
}

impl Node {
    /// Creates a leaf.
    pub fn leaf(bbox: BoundingBox, polygons: Vec<usize>) -> Self {
        Node::Leaf { bbox, polygons }
    }

    /// Returns the volume covered by this node.
    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Node::Leaf { bbox, .. } | Node::Internal { bbox, .. } => bbox,
        }
    }

    /// Checks if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Polygon indices of a leaf; empty for internal nodes.
    #[inline]
    pub fn polygons(&self) -> &[usize] {
        match self {
            Node::Leaf { polygons, .. } => polygons,
            Node::Internal { .. } => &[],
        }
    }

    /// Returns both children of an internal node.
    #[inline]
    pub fn children(&self) -> Option<(&Node, &Node)> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some((left, right)),
        }
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        match self.children() {
            None => 1,
            Some((left, right)) => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        match self.children() {
            None => 1,
            Some((left, right)) => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self.children() {
            None => 1,
            Some((left, right)) => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Total length of all leaf polygon lists. Duplicated polygons count once per leaf.
    pub fn polygon_refs(&self) -> usize {
        match self.children() {
            None => self.polygons().len(),
            Some((left, right)) => left.polygon_refs() + right.polygon_refs(),
        }
    }
}

/// A node under construction: its volume, its polygons and where it sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    /// The whole polygon table.
    pub table: &'a [Polygon],
    /// Indices of the polygons assigned to this node.
    pub indices: &'a [usize],
    /// Volume of this node.
    pub bbox: BoundingBox,
    /// Depth of this node (0 at the root).
    pub depth: usize,
}

impl<'a> NodeContext<'a> {
    /// Number of polygons in this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if this node has no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The polygons assigned to this node.
    pub fn polygons(&self) -> impl Iterator<Item = &'a Polygon> + 'a {
        let table = self.table;
        self.indices.iter().map(move |&i| &table[i])
    }
}
