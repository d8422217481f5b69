//! Recursive tree construction from pluggable policies.

use log::trace;

use super::axis::AxisSelector;
use super::counter::{Partition, PolyCounter};
use super::node::{Node, NodeContext};
use super::splitter::{split_cost, NodeSplitter, SplitDecision};
use crate::{Axis, BoundingBox, BuildError, Polygon};

/// Deepest tree a constructor accepts.
pub const MAX_DEPTH_LIMIT: usize = 64;

/// Default maximum depth.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Nodes with fewer polygons than this are not split by default.
pub const DEFAULT_MIN_SPLIT_POLYGONS: usize = 2;

/// With the `parallel` feature, sibling subtrees holding at least this many
/// polygons in total are built on separate rayon tasks.
pub const PARALLEL_BUILD_THRESHOLD: usize = 2048;

/// Builds [`Node`] hierarchies from an axis policy, a splitter and a partitioning policy.
///
/// A node becomes a leaf when its depth reaches `max_depth`, when it holds
/// fewer than `min_split_polygons` polygons, when the splitter advises
/// stopping on every candidate axis, or when the split is degenerate (it
/// would hand a child the whole parent set without shrinking its volume).
#[derive(Debug, Clone)]
pub struct TreeConstructor<A, S, C> {
    axis_selector: A,
    splitter: S,
    counter: C,
    max_depth: usize,
    min_split_polygons: usize,
}

impl<A, S, C> TreeConstructor<A, S, C>
where
    A: AxisSelector,
    S: NodeSplitter,
    C: PolyCounter,
{
    /// Creates a constructor with the default depth and polygon threshold.
    pub fn new(axis_selector: A, splitter: S, counter: C) -> Self {
        Self {
            axis_selector,
            splitter,
            counter,
            max_depth: DEFAULT_MAX_DEPTH,
            min_split_polygons: DEFAULT_MIN_SPLIT_POLYGONS,
        }
    }

    /// Sets the maximum depth. Depth 0 yields a single root leaf.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the polygon count below which nodes stay leaves.
    pub fn with_min_split_polygons(mut self, min_split_polygons: usize) -> Self {
        self.min_split_polygons = min_split_polygons;
        self
    }

    /// Returns the maximum depth.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Builds the hierarchy over every polygon of `table`, rooted at `bbox`.
    ///
    /// Never fails on degenerate geometry: an empty table yields one empty leaf.
    pub fn build(&self, table: &[Polygon], bbox: BoundingBox) -> Result<Node, BuildError> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(BuildError::MaxDepthTooLarge {
                depth: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        let indices = (0..table.len()).collect();
        self.build_node(table, indices, bbox, 0)
    }

    fn build_node(
        &self,
        table: &[Polygon],
        indices: Vec<usize>,
        bbox: BoundingBox,
        depth: usize,
    ) -> Result<Node, BuildError> {
        if depth >= self.max_depth || indices.len() < self.min_split_polygons {
            return Ok(Node::leaf(bbox, indices));
        }

        let node = NodeContext {
            table,
            indices: &indices,
            bbox,
            depth,
        };
        let Some(decision) = self.choose_split(&node)? else {
            return Ok(Node::leaf(bbox, indices));
        };

        let axis = decision.axis;
        let line = clamp_to(&bbox, axis, decision.line);
        let partition = self.counter.partition(axis, line, &node);
        let (left_box, right_box) = self.counter.child_boxes(axis, line, &node, &partition);

        if is_degenerate(&node, &partition, &left_box, &right_box) {
            trace!(
                "degenerate split on {axis} at {line} (depth {depth}, {} polygons), keeping leaf",
                indices.len()
            );
            return Ok(Node::leaf(bbox, indices));
        }

        let Partition { left, right } = partition;
        let (left, right) = self.build_children(table, (left, left_box), (right, right_box), depth + 1)?;

        Ok(Node::Internal {
            bbox,
            axis,
            split_line: line,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn build_children(
        &self,
        table: &[Polygon],
        (left, left_box): (Vec<usize>, BoundingBox),
        (right, right_box): (Vec<usize>, BoundingBox),
        depth: usize,
    ) -> Result<(Node, Node), BuildError> {
        let left = self.build_node(table, left, left_box, depth)?;
        let right = self.build_node(table, right, right_box, depth)?;
        Ok((left, right))
    }

    #[cfg(feature = "parallel")]
    fn build_children(
        &self,
        table: &[Polygon],
        (left, left_box): (Vec<usize>, BoundingBox),
        (right, right_box): (Vec<usize>, BoundingBox),
        depth: usize,
    ) -> Result<(Node, Node), BuildError> {
        if left.len() + right.len() < PARALLEL_BUILD_THRESHOLD {
            let left = self.build_node(table, left, left_box, depth)?;
            let right = self.build_node(table, right, right_box, depth)?;
            return Ok((left, right));
        }
        let (left, right) = rayon::join(
            || self.build_node(table, left, left_box, depth),
            || self.build_node(table, right, right_box, depth),
        );
        Ok((left?, right?))
    }

    /// Asks the splitter on every candidate axis and keeps the cheapest split.
    ///
    /// Returns `None` when the splitter advises stopping on all of them.
    fn choose_split(&self, node: &NodeContext<'_>) -> Result<Option<SplitDecision>, BuildError> {
        let axes = self.axis_selector.select(node);
        let mut best: Option<(SplitDecision, f64)> = None;

        for &axis in axes {
            let decision = self.splitter.split(axis, node, &self.counter);
            if decision.stop {
                continue;
            }
            if !decision.line.is_finite() {
                return Err(BuildError::NonFiniteSplit {
                    axis,
                    line: decision.line,
                    depth: node.depth,
                });
            }
            if axes.len() == 1 {
                return Ok(Some(decision));
            }

            let cost = decision
                .cost
                .unwrap_or_else(|| split_cost(&self.counter, axis, clamp_to(&node.bbox, axis, decision.line), node));
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((decision, cost));
            }
        }

        Ok(best.map(|(decision, _)| decision))
    }
}

fn clamp_to(bbox: &BoundingBox, axis: Axis, line: f64) -> f64 {
    line.max(bbox.min(axis)).min(bbox.max(axis))
}

/// A split is degenerate when a child receives every parent polygon and
/// either its sibling does too or its volume did not shrink.
fn is_degenerate(
    node: &NodeContext<'_>,
    partition: &Partition,
    left_box: &BoundingBox,
    right_box: &BoundingBox,
) -> bool {
    let n = node.len();
    let left_all = partition.left.len() == n;
    let right_all = partition.right.len() == n;
    (left_all && right_all) || (left_all && *left_box == node.bbox) || (right_all && *right_box == node.bbox)
}
