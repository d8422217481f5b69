//! Split plane placement strategies.
//!
//! Given a node and an axis, a [`NodeSplitter`] decides where to put the
//! split plane, or signals that the node should stay a leaf.

use super::counter::{split_boxes, PolyCounter};
use super::node::NodeContext;
use crate::Axis;

/// Outcome of placing a split plane on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitDecision {
    /// Axis normal to the plane.
    pub axis: Axis,
    /// Plane coordinate along `axis`.
    pub line: f64,
    /// `true` when the splitter advises keeping the node as a leaf.
    pub stop: bool,
    /// Estimated cost of the split, when the splitter computed one.
    pub cost: Option<f64>,
}

impl SplitDecision {
    /// A split at `line`.
    pub fn split(axis: Axis, line: f64) -> Self {
        Self {
            axis,
            line,
            stop: false,
            cost: None,
        }
    }

    /// Advice not to split. `line` is informative only.
    pub fn stop(axis: Axis, line: f64) -> Self {
        Self {
            axis,
            line,
            stop: true,
            cost: None,
        }
    }

    /// Attaches a cost estimate.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }
}

/// Strategy for placing a node's split plane along a given axis.
pub trait NodeSplitter: Send + Sync {
    /// Chooses the split plane on `axis`. `counter` is the partitioning policy
    /// the constructor will apply, for splitters that evaluate candidates.
    fn split<C: PolyCounter>(&self, axis: Axis, node: &NodeContext<'_>, counter: &C) -> SplitDecision;
}

/// Surface-area cost of splitting at `line`: polygons per side times child area.
pub fn split_cost<C: PolyCounter>(counter: &C, axis: Axis, line: f64, node: &NodeContext<'_>) -> f64 {
    let (left_count, right_count) = counter.count(axis, line, node);
    let (left, right) = split_boxes(&node.bbox, axis, line);
    left_count as f64 * left.surface_area() + right_count as f64 * right.surface_area()
}

/// Surface-area cost of keeping the node as a leaf.
pub fn leaf_cost(node: &NodeContext<'_>) -> f64 {
    node.len() as f64 * node.bbox.surface_area()
}

/// Splits at the mean polygon centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanCentroidSplitter;

impl NodeSplitter for MeanCentroidSplitter {
    fn split<C: PolyCounter>(&self, axis: Axis, node: &NodeContext<'_>, _counter: &C) -> SplitDecision {
        if node.is_empty() {
            return SplitDecision::stop(axis, node.bbox.center()[axis.index()]);
        }
        let sum: f64 = node.polygons().map(|p| p.centroid()[axis.index()]).sum();
        SplitDecision::split(axis, sum / node.len() as f64)
    }
}

/// Splits at the middle of the node volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiddleSpanSplitter;

impl NodeSplitter for MiddleSpanSplitter {
    fn split<C: PolyCounter>(&self, axis: Axis, node: &NodeContext<'_>, _counter: &C) -> SplitDecision {
        let line = (node.bbox.min(axis) + node.bbox.max(axis)) / 2.0;
        SplitDecision::split(axis, line)
    }
}

/// Surface area heuristic over evenly spaced candidate planes.
///
/// `planes` candidates divide the node extent into `planes + 1` equal slabs.
/// The cheapest one is chosen, and the splitter advises stopping unless its
/// cost is below `(1 - min_improvement)` times the leaf cost. A hard splitter
/// demands a margin; a soft one (`min_improvement = 0`) takes any improvement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SahSplitter {
    planes: usize,
    min_improvement: f64,
}

impl SahSplitter {
    /// Splits only when the cost drops by at least the fraction `split_cost`.
    pub fn hard(planes: usize, split_cost: f64) -> Self {
        Self {
            planes,
            min_improvement: split_cost,
        }
    }

    /// Splits whenever the cost drops at all.
    pub fn soft(planes: usize) -> Self {
        Self {
            planes,
            min_improvement: 0.0,
        }
    }

    /// Number of candidate planes.
    #[inline]
    pub fn planes(&self) -> usize {
        self.planes
    }
}

impl NodeSplitter for SahSplitter {
    fn split<C: PolyCounter>(&self, axis: Axis, node: &NodeContext<'_>, counter: &C) -> SplitDecision {
        let min = node.bbox.min(axis);
        let extent = node.bbox.extent(axis);
        if !(extent > 0.0) || self.planes == 0 {
            return SplitDecision::stop(axis, min);
        }

        let mut best: Option<(f64, f64)> = None;
        for i in 1..=self.planes {
            let line = min + extent * i as f64 / (self.planes + 1) as f64;
            let cost = split_cost(counter, axis, line, node);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((line, cost));
            }
        }

        let Some((line, cost)) = best else {
            return SplitDecision::stop(axis, min);
        };
        let decision = if cost < (1.0 - self.min_improvement) * leaf_cost(node) {
            SplitDecision::split(axis, line)
        } else {
            SplitDecision::stop(axis, line)
        };
        decision.with_cost(cost)
    }
}

/// Refuses to split along some axes and defers to `inner` on the others.
///
/// With every axis disabled the constructor always produces a single leaf.
#[derive(Debug, Clone, Copy)]
pub struct NoSplitAxes<S = MiddleSpanSplitter> {
    disabled: [bool; 3],
    inner: S,
}

impl<S: NodeSplitter> NoSplitAxes<S> {
    /// Disables splitting on `axes`.
    pub fn new(inner: S, axes: &[Axis]) -> Self {
        let mut disabled = [false; 3];
        for axis in axes {
            disabled[axis.index()] = true;
        }
        Self { disabled, inner }
    }
}

impl NoSplitAxes<MiddleSpanSplitter> {
    /// Disables splitting on every axis.
    pub fn all() -> Self {
        Self::new(MiddleSpanSplitter, &Axis::ALL)
    }
}

impl<S: NodeSplitter> NodeSplitter for NoSplitAxes<S> {
    fn split<C: PolyCounter>(&self, axis: Axis, node: &NodeContext<'_>, counter: &C) -> SplitDecision {
        if self.disabled[axis.index()] {
            return SplitDecision::stop(axis, node.bbox.center()[axis.index()]);
        }
        self.inner.split(axis, node, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::counter::BBoxPolyCounter;
    use crate::{BoundingBox, Polygon};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn make_triangle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Polygon {
        Polygon::triangle(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    fn context<'a>(table: &'a [Polygon], indices: &'a [usize], bbox: BoundingBox) -> NodeContext<'a> {
        NodeContext {
            table,
            indices,
            bbox,
            depth: 0,
        }
    }

    fn three_polygons() -> Vec<Polygon> {
        vec![
            make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
            make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, -2.0, 0.0]),
            make_triangle([2.0, 2.0, 2.0], [3.0, 3.0, 3.0], [2.0, 3.0, 2.0]),
        ]
    }

    fn node_bbox() -> BoundingBox {
        BoundingBox::from_limits([-1.0, 4.0], [-1.0, 3.0], [-1.0, 5.0])
    }

    #[test]
    fn mean_centroid_on_x_and_y() {
        let table = three_polygons();
        let node = context(&table, &[0, 1, 2], node_bbox());

        let on_x = MeanCentroidSplitter.split(Axis::X, &node, &BBoxPolyCounter);
        assert!(!on_x.stop);
        assert_relative_eq!(on_x.line, 7.0 / 9.0, epsilon = 1e-12);

        let on_y = MeanCentroidSplitter.split(Axis::Y, &node, &BBoxPolyCounter);
        assert_relative_eq!(on_y.line, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn middle_span_uses_node_extent() {
        let table = three_polygons();
        let node = context(&table, &[0, 1, 2], node_bbox());

        assert_eq!(MiddleSpanSplitter.split(Axis::X, &node, &BBoxPolyCounter).line, 1.5);
        assert_eq!(MiddleSpanSplitter.split(Axis::Y, &node, &BBoxPolyCounter).line, 1.0);
    }

    #[test]
    fn sah_separates_distant_clusters() {
        let table = vec![
            make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            make_triangle([9.0, 0.0, 0.0], [10.0, 0.0, 0.0], [9.0, 1.0, 0.0]),
        ];
        let bbox = BoundingBox::from_limits([0.0, 10.0], [0.0, 1.0], [0.0, 1.0]);
        let node = context(&table, &[0, 1], bbox);

        let decision = SahSplitter::hard(9, 0.1).split(Axis::X, &node, &BBoxPolyCounter);
        assert!(!decision.stop);
        assert_relative_eq!(decision.line, 2.0);
        assert_relative_eq!(decision.cost.unwrap(), 44.0);
        assert_relative_eq!(leaf_cost(&node), 84.0);
    }

    #[test]
    fn sah_stops_on_flat_axis() {
        let table = vec![
            make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            make_triangle([0.0, 2.0, 0.0], [0.0, 3.0, 0.0], [0.0, 2.0, 1.0]),
        ];
        let bbox = BoundingBox::from_limits([0.0, 0.0], [0.0, 3.0], [0.0, 1.0]);
        let node = context(&table, &[0, 1], bbox);

        assert!(SahSplitter::hard(8, 0.1).split(Axis::X, &node, &BBoxPolyCounter).stop);
        assert!(SahSplitter::soft(8).split(Axis::X, &node, &BBoxPolyCounter).stop);
    }

    #[test]
    fn hard_sah_needs_a_margin_that_soft_does_not() {
        // Two overlapping polygons: any split duplicates at least one of them.
        let table = vec![
            make_triangle([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            make_triangle([3.0, 0.0, 0.0], [4.0, 0.0, 0.0], [3.0, 1.0, 0.0]),
        ];
        let bbox = BoundingBox::from_limits([0.0, 4.0], [0.0, 1.0], [0.0, 1.0]);
        let node = context(&table, &[0, 1], bbox);

        let hard = SahSplitter::hard(3, 0.5).split(Axis::X, &node, &BBoxPolyCounter);
        let soft = SahSplitter::soft(3).split(Axis::X, &node, &BBoxPolyCounter);
        assert!(hard.stop);
        assert!(!soft.stop);
        assert_eq!(hard.cost, soft.cost);
    }

    #[test]
    fn no_split_axes_blocks_only_disabled_axes() {
        let table = three_polygons();
        let node = context(&table, &[0, 1, 2], node_bbox());
        let splitter = NoSplitAxes::new(MiddleSpanSplitter, &[Axis::Z]);

        assert!(splitter.split(Axis::Z, &node, &BBoxPolyCounter).stop);
        assert!(!splitter.split(Axis::X, &node, &BBoxPolyCounter).stop);
        for axis in Axis::ALL {
            assert!(NoSplitAxes::all().split(axis, &node, &BBoxPolyCounter).stop);
        }
    }
}
