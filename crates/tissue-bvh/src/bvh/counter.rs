//! Partitioning a node's polygons on either side of a split plane.

use super::node::NodeContext;
use crate::{Axis, BoundingBox, Edge};

/// Polygons sent to each child of a split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Polygons for the low side of the plane.
    pub left: Vec<usize>,
    /// Polygons for the high side of the plane.
    pub right: Vec<usize>,
}

/// Strategy for assigning a node's polygons to the two children of a split.
pub trait PolyCounter: Send + Sync {
    /// Splits the node's polygons by the plane `axis = line`.
    fn partition(&self, axis: Axis, line: f64, node: &NodeContext<'_>) -> Partition;

    /// Number of polygons each side would receive, without allocating.
    fn count(&self, axis: Axis, line: f64, node: &NodeContext<'_>) -> (usize, usize);

    /// Volumes of the two children.
    ///
    /// The default cuts the node volume at the plane. Every child volume must
    /// contain every point of its polygons that lies inside the node volume.
    fn child_boxes(
        &self,
        axis: Axis,
        line: f64,
        node: &NodeContext<'_>,
        _partition: &Partition,
    ) -> (BoundingBox, BoundingBox) {
        split_boxes(&node.bbox, axis, line)
    }
}

/// Cuts `bbox` at `axis = line` into low and high halves.
pub fn split_boxes(bbox: &BoundingBox, axis: Axis, line: f64) -> (BoundingBox, BoundingBox) {
    (
        bbox.change_to_new(axis, Edge::Max, line),
        bbox.change_to_new(axis, Edge::Min, line),
    )
}

/// Sends a polygon to every side its bounding box overlaps.
///
/// Polygons straddling or lying on the plane go to both children.
#[derive(Debug, Clone, Copy, Default)]
pub struct BBoxPolyCounter;

impl BBoxPolyCounter {
    #[inline]
    fn sides(axis: Axis, line: f64, bbox: &BoundingBox) -> (bool, bool) {
        (bbox.min(axis) <= line, bbox.max(axis) >= line)
    }
}

impl PolyCounter for BBoxPolyCounter {
    fn partition(&self, axis: Axis, line: f64, node: &NodeContext<'_>) -> Partition {
        let mut partition = Partition::default();
        for &i in node.indices {
            let (left, right) = Self::sides(axis, line, node.table[i].bbox());
            if left {
                partition.left.push(i);
            }
            if right {
                partition.right.push(i);
            }
        }
        partition
    }

    fn count(&self, axis: Axis, line: f64, node: &NodeContext<'_>) -> (usize, usize) {
        node.polygons().fold((0, 0), |(l, r), polygon| {
            let (left, right) = Self::sides(axis, line, polygon.bbox());
            (l + left as usize, r + right as usize)
        })
    }
}

/// Sends each polygon to exactly one side, by its centroid.
///
/// Child volumes are grown to enclose their polygons, since a polygon can
/// reach across the plane into the sibling's half.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidPolyCounter;

impl PolyCounter for CentroidPolyCounter {
    fn partition(&self, axis: Axis, line: f64, node: &NodeContext<'_>) -> Partition {
        let mut partition = Partition::default();
        for &i in node.indices {
            if node.table[i].centroid()[axis.index()] < line {
                partition.left.push(i);
            } else {
                partition.right.push(i);
            }
        }
        partition
    }

    fn count(&self, axis: Axis, line: f64, node: &NodeContext<'_>) -> (usize, usize) {
        let left = node
            .polygons()
            .filter(|polygon| polygon.centroid()[axis.index()] < line)
            .count();
        (left, node.len() - left)
    }

    fn child_boxes(
        &self,
        axis: Axis,
        line: f64,
        node: &NodeContext<'_>,
        partition: &Partition,
    ) -> (BoundingBox, BoundingBox) {
        let (mut left, mut right) = split_boxes(&node.bbox, axis, line);
        for &i in &partition.left {
            left.extend_to(node.table[i].bbox());
        }
        for &i in &partition.right {
            right.extend_to(node.table[i].bbox());
        }
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Polygon;
    use nalgebra::Point3;

    fn make_triangle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Polygon {
        Polygon::triangle(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    fn polygons() -> Vec<Polygon> {
        vec![
            make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            make_triangle([3.0, 0.0, 0.0], [4.0, 0.0, 0.0], [3.0, 1.0, 0.0]),
            make_triangle([1.5, 0.0, 0.0], [2.5, 0.0, 0.0], [1.5, 1.0, 0.0]),
        ]
    }

    fn context<'a>(table: &'a [Polygon], indices: &'a [usize]) -> NodeContext<'a> {
        NodeContext {
            table,
            indices,
            bbox: BoundingBox::from_limits([0.0, 4.0], [0.0, 1.0], [0.0, 0.0]),
            depth: 0,
        }
    }

    #[test]
    fn bbox_counter_duplicates_straddling_polygons() {
        let table = polygons();
        let node = context(&table, &[0, 1, 2]);

        let partition = BBoxPolyCounter.partition(Axis::X, 2.0, &node);
        assert_eq!(partition.left, vec![0, 2]);
        assert_eq!(partition.right, vec![1, 2]);
        assert_eq!(BBoxPolyCounter.count(Axis::X, 2.0, &node), (2, 2));
    }

    #[test]
    fn bbox_counter_sends_touching_polygon_both_ways() {
        let table = polygons();
        let node = context(&table, &[0]);
        let partition = BBoxPolyCounter.partition(Axis::X, 1.0, &node);
        assert_eq!(partition.left, vec![0]);
        assert_eq!(partition.right, vec![0]);
    }

    #[test]
    fn centroid_counter_is_a_strict_partition() {
        let table = polygons();
        let node = context(&table, &[0, 1, 2]);

        let partition = CentroidPolyCounter.partition(Axis::X, 2.0, &node);
        assert_eq!(partition.left, vec![0, 2]);
        assert_eq!(partition.right, vec![1]);
        assert_eq!(CentroidPolyCounter.count(Axis::X, 2.0, &node), (2, 1));
    }

    #[test]
    fn centroid_child_boxes_enclose_their_polygons() {
        let table = polygons();
        let node = context(&table, &[0, 1, 2]);
        let partition = CentroidPolyCounter.partition(Axis::X, 1.8, &node);
        let (left, right) = CentroidPolyCounter.child_boxes(Axis::X, 1.8, &node, &partition);

        // Polygon 2 (centroid x = 1.83) reaches back to x = 1.5.
        assert_eq!(partition.right, vec![1, 2]);
        assert_eq!(left.max(Axis::X), 1.8);
        assert_eq!(right.min(Axis::X), 1.5);
    }

    #[test]
    fn default_child_boxes_cut_at_the_line() {
        let table = polygons();
        let node = context(&table, &[0, 1, 2]);
        let partition = BBoxPolyCounter.partition(Axis::X, 2.0, &node);
        let (left, right) = BBoxPolyCounter.child_boxes(Axis::X, 2.0, &node, &partition);
        assert_eq!(left.max(Axis::X), 2.0);
        assert_eq!(left.min(Axis::X), 0.0);
        assert_eq!(right.min(Axis::X), 2.0);
        assert_eq!(right.max(Axis::X), 4.0);
    }
}
