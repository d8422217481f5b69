//! Spatial tree container.

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::{BoundingBox, BuildError, Polygon, Scene, TreeConfig};

use super::axis::AxisSelector;
use super::constructor::TreeConstructor;
use super::counter::PolyCounter;
use super::node::Node;
use super::splitter::NodeSplitter;
use super::visitor::LeafVisitor;

/// An immutable bounding volume hierarchy over a shared polygon table.
///
/// Leaves refer to polygons by index into [`polygons`](Self::polygons). The
/// tree is complete once a constructor returns it and never changes
/// afterwards, so it can be shared across threads for concurrent queries.
///
/// # Construction
///
/// ```ignore
/// use tissue_bvh::{Scene, SpatialTree, TreeConfig};
///
/// let scene: Scene = /* ... */;
/// let tree = SpatialTree::from_scene(&scene, &TreeConfig::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct SpatialTree {
    root: Node,
    bbox: BoundingBox,
    polygons: Arc<[Polygon]>,
    max_depth: usize,
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeStats {
    /// Depth, counting the root leaf as 1.
    pub depth: usize,
    /// Number of nodes.
    pub nodes: usize,
    /// Number of leaves.
    pub leaves: usize,
    /// Total length of all leaf polygon lists.
    pub polygon_refs: usize,
    /// Polygon count of the fullest leaf.
    pub largest_leaf: usize,
    /// Mean polygon count per leaf.
    pub mean_leaf_size: f64,
}

impl SpatialTree {
    /// Builds a tree over `polygons` rooted at `bbox` using a named preset.
    ///
    /// The root volume is grown to enclose every polygon, so a `bbox` that
    /// is too small still yields a tree covering the whole table.
    pub fn build(polygons: Arc<[Polygon]>, bbox: BoundingBox, config: &TreeConfig) -> Result<Self, BuildError> {
        config.build(polygons, bbox)
    }

    /// Builds a tree over a snapshot of the scene's polygons.
    pub fn from_scene(scene: &Scene, config: &TreeConfig) -> Result<Self, BuildError> {
        Self::build(scene.polygons(), scene.bounding_box(), config)
    }

    /// Builds a tree with an explicitly assembled constructor.
    ///
    /// As with [`build`](Self::build), `bbox` is extended over `polygons`.
    pub fn with_constructor<A, S, C>(
        polygons: Arc<[Polygon]>,
        bbox: BoundingBox,
        constructor: &TreeConstructor<A, S, C>,
    ) -> Result<Self, BuildError>
    where
        A: AxisSelector,
        S: NodeSplitter,
        C: PolyCounter,
    {
        let start = Instant::now();
        let mut bbox = bbox;
        for polygon in polygons.iter() {
            bbox.extend_to(polygon.bbox());
        }
        let root = constructor.build(&polygons, bbox)?;
        let tree = Self {
            root,
            bbox,
            polygons,
            max_depth: constructor.max_depth(),
        };

        let stats = tree.stats();
        debug!(
            "built tree over {} polygons in {:?}: {} nodes, {} leaves, depth {}, {} polygon refs (largest leaf {})",
            tree.polygons.len(),
            start.elapsed(),
            stats.nodes,
            stats.leaves,
            stats.depth,
            stats.polygon_refs,
            stats.largest_leaf,
        );
        Ok(tree)
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the root volume.
    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns the polygon table leaves index into.
    #[inline]
    pub fn polygons(&self) -> &Arc<[Polygon]> {
        &self.polygons
    }

    /// Returns the maximum depth the tree was built with.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Computes the shape summary.
    pub fn stats(&self) -> TreeStats {
        let mut leaves = 0;
        let mut largest_leaf = 0;
        let mut polygon_refs = 0;
        walk_leaves(&self.root, &mut |_, polygons| {
            leaves += 1;
            largest_leaf = largest_leaf.max(polygons.len());
            polygon_refs += polygons.len();
        });

        TreeStats {
            depth: self.root.depth(),
            nodes: self.root.node_count(),
            leaves,
            polygon_refs,
            largest_leaf,
            mean_leaf_size: polygon_refs as f64 / leaves as f64,
        }
    }

    /// Visits every leaf depth-first, low child before high child.
    pub fn traverse_leaves<V: LeafVisitor>(&self, visitor: &mut V) {
        walk_leaves(&self.root, &mut |bbox, polygons| visitor.visit(bbox, polygons));
    }
}

fn walk_leaves<F: FnMut(&BoundingBox, &[usize])>(node: &Node, f: &mut F) {
    match node {
        Node::Leaf { bbox, polygons } => f(bbox, polygons),
        Node::Internal { left, right, .. } => {
            walk_leaves(left, f);
            walk_leaves(right, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::CollectingVisitor;
    use crate::{Axis, Primitive, Solid};
    use nalgebra::Point3;

    fn two_cubes() -> Scene {
        Scene::new(vec![
            Solid::cube(2.0, Point3::new(0.0, 0.0, 5.0), Primitive::Triangle),
            Solid::cube(2.0, Point3::new(0.0, 0.0, 10.0), Primitive::Quad),
        ])
    }

    fn sphere_and_cube() -> Scene {
        Scene::new(vec![
            Solid::ico_sphere(1.0, 2, Point3::new(0.0, 0.0, 1.9)),
            Solid::cube(2.0, Point3::new(0.0, 2.0, 4.0), Primitive::Triangle),
        ])
    }

    #[test]
    fn every_preset_covers_every_polygon() {
        let scene = sphere_and_cube();
        let n = scene.polygon_count();
        for config in [
            TreeConfig::sah_wide_axis(),
            TreeConfig::split_three_axes(),
            TreeConfig::no_split_one_axis(),
            TreeConfig::no_split_three_axes(),
        ] {
            let tree = SpatialTree::from_scene(&scene, &config).unwrap();
            let mut visitor = CollectingVisitor::new();
            tree.traverse_leaves(&mut visitor);

            assert_eq!(visitor.distinct_polygons(), (0..n).collect::<Vec<_>>());
            assert!(tree.stats().depth <= config.max_depth + 1);
            assert_eq!(tree.max_depth(), config.max_depth);
        }
    }

    #[test]
    fn sah_tree_splits_separate_solids() {
        let tree = SpatialTree::from_scene(&two_cubes(), &TreeConfig::default()).unwrap();
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.bbox(), &two_cubes().bounding_box());
    }

    #[test]
    fn no_split_presets_make_one_leaf() {
        let scene = two_cubes();
        for depth in [0, 3, 10] {
            let tree = SpatialTree::from_scene(&scene, &TreeConfig::no_split_three_axes().with_max_depth(depth)).unwrap();
            let stats = tree.stats();
            assert_eq!(stats.leaves, 1);
            assert_eq!(stats.largest_leaf, scene.polygon_count());
        }
    }

    #[test]
    fn stats_are_consistent() {
        let tree = SpatialTree::from_scene(&sphere_and_cube(), &TreeConfig::split_three_axes()).unwrap();
        let stats = tree.stats();

        assert_eq!(stats.nodes, 2 * stats.leaves - 1);
        assert_eq!(stats.polygon_refs, tree.root().polygon_refs());
        assert!(stats.polygon_refs >= tree.polygons().len());
        assert!(stats.mean_leaf_size <= stats.largest_leaf as f64);
    }

    #[test]
    fn empty_scene_builds_an_empty_leaf() {
        let tree = SpatialTree::from_scene(&Scene::default(), &TreeConfig::default()).unwrap();
        assert!(tree.root().is_leaf());
        assert!(tree.root().polygons().is_empty());
        assert_eq!(tree.stats().polygon_refs, 0);
    }

    #[test]
    fn leaves_visited_low_side_first() {
        let tree = SpatialTree::from_scene(&two_cubes(), &TreeConfig::split_three_axes().with_max_depth(1)).unwrap();
        let mut visitor = CollectingVisitor::new();
        tree.traverse_leaves(&mut visitor);

        let leaves = visitor.into_leaves();
        assert_eq!(leaves.len(), 2);
        let Node::Internal { axis, split_line, .. } = tree.root() else {
            panic!("expected a split root");
        };
        assert!(leaves[0].0.max(*axis) <= *split_line);
        assert!(leaves[1].0.min(*axis) >= *split_line);
    }

    #[test]
    fn root_box_is_grown_over_the_table() {
        let scene = two_cubes();
        let small = BoundingBox::from_limits([0.0, 0.1], [0.0, 0.1], [0.0, 0.1]);
        let tree = SpatialTree::build(scene.polygons(), small, &TreeConfig::default()).unwrap();

        let expected = scene.bounding_box();
        for axis in Axis::ALL {
            assert!(tree.bbox().min(axis) <= expected.min(axis));
            assert!(tree.bbox().max(axis) >= expected.max(axis));
        }
        let mut visitor = CollectingVisitor::new();
        tree.traverse_leaves(&mut visitor);
        assert_eq!(visitor.distinct_polygons().len(), scene.polygon_count());
    }
}
