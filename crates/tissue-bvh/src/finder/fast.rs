//! Tree-accelerated nearest-hit search.

use crate::bvh::{Node, SpatialTree};
use crate::intersection::keep_nearest;
use crate::{
    BoundingBox, BoxIntersect, BuildError, Intersection, IntersectionFinder, Polygon, Ray, Scene, SlabIntersect,
    TreeConfig,
};

/// Margin added around node volumes before testing them against a ray.
///
/// A ray grazing the shared face of two sibling boxes may, after rounding,
/// miss both by a few ulps while still hitting a polygon lying on that face.
pub const NODE_BOX_PADDING: f64 = 1e-7;

const _: () = assert!(crate::polygon::EDGE_TOLERANCE < NODE_BOX_PADDING);

/// Branch-and-bound search over a [`SpatialTree`].
///
/// Children are visited nearest entry first, and a child is skipped once its
/// entry distance exceeds the best confirmed hit. Results match
/// [`SimpleIntersectionFinder`](super::SimpleIntersectionFinder) on hit
/// identity, with distances equal up to rounding.
#[derive(Debug, Clone)]
pub struct FastIntersectionFinder<B = SlabIntersect> {
    tree: SpatialTree,
    box_intersect: B,
}

impl FastIntersectionFinder<SlabIntersect> {
    /// Builds a tree over the scene with the default preset.
    pub fn new(scene: &Scene) -> Result<Self, BuildError> {
        Self::with_config(scene, &TreeConfig::default())
    }

    /// Builds a tree over the scene with `config`.
    pub fn with_config(scene: &Scene, config: &TreeConfig) -> Result<Self, BuildError> {
        SpatialTree::from_scene(scene, config).map(Self::from_tree)
    }

    /// Searches an already built tree.
    pub fn from_tree(tree: SpatialTree) -> Self {
        Self::with_box_intersect(tree, SlabIntersect)
    }
}

impl<B: BoxIntersect> FastIntersectionFinder<B> {
    /// Searches `tree`, testing node volumes with `box_intersect`.
    pub fn with_box_intersect(tree: SpatialTree, box_intersect: B) -> Self {
        Self { tree, box_intersect }
    }

    /// Returns the tree being searched.
    #[inline]
    pub fn tree(&self) -> &SpatialTree {
        &self.tree
    }

    fn entry(&self, ray: &Ray, bbox: &BoundingBox) -> Option<f64> {
        self.box_intersect.entry_distance(ray, &bbox.padded(NODE_BOX_PADDING))
    }

    fn search(&self, node: &Node, ray: &Ray, best: &mut Option<Intersection>) {
        match node {
            Node::Leaf { polygons, .. } => {
                let table = self.tree.polygons();
                for &i in polygons {
                    if let Some(hit) = table[i].intersect(ray) {
                        keep_nearest(best, Intersection::from_hit(i, hit));
                    }
                }
            }
            Node::Internal { left, right, .. } => {
                let mut near = self.entry(ray, left.bbox()).map(|t| (t, left.as_ref()));
                let mut far = self.entry(ray, right.bbox()).map(|t| (t, right.as_ref()));
                if let (Some((t_near, _)), Some((t_far, _))) = (near, far) {
                    if t_far < t_near {
                        std::mem::swap(&mut near, &mut far);
                    }
                }

                for (entry, child) in [near, far].into_iter().flatten() {
                    if best.is_some_and(|hit| entry > hit.distance) {
                        break;
                    }
                    self.search(child, ray, best);
                }
            }
        }
    }
}

impl<B: BoxIntersect> IntersectionFinder for FastIntersectionFinder<B> {
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let root = self.tree.root();
        self.entry(ray, root.bbox())?;

        let mut best = None;
        self.search(root, ray, &mut best);
        best
    }

    fn polygons(&self) -> &[Polygon] {
        self.tree.polygons()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::SimpleIntersectionFinder;
    use crate::{CandidatePlaneIntersect, Primitive, Solid};
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn presets() -> [TreeConfig; 4] {
        [
            TreeConfig::no_split_one_axis().with_max_depth(3),
            TreeConfig::no_split_three_axes().with_max_depth(3),
            TreeConfig::split_three_axes().with_max_depth(3),
            TreeConfig::sah_wide_axis(),
        ]
    }

    #[test]
    fn empty_scene_has_no_hit() {
        for config in presets() {
            let finder = FastIntersectionFinder::with_config(&Scene::default(), &config).unwrap();
            assert!(finder.find_intersection(&Ray::new(Point3::origin(), Vector3::z())).is_none());
        }
    }

    #[test]
    fn sphere_box_is_not_a_hit() {
        let scene = Scene::new(vec![Solid::ico_sphere(1.0, 1, Point3::new(0.0, 0.0, 2.0))]);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.9, 1.0));
        // The ray crosses the sphere's bounding box near a corner only.
        assert!(SlabIntersect.entry_distance(&ray, scene.solids()[0].bbox()).is_some());
        for config in presets() {
            let finder = FastIntersectionFinder::with_config(&scene, &config).unwrap();
            assert!(finder.find_intersection(&ray).is_none());
        }
    }

    #[test]
    fn hit_behind_an_overlapping_box() {
        let scene = Scene::new(vec![
            Solid::ico_sphere(1.0, 1, Point3::new(0.0, 0.0, 1.9)),
            Solid::cube(2.0, Point3::new(0.0, 2.0, 4.0), Primitive::Triangle),
        ]);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.9, 1.0));
        for config in presets() {
            let finder = FastIntersectionFinder::with_config(&scene, &config).unwrap();
            let hit = finder.find_intersection(&ray).unwrap();
            assert_relative_eq!(hit.position, Point3::new(0.0, 2.7, 3.0), epsilon = 1e-9);
            assert_eq!(scene.solid_of(hit.polygon).unwrap().name(), "cube");
        }
    }

    #[test]
    fn candidate_plane_strategy_agrees() {
        let scene = Scene::new(vec![
            Solid::cube(2.0, Point3::new(0.0, 0.0, 5.0), Primitive::Triangle),
            Solid::cube(2.0, Point3::new(0.0, 0.0, 10.0), Primitive::Triangle),
        ]);
        let simple = SimpleIntersectionFinder::new(&scene);
        let tree = SpatialTree::from_scene(&scene, &TreeConfig::split_three_axes()).unwrap();
        let fast = FastIntersectionFinder::with_box_intersect(tree, CandidatePlaneIntersect);

        for i in 0..40 {
            let angle = (i as f64 - 20.0) * 0.01;
            let ray = Ray::new(Point3::new(0.0, 0.3, 0.0), Vector3::new(angle, angle / 2.0, 1.0));
            let expected = simple.find_intersection(&ray);
            let actual = fast.find_intersection(&ray);
            assert_eq!(expected.map(|h| h.polygon), actual.map(|h| h.polygon), "ray {i}");
        }
    }

    #[test]
    fn ray_starting_inside_a_leaf() {
        let scene = Scene::new(vec![
            Solid::cube(2.0, Point3::new(0.0, 0.0, 5.0), Primitive::Triangle),
            Solid::cube(2.0, Point3::new(0.0, 0.0, 10.0), Primitive::Triangle),
        ]);
        let finder = FastIntersectionFinder::new(&scene).unwrap();
        let hit = finder
            .find_intersection(&Ray::new(Point3::new(0.3, -0.2, 5.0), Vector3::z()))
            .unwrap();
        assert_relative_eq!(hit.distance, 1.0);

        let hit = finder
            .find_intersection(&Ray::new(Point3::new(0.3, -0.2, 7.0), Vector3::z()))
            .unwrap();
        assert_relative_eq!(hit.distance, 2.0);
    }
}
