//! Brute-force nearest-hit search.

use std::sync::Arc;

use crate::intersection::keep_nearest;
use crate::{Intersection, IntersectionFinder, Polygon, Ray, Scene};

/// Tests a ray against every polygon and keeps the nearest hit.
///
/// Cost grows linearly with the polygon count.
#[derive(Debug, Clone)]
pub struct SimpleIntersectionFinder {
    polygons: Arc<[Polygon]>,
}

impl SimpleIntersectionFinder {
    /// Searches a snapshot of the scene's polygons.
    pub fn new(scene: &Scene) -> Self {
        Self::from_polygons(scene.polygons())
    }

    /// Searches an existing polygon table.
    pub fn from_polygons(polygons: Arc<[Polygon]>) -> Self {
        Self { polygons }
    }
}

impl IntersectionFinder for SimpleIntersectionFinder {
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let mut best = None;
        for (i, polygon) in self.polygons.iter().enumerate() {
            if let Some(hit) = polygon.intersect(ray) {
                keep_nearest(&mut best, Intersection::from_hit(i, hit));
            }
        }
        best
    }

    fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}
