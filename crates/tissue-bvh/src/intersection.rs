//! Nearest-hit query results.

use std::cmp::Ordering;

use nalgebra::{Point3, Vector3};

use crate::PolygonHit;

/// The nearest polygon hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance from the ray origin to the hit.
    pub distance: f64,
    /// Hit position.
    pub position: Point3<f64>,
    /// Index of the hit polygon in the polygon table the finder was built on.
    pub polygon: usize,
    /// Surface normal at the hit (interpolated for smooth polygons).
    pub normal: Vector3<f64>,
}

impl Intersection {
    /// Attaches the polygon index to a polygon-level hit.
    pub fn from_hit(polygon: usize, hit: PolygonHit) -> Self {
        Self {
            distance: hit.distance,
            position: hit.position,
            polygon,
            normal: hit.normal,
        }
    }

    /// Total order used to pick the nearest hit: by distance, then by polygon index.
    ///
    /// Two polygons hit at exactly the same distance (a shared edge) always
    /// resolve to the lower index, whatever order a finder visits them in.
    pub fn nearness(&self, other: &Intersection) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.polygon.cmp(&other.polygon))
    }
}

/// Keeps the nearer of `best` and `candidate` in `best`.
pub(crate) fn keep_nearest(best: &mut Option<Intersection>, candidate: Intersection) {
    match best {
        Some(current) if current.nearness(&candidate) != Ordering::Greater => {}
        _ => *best = Some(candidate),
    }
}
