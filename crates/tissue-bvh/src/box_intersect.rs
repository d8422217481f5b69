//! Ray versus axis-aligned box hit tests.
//!
//! Two interchangeable strategies implement [`BoxIntersect`]:
//!
//! - [`SlabIntersect`]: the slab method, used by default for tree traversal.
//! - [`CandidatePlaneIntersect`]: the candidate-plane method from Graphics
//!   Gems, kept as a reference implementation.
//!
//! Both treat a ray whose origin lies inside the box as hitting it at
//! parameter 0, i.e. at the ray origin.

use nalgebra::Point3;

use crate::{Axis, BoundingBox, Ray};

/// Strategy for testing a ray against a bounding box.
pub trait BoxIntersect: Send + Sync {
    /// Ray parameter at which the ray enters `bbox`, or `None` on a miss.
    ///
    /// The parameter is never negative: a ray starting inside the box enters
    /// it at 0. Since ray directions are unit vectors, the parameter is also
    /// the distance from the origin to the entry point.
    fn entry_distance(&self, ray: &Ray, bbox: &BoundingBox) -> Option<f64>;

    /// Point where the ray enters `bbox`, or `None` on a miss.
    fn intersection(&self, ray: &Ray, bbox: &BoundingBox) -> Option<Point3<f64>> {
        self.entry_distance(ray, bbox).map(|t| ray.at(t))
    }
}

/// Slab method: intersect the per-axis parameter intervals of the ray.
///
/// Zero direction components are inverted through
/// [`DIRECTION_EPSILON`](crate::DIRECTION_EPSILON), so axis-parallel rays
/// produce large finite parameters rather than `NaN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlabIntersect;

impl BoxIntersect for SlabIntersect {
    fn entry_distance(&self, ray: &Ray, bbox: &BoundingBox) -> Option<f64> {
        if bbox.is_empty() {
            return None;
        }

        let origin = ray.origin();
        let inverse = ray.inverse_direction();
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in Axis::ALL {
            let i = axis.index();
            let t1 = (bbox.min(axis) - origin[i]) * inverse[i];
            let t2 = (bbox.max(axis) - origin[i]) * inverse[i];
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    Below,
    Above,
    Inside,
}

/// Candidate-plane method (Graphics Gems, "Fast Ray-Box Intersection").
///
/// Each axis on which the origin lies outside the box contributes one
/// candidate face; the farthest candidate is the only face the ray can enter
/// through, and the hit is confirmed by checking the other two coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidatePlaneIntersect;

impl BoxIntersect for CandidatePlaneIntersect {
    fn entry_distance(&self, ray: &Ray, bbox: &BoundingBox) -> Option<f64> {
        if bbox.is_empty() {
            return None;
        }

        let origin = ray.origin();
        let direction = ray.direction();

        let mut quadrants = [Quadrant::Inside; 3];
        let mut candidates = [0.0; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            if origin[i] < bbox.min(axis) {
                quadrants[i] = Quadrant::Below;
                candidates[i] = bbox.min(axis);
            } else if origin[i] > bbox.max(axis) {
                quadrants[i] = Quadrant::Above;
                candidates[i] = bbox.max(axis);
            }
        }

        if quadrants.iter().all(|&q| q == Quadrant::Inside) {
            return Some(0.0);
        }

        let mut plane_distances = [-1.0; 3];
        for i in 0..3 {
            if quadrants[i] != Quadrant::Inside && direction[i] != 0.0 {
                plane_distances[i] = (candidates[i] - origin[i]) / direction[i];
            }
        }

        let mut plane = 0;
        for i in 1..3 {
            if plane_distances[i] > plane_distances[plane] {
                plane = i;
            }
        }

        let t = plane_distances[plane];
        if t < 0.0 {
            return None;
        }

        for axis in Axis::ALL {
            let i = axis.index();
            if i == plane {
                continue;
            }
            let coordinate = origin[i] + t * direction[i];
            if coordinate < bbox.min(axis) || coordinate > bbox.max(axis) {
                return None;
            }
        }

        Some(t)
    }
}
