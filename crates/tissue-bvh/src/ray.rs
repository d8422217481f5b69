//! Rays used as query objects.

use nalgebra::{Point3, Vector3};

/// Replacement for an exactly-zero direction component before it is inverted.
///
/// Keeps slab parameters large and finite instead of producing `NaN` from
/// `0 * inf` when the origin lies on a slab boundary.
pub const DIRECTION_EPSILON: f64 = 1e-37;

/// A half-line with an origin and a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3<f64>,
    direction: Vector3<f64>,
    inverse_direction: Vector3<f64>,
}

impl Ray {
    /// Creates a ray. `direction` is normalized.
    ///
    /// # Panics (debug builds only)
    /// Panics if `direction` has zero length.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        let length = direction.norm();
        debug_assert!(length > 0.0, "Ray direction cannot be zero");
        let direction = direction / length;
        Self {
            origin,
            direction,
            inverse_direction: direction.map(safe_inverse),
        }
    }

    /// Returns the ray origin.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Returns the unit direction.
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Component-wise reciprocal of the direction, with zero components
    /// replaced by [`DIRECTION_EPSILON`] first.
    #[inline]
    pub fn inverse_direction(&self) -> Vector3<f64> {
        self.inverse_direction
    }

    /// Point at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

#[inline]
fn safe_inverse(component: f64) -> f64 {
    if component == 0.0 {
        1.0 / DIRECTION_EPSILON
    } else {
        1.0 / component
    }
}
