//! Axis-aligned bounding boxes.

use nalgebra::{Point3, Vector3};

use crate::{Axis, Edge};

/// An axis-aligned bounding box, stored as its minimum and maximum corners.
///
/// A box may be *empty*: it then contains no point, acts as the identity for
/// [`extend_to`](Self::extend_to) and overlaps nothing. An empty box is
/// distinct from a zero-size box around a single point, which does contain
/// that point and does grow a union to include it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl BoundingBox {
    /// Creates a box from its two corners.
    ///
    /// # Panics (debug builds only)
    /// Panics if `min` exceeds `max` on any axis.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "BoundingBox min corner must not exceed max corner"
        );
        Self { min, max }
    }

    /// Creates a box from per-axis `[min, max]` limits.
    pub fn from_limits(x: [f64; 2], y: [f64; 2], z: [f64; 2]) -> Self {
        Self::new(Point3::new(x[0], y[0], z[0]), Point3::new(x[1], y[1], z[1]))
    }

    /// Returns the empty box.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box enclosing every point of `vertices`.
    ///
    /// Returns the empty box when `vertices` is empty.
    pub fn from_vertices<'a, I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut bbox = Self::empty();
        for vertex in vertices {
            bbox.extend_to_point(vertex);
        }
        bbox
    }

    /// Returns `true` if the box contains no point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min_corner(&self) -> Point3<f64> {
        self.min
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max_corner(&self) -> Point3<f64> {
        self.max
    }

    /// Lower bound along `axis`.
    #[inline]
    pub fn min(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    /// Upper bound along `axis`.
    #[inline]
    pub fn max(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    /// Bound of `axis` selected by `edge`.
    #[inline]
    pub fn bound(&self, axis: Axis, edge: Edge) -> f64 {
        match edge {
            Edge::Min => self.min(axis),
            Edge::Max => self.max(axis),
        }
    }

    /// Width of the box along `axis` (0 for an empty box).
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max(axis) - self.min(axis)
        }
    }

    /// Axis along which the box is widest. Ties resolve to the earlier axis.
    pub fn widest_axis(&self) -> Axis {
        let mut widest = Axis::X;
        for axis in [Axis::Y, Axis::Z] {
            if self.extent(axis) > self.extent(widest) {
                widest = axis;
            }
        }
        widest
    }

    /// Center point of the box.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Total area of the six faces (0 for an empty box).
    pub fn surface_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let d: Vector3<f64> = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Grows this box in place so it also encloses `other`.
    ///
    /// Extending by an empty box changes nothing; extending an empty box by
    /// `other` yields `other`. Repeating the same extension is a no-op.
    pub fn extend_to(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Grows this box in place so it also encloses `point`.
    pub fn extend_to_point(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Returns `true` if the closed boxes overlap on all three axes.
    ///
    /// Boxes that only touch along a face, edge or corner do intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        Axis::ALL.iter().all(|&axis| {
            self.min(axis) <= other.max(axis) && other.min(axis) <= self.max(axis)
        })
    }

    /// Returns `true` if `point` lies inside the closed box.
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let v = point[axis.index()];
            self.min(axis) <= v && v <= self.max(axis)
        })
    }

    /// Returns a copy of this box with one bound replaced.
    ///
    /// Only the `edge` bound along `axis` changes; the other five bounds are
    /// copied unchanged. `self` is left untouched.
    pub fn change_to_new(&self, axis: Axis, edge: Edge, value: f64) -> BoundingBox {
        let mut changed = *self;
        match edge {
            Edge::Min => changed.min[axis.index()] = value,
            Edge::Max => changed.max[axis.index()] = value,
        }
        changed
    }

    /// Returns a copy grown by `margin` on every side. Empty boxes stay empty.
    pub fn padded(&self, margin: f64) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let pad = Vector3::repeat(margin);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube_at(x: f64, y: f64, z: f64) -> BoundingBox {
        BoundingBox::from_limits([x, x + 1.0], [y, y + 1.0], [z, z + 1.0])
    }

    #[test]
    fn empty_box_is_empty() {
        let bbox = BoundingBox::empty();
        assert!(bbox.is_empty());
        assert_eq!(bbox.surface_area(), 0.0);
        assert_eq!(bbox.extent(Axis::X), 0.0);
    }

    #[test]
    fn zero_size_box_is_not_empty() {
        let point = Point3::new(1.0, 2.0, 3.0);
        let bbox = BoundingBox::new(point, point);
        assert!(!bbox.is_empty());
        assert!(bbox.contains_point(&point));
    }

    #[test]
    fn from_vertices_encloses_all_points() {
        let points = [
            Point3::new(0.0, -1.0, 2.0),
            Point3::new(3.0, 1.0, -2.0),
            Point3::new(1.0, 0.5, 0.0),
        ];
        let bbox = BoundingBox::from_vertices(&points);

        assert_eq!(bbox.min_corner(), Point3::new(0.0, -1.0, -2.0));
        assert_eq!(bbox.max_corner(), Point3::new(3.0, 1.0, 2.0));
    }

    #[test]
    fn from_no_vertices_is_empty() {
        let bbox = BoundingBox::from_vertices(&[]);
        assert!(bbox.is_empty());
    }

    #[test]
    fn extend_empty_takes_other() {
        let other = unit_cube_at(2.0, 2.0, 2.0);
        let mut bbox = BoundingBox::empty();
        bbox.extend_to(&other);
        assert_eq!(bbox, other);
    }

    #[test]
    fn extend_by_empty_is_identity() {
        let original = unit_cube_at(2.0, 2.0, 2.0);
        let mut bbox = original;
        bbox.extend_to(&BoundingBox::empty());
        assert_eq!(bbox, original);
    }

    #[test]
    fn extend_is_idempotent() {
        let mut bbox = unit_cube_at(0.0, 0.0, 0.0);
        let other = unit_cube_at(3.0, -2.0, 1.0);

        bbox.extend_to(&other);
        let once = bbox;
        bbox.extend_to(&other);

        assert_eq!(bbox, once);
        assert_eq!(bbox.min_corner(), Point3::new(0.0, -2.0, 0.0));
        assert_eq!(bbox.max_corner(), Point3::new(4.0, 1.0, 2.0));
    }

    #[test]
    fn zero_box_union_is_not_identity() {
        // A zero-size box at the origin is a real point and must grow the union.
        let mut bbox = BoundingBox::from_limits([0.0, 0.0], [0.0, 0.0], [0.0, 0.0]);
        bbox.extend_to(&unit_cube_at(5.0, 5.0, 5.0));
        assert_eq!(bbox.min_corner(), Point3::origin());
    }

    #[test]
    fn intersects_overlapping_and_touching() {
        let a = unit_cube_at(0.0, 0.0, 0.0);
        assert!(a.intersects(&unit_cube_at(0.5, 0.5, 0.5)));
        assert!(a.intersects(&unit_cube_at(1.0, 0.0, 0.0)));
        assert!(!a.intersects(&unit_cube_at(1.5, 0.0, 0.0)));
        assert!(!a.intersects(&unit_cube_at(0.0, 0.0, -2.0)));
    }

    #[test]
    fn intersects_never_with_empty() {
        let a = unit_cube_at(0.0, 0.0, 0.0);
        assert!(!a.intersects(&BoundingBox::empty()));
        assert!(!BoundingBox::empty().intersects(&a));
    }

    #[test]
    fn change_to_new_changes_exactly_one_bound() {
        let original = BoundingBox::from_limits([-1.0, 4.0], [-1.0, 3.0], [-1.0, 5.0]);
        let changed = original.change_to_new(Axis::Y, Edge::Max, 0.5);

        assert_eq!(changed.max(Axis::Y), 0.5);
        assert_eq!(original.max(Axis::Y), 3.0);

        let mut differing = 0;
        for axis in Axis::ALL {
            for edge in [Edge::Min, Edge::Max] {
                if changed.bound(axis, edge) != original.bound(axis, edge) {
                    differing += 1;
                }
            }
        }
        assert_eq!(differing, 1);
    }

    #[test]
    fn widest_axis_and_surface_area() {
        let bbox = BoundingBox::from_limits([0.0, 1.0], [0.0, 3.0], [0.0, 2.0]);
        assert_eq!(bbox.widest_axis(), Axis::Y);
        assert_relative_eq!(bbox.surface_area(), 2.0 * (3.0 + 6.0 + 2.0));
        assert_eq!(bbox.center(), Point3::new(0.5, 1.5, 1.0));
    }

    #[test]
    fn padded_grows_every_side() {
        let bbox = unit_cube_at(0.0, 0.0, 0.0).padded(0.5);
        assert_eq!(bbox.min_corner(), Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max_corner(), Point3::new(1.5, 1.5, 1.5));
        assert!(BoundingBox::empty().padded(1.0).is_empty());
    }
}
