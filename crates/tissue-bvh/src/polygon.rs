//! Convex polygons with cached geometry and an exact ray hit test.

use nalgebra::{Point3, Rotation3, Vector3};

use crate::{BoundingBox, Ray};

/// Below this `|normal · direction|` a ray is treated as parallel to the polygon plane.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Distance in world units by which a plane hit may fall outside a triangle edge.
///
/// Hits exactly on an edge shared by two triangles are accepted by both. Must
/// stay below [`NODE_BOX_PADDING`](crate::finder::NODE_BOX_PADDING).
pub(crate) const EDGE_TOLERANCE: f64 = 1e-9;

/// A planar convex polygon in 3D space.
///
/// Vertices are in counter-clockwise order when viewed from the side the
/// normal points to. The unit normal, centroid and bounding box are cached
/// and recomputed by every method that moves a vertex, so they are never
/// stale when the polygon is handed to a tree or a finder.
///
/// Degenerate polygons (collinear or coincident vertices) are allowed. Their
/// normal is the zero vector and rays never hit them.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3<f64>>,
    vertex_normals: Option<Vec<Vector3<f64>>>,
    normal: Vector3<f64>,
    centroid: Point3<f64>,
    bbox: BoundingBox,
}

/// Where and how a ray hits a single polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonHit {
    /// Distance from the ray origin (always positive).
    pub distance: f64,
    /// Hit position.
    pub position: Point3<f64>,
    /// Surface normal at the hit: the flat polygon normal, or the
    /// interpolated vertex normal for smooth polygons.
    pub normal: Vector3<f64>,
}

impl Polygon {
    /// Creates a polygon from an ordered list of vertices.
    ///
    /// # Panics (debug builds only)
    /// Panics if fewer than 3 vertices are provided.
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        debug_assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        let mut polygon = Self {
            vertices,
            vertex_normals: None,
            normal: Vector3::zeros(),
            centroid: Point3::origin(),
            bbox: BoundingBox::empty(),
        };
        polygon.refresh();
        polygon
    }

    /// Creates a triangle.
    pub fn triangle(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self::new(vec![a, b, c])
    }

    /// Creates a quad. It is hit-tested as the triangles `abc` and `acd`.
    pub fn quad(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, d: Point3<f64>) -> Self {
        Self::new(vec![a, b, c, d])
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Unit normal, or the zero vector for a degenerate polygon.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Mean of the vertex positions.
    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }

    /// Bounding box of the vertices.
    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Per-vertex normals, present once the polygon has been smoothed.
    #[inline]
    pub fn vertex_normals(&self) -> Option<&[Vector3<f64>]> {
        self.vertex_normals.as_deref()
    }

    /// Returns `true` if hits report interpolated vertex normals.
    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.vertex_normals.is_some()
    }

    /// Sets or clears the per-vertex normals used for smooth shading.
    ///
    /// # Panics (debug builds only)
    /// Panics if the number of normals differs from the number of vertices.
    pub fn set_vertex_normals(&mut self, normals: Option<Vec<Vector3<f64>>>) {
        if let Some(ref normals) = normals {
            debug_assert_eq!(
                normals.len(),
                self.vertices.len(),
                "one normal is required per vertex"
            );
        }
        self.vertex_normals = normals;
    }

    /// Replaces all vertices and recomputes the cached geometry.
    ///
    /// Vertex normals are dropped if the vertex count changes.
    pub fn set_vertices(&mut self, vertices: Vec<Point3<f64>>) {
        debug_assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        if self
            .vertex_normals
            .as_ref()
            .is_some_and(|normals| normals.len() != vertices.len())
        {
            self.vertex_normals = None;
        }
        self.vertices = vertices;
        self.refresh();
    }

    /// Moves every vertex by `offset`.
    pub fn translate_by(&mut self, offset: &Vector3<f64>) {
        for vertex in &mut self.vertices {
            *vertex += *offset;
        }
        self.refresh();
    }

    /// Rotates every vertex (and vertex normal) about `center`.
    pub fn rotate_about(&mut self, center: &Point3<f64>, rotation: &Rotation3<f64>) {
        for vertex in &mut self.vertices {
            *vertex = *center + rotation * (*vertex - *center);
        }
        if let Some(ref mut normals) = self.vertex_normals {
            for normal in normals.iter_mut() {
                *normal = rotation * *normal;
            }
        }
        self.refresh();
    }

    /// Recomputes normal, centroid and bounding box from the vertices.
    fn refresh(&mut self) {
        self.normal = newell_normal(&self.vertices)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let sum: Vector3<f64> = self.vertices.iter().map(|p| p.coords).sum();
        self.centroid = Point3::from(sum / self.vertices.len().max(1) as f64);
        self.bbox = BoundingBox::from_vertices(&self.vertices);
    }

    /// Intersects a ray with this polygon.
    ///
    /// The ray is first intersected with the polygon plane; the plane hit is
    /// accepted if it lies in one of the fan triangles `(v0, vi, vi+1)`.
    /// Returns `None` for parallel rays, hits behind or at the origin, and
    /// degenerate polygons.
    pub fn intersect(&self, ray: &Ray) -> Option<PolygonHit> {
        let denominator = self.normal.dot(&ray.direction());
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let anchor = self.vertices[0];
        let t = self.normal.dot(&(anchor - ray.origin())) / denominator;
        if !(t > 0.0) {
            return None;
        }

        let position = ray.at(t);
        for i in 1..self.vertices.len() - 1 {
            let corners = [anchor, self.vertices[i], self.vertices[i + 1]];
            if let Some(weights) = barycentric(&corners, &position) {
                return Some(PolygonHit {
                    distance: t,
                    position,
                    normal: self.shading_normal([0, i, i + 1], weights),
                });
            }
        }
        None
    }

    fn shading_normal(&self, corners: [usize; 3], weights: [f64; 3]) -> Vector3<f64> {
        let Some(ref normals) = self.vertex_normals else {
            return self.normal;
        };
        let blended: Vector3<f64> = corners
            .iter()
            .zip(weights)
            .map(|(&i, w)| normals[i] * w)
            .sum();
        blended.try_normalize(f64::EPSILON).unwrap_or(self.normal)
    }
}

/// Newell's method: robust normal direction for any planar polygon.
fn newell_normal(vertices: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for (i, current) in vertices.iter().enumerate() {
        let next = &vertices[(i + 1) % vertices.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

/// Barycentric weights of `point` in the triangle, if it lies inside.
fn barycentric(corners: &[Point3<f64>; 3], point: &Point3<f64>) -> Option<[f64; 3]> {
    let [a, b, c] = corners;
    let e1 = b - a;
    let e2 = c - a;
    let w = point - a;

    let d00 = e1.dot(&e1);
    let d01 = e1.dot(&e2);
    let d11 = e2.dot(&e2);
    let d20 = w.dot(&e1);
    let d21 = w.dot(&e2);

    let denominator = d00 * d11 - d01 * d01;
    if denominator.abs() < f64::EPSILON * d00 * d11 || denominator == 0.0 {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denominator;
    let w = (d00 * d21 - d01 * d20) / denominator;
    let u = 1.0 - v - w;

    // A weight times the triangle height over the opposite edge is the
    // in-plane distance to that edge.
    let twice_area = e1.cross(&e2).norm();
    let heights = [twice_area / (c - b).norm(), twice_area / e2.norm(), twice_area / e1.norm()];
    let weights = [u, v, w];
    if weights
        .iter()
        .zip(heights)
        .all(|(weight, height)| weight * height >= -EDGE_TOLERANCE)
    {
        Some(weights)
    } else {
        None
    }
}
