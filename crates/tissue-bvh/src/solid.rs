//! Polygon meshes grouped into named surfaces.
//!
//! Solids are the polygon suppliers for a [`Scene`](crate::Scene). Every
//! transform goes through [`Polygon`] methods, so cached centroids and boxes
//! are refreshed before the polygons reach a tree.

use std::collections::HashMap;
use std::ops::Range;

use nalgebra::{Point3, Rotation3, Vector3};

use crate::{BoundingBox, Polygon};

/// How flat faces are tessellated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    /// Every face is split into triangles.
    #[default]
    Triangle,
    /// Rectangular faces are kept as quads.
    Quad,
}

#[derive(Debug, Clone, PartialEq)]
struct Surface {
    name: String,
    range: Range<usize>,
}

/// A named polygon mesh with named surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    name: String,
    position: Point3<f64>,
    polygons: Vec<Polygon>,
    surfaces: Vec<Surface>,
    bbox: BoundingBox,
}

impl Solid {
    /// Creates a solid from named surfaces, positioned at the origin.
    pub fn from_surfaces<S: Into<String>>(
        name: S,
        surfaces: impl IntoIterator<Item = (String, Vec<Polygon>)>,
    ) -> Self {
        let mut polygons = Vec::new();
        let mut ranges = Vec::new();
        for (surface_name, surface_polygons) in surfaces {
            let start = polygons.len();
            polygons.extend(surface_polygons);
            ranges.push(Surface {
                name: surface_name,
                range: start..polygons.len(),
            });
        }
        let mut solid = Self {
            name: name.into(),
            position: Point3::origin(),
            polygons,
            surfaces: ranges,
            bbox: BoundingBox::empty(),
        };
        solid.reset_bounding_box();
        solid
    }

    /// Axis-aligned box with the given edge lengths, centered on `position`.
    ///
    /// Surfaces are named `front` (-z), `back` (+z), `left` (-x), `right` (+x),
    /// `bottom` (-y) and `top` (+y). Normals point outward.
    pub fn cuboid(size: Vector3<f64>, position: Point3<f64>, primitive: Primitive) -> Self {
        let h = size / 2.0;
        let corners = [
            Point3::new(-h.x, -h.y, -h.z),
            Point3::new(h.x, -h.y, -h.z),
            Point3::new(h.x, h.y, -h.z),
            Point3::new(-h.x, h.y, -h.z),
            Point3::new(-h.x, -h.y, h.z),
            Point3::new(h.x, -h.y, h.z),
            Point3::new(h.x, h.y, h.z),
            Point3::new(-h.x, h.y, h.z),
        ];

        // Counter-clockwise when viewed from outside.
        let faces: [(&str, [usize; 4]); 6] = [
            ("front", [1, 0, 3, 2]),
            ("back", [4, 5, 6, 7]),
            ("left", [0, 4, 7, 3]),
            ("right", [5, 1, 2, 6]),
            ("bottom", [0, 1, 5, 4]),
            ("top", [7, 6, 2, 3]),
        ];

        let surfaces = faces.iter().map(|(name, [a, b, c, d])| {
            let (a, b, c, d) = (corners[*a], corners[*b], corners[*c], corners[*d]);
            let polygons = match primitive {
                Primitive::Quad => vec![Polygon::quad(a, b, c, d)],
                Primitive::Triangle => vec![Polygon::triangle(a, b, c), Polygon::triangle(a, c, d)],
            };
            (name.to_string(), polygons)
        });

        let mut solid = Self::from_surfaces("cuboid", surfaces);
        solid.translate_to(position);
        solid
    }

    /// Cube with edge length `side`, centered on `position`.
    pub fn cube(side: f64, position: Point3<f64>, primitive: Primitive) -> Self {
        let mut solid = Self::cuboid(Vector3::repeat(side), position, primitive);
        solid.name = "cube".to_string();
        solid
    }

    /// Triangulated sphere obtained by subdividing an icosahedron `order` times.
    ///
    /// All vertices lie on the sphere of `radius`, so the mesh is inscribed in it.
    pub fn ico_sphere(radius: f64, order: usize, position: Point3<f64>) -> Self {
        let (vertices, faces) = ico_sphere_mesh(order);
        let polygons = faces
            .iter()
            .map(|[a, b, c]| {
                Polygon::triangle(
                    Point3::from(vertices[*a] * radius),
                    Point3::from(vertices[*b] * radius),
                    Point3::from(vertices[*c] * radius),
                )
            })
            .collect();

        let mut solid = Self::from_surfaces("sphere", [("ellipsoid".to_string(), polygons)]);
        solid.translate_to(position);
        solid
    }

    /// Returns the solid name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the solid.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Reference point moved by translations and used as the rotation center.
    #[inline]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Bounding box of all polygons.
    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// All polygons, surface by surface.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Number of polygons.
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Surface names in creation order.
    pub fn surface_names(&self) -> impl Iterator<Item = &str> {
        self.surfaces.iter().map(|s| s.name.as_str())
    }

    /// Polygons of one surface, or `None` if no surface has that name.
    pub fn surface_polygons(&self, name: &str) -> Option<&[Polygon]> {
        self.surfaces
            .iter()
            .find(|s| s.name == name)
            .map(|s| &self.polygons[s.range.clone()])
    }

    /// Moves the solid by `offset`.
    pub fn translate_by(&mut self, offset: &Vector3<f64>) {
        self.position += *offset;
        for polygon in &mut self.polygons {
            polygon.translate_by(offset);
        }
        self.reset_bounding_box();
    }

    /// Moves the solid so its position becomes `position`.
    pub fn translate_to(&mut self, position: Point3<f64>) {
        if position == self.position {
            return;
        }
        let offset = position - self.position;
        self.translate_by(&offset);
    }

    /// Rotates the solid about its position by Euler angles in degrees
    /// (about x, then y, then z).
    pub fn rotate(&mut self, x_degrees: f64, y_degrees: f64, z_degrees: f64) {
        let rotation = Rotation3::from_euler_angles(
            x_degrees.to_radians(),
            y_degrees.to_radians(),
            z_degrees.to_radians(),
        );
        let center = self.position;
        for polygon in &mut self.polygons {
            polygon.rotate_about(&center, &rotation);
        }
        self.reset_bounding_box();
    }

    /// Assigns each vertex the average normal of the polygons sharing it,
    /// so hits report interpolated normals.
    ///
    /// Vertices are shared when their coordinates are bit-for-bit equal.
    pub fn smooth(&mut self) {
        let mut accumulated: HashMap<[u64; 3], Vector3<f64>> = HashMap::new();
        for polygon in &self.polygons {
            for vertex in polygon.vertices() {
                *accumulated.entry(vertex_key(vertex)).or_insert_with(Vector3::zeros) +=
                    polygon.normal();
            }
        }

        for polygon in &mut self.polygons {
            let normals = polygon
                .vertices()
                .iter()
                .map(|vertex| {
                    accumulated[&vertex_key(vertex)]
                        .try_normalize(f64::EPSILON)
                        .unwrap_or(polygon.normal())
                })
                .collect();
            polygon.set_vertex_normals(Some(normals));
        }
    }

    fn reset_bounding_box(&mut self) {
        let mut bbox = BoundingBox::empty();
        for polygon in &self.polygons {
            bbox.extend_to(polygon.bbox());
        }
        self.bbox = bbox;
    }
}

fn vertex_key(vertex: &Point3<f64>) -> [u64; 3] {
    [vertex.x.to_bits(), vertex.y.to_bits(), vertex.z.to_bits()]
}

/// Unit-sphere vertices and outward-wound triangles of a subdivided icosahedron.
fn ico_sphere_mesh(order: usize) -> (Vec<Vector3<f64>>, Vec<[usize; 3]>) {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<Vector3<f64>> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|[x, y, z]| Vector3::new(*x, *y, *z).normalize())
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..order {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<Vector3<f64>>| {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let middle = ((vertices[a] + vertices[b]) / 2.0).normalize();
                vertices.push(middle);
                vertices.len() - 1
            })
        };

        let mut subdivided = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            subdivided.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = subdivided;
    }

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Axis;
    use approx::assert_relative_eq;

    #[test]
    fn cube_has_outward_faces_and_bbox() {
        let cube = Solid::cube(2.0, Point3::new(0.0, 0.0, 5.0), Primitive::Triangle);

        assert_eq!(cube.polygon_count(), 12);
        assert_eq!(cube.bbox().min(Axis::Z), 4.0);
        assert_eq!(cube.bbox().max(Axis::Z), 6.0);

        for polygon in cube.surface_polygons("front").unwrap() {
            assert_relative_eq!(polygon.normal(), -Vector3::z());
        }
        for polygon in cube.surface_polygons("top").unwrap() {
            assert_relative_eq!(polygon.normal(), Vector3::y());
        }
    }

    #[test]
    fn quad_cube_has_one_polygon_per_face() {
        let cube = Solid::cube(1.0, Point3::origin(), Primitive::Quad);
        assert_eq!(cube.polygon_count(), 6);
        assert_eq!(cube.surface_names().count(), 6);
        assert!(cube.surface_polygons("missing").is_none());
    }

    #[test]
    fn translate_updates_polygons_and_bbox() {
        let mut cube = Solid::cube(2.0, Point3::origin(), Primitive::Triangle);
        cube.translate_by(&Vector3::new(10.0, 0.0, 0.0));

        assert_eq!(cube.position(), Point3::new(10.0, 0.0, 0.0));
        assert_eq!(cube.bbox().min(Axis::X), 9.0);
        for polygon in cube.polygons() {
            assert!(polygon.centroid().x >= 9.0);
            assert!(polygon.bbox().min(Axis::X) >= 9.0);
        }
    }

    #[test]
    fn rotate_updates_bbox() {
        let mut slab = Solid::cuboid(Vector3::new(4.0, 1.0, 1.0), Point3::origin(), Primitive::Quad);
        slab.rotate(0.0, 0.0, 90.0);

        assert_relative_eq!(slab.bbox().extent(Axis::Y), 4.0, epsilon = 1e-9);
        assert_relative_eq!(slab.bbox().extent(Axis::X), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn ico_sphere_vertices_lie_on_sphere() {
        let sphere = Solid::ico_sphere(2.0, 1, Point3::new(0.0, 0.0, 3.0));
        assert_eq!(sphere.polygon_count(), 80);

        let center = Point3::new(0.0, 0.0, 3.0);
        for polygon in sphere.polygons() {
            for vertex in polygon.vertices() {
                assert_relative_eq!((vertex - center).norm(), 2.0, epsilon = 1e-9);
            }
            // Outward winding.
            assert!(polygon.normal().dot(&(polygon.centroid() - center)) > 0.0);
        }
    }

    #[test]
    fn smooth_sets_unit_vertex_normals() {
        let mut sphere = Solid::ico_sphere(1.0, 0, Point3::origin());
        sphere.smooth();

        for polygon in sphere.polygons() {
            assert!(polygon.is_smooth());
            for (vertex, normal) in polygon.vertices().iter().zip(polygon.vertex_normals().unwrap()) {
                assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-9);
                // Averaged normals of an icosahedron point along the vertex direction.
                assert_relative_eq!(*normal, vertex.coords.normalize(), epsilon = 1e-9);
            }
        }
    }
}
