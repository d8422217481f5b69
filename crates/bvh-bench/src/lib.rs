//! Scenes, ray sources and agreement checks for the headless benchmark.

use std::time::{Duration, Instant};

use nalgebra::{Point3, Rotation3, Vector3};
use tissue_bvh::{IntersectionFinder, Primitive, Ray, Scene, Solid};

/// A fan of rays leaving one point, spread evenly over two angular spans
/// around a central direction.
///
/// The `x` span rotates the central direction about the y axis and the `y`
/// span about the x axis. A span with resolution 1 contributes only the
/// central angle.
#[derive(Debug, Clone, Copy)]
pub struct UniformRaySource {
    origin: Point3<f64>,
    direction: Vector3<f64>,
    x_theta: f64,
    y_theta: f64,
    x_resolution: usize,
    y_resolution: usize,
}

impl UniformRaySource {
    /// Creates a source. Spans are full angles in degrees.
    pub fn new(
        origin: Point3<f64>,
        direction: Vector3<f64>,
        x_theta_degrees: f64,
        y_theta_degrees: f64,
        x_resolution: usize,
        y_resolution: usize,
    ) -> Self {
        Self {
            origin,
            direction,
            x_theta: x_theta_degrees.to_radians(),
            y_theta: y_theta_degrees.to_radians(),
            x_resolution,
            y_resolution,
        }
    }

    /// Number of rays emitted.
    pub fn len(&self) -> usize {
        self.x_resolution * self.y_resolution
    }

    /// Returns true if the source emits no ray.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rays, row by row.
    pub fn rays(&self) -> Vec<Ray> {
        let mut rays = Vec::with_capacity(self.len());
        for j in 0..self.y_resolution {
            let y_angle = spread(self.y_theta, j, self.y_resolution);
            for i in 0..self.x_resolution {
                let x_angle = spread(self.x_theta, i, self.x_resolution);
                let rotation = Rotation3::from_euler_angles(y_angle, x_angle, 0.0);
                rays.push(Ray::new(self.origin, rotation * self.direction));
            }
        }
        rays
    }
}

/// Angle of sample `i` of `n` across a span centered on zero, ends included.
fn spread(span: f64, i: usize, n: usize) -> f64 {
    if n < 2 {
        return 0.0;
    }
    -span / 2.0 + span * i as f64 / (n - 1) as f64
}

/// A closed room holding a few overlapping, rotated and smoothed solids.
///
/// The room's back wall is the plane `z = -9.95`.
pub fn phantom_scene() -> Scene {
    let mut room = Solid::cuboid(Vector3::new(20.0, 20.0, 19.9), Point3::origin(), Primitive::Quad);
    room.set_name("room");

    let mut lens = Solid::ico_sphere(1.0, 3, Point3::new(3.0, 0.0, -3.0));
    lens.set_name("lens");
    lens.smooth();

    let mut core = Solid::ico_sphere(0.5, 2, Point3::new(3.0, 0.0, -3.0));
    core.set_name("core");

    let mut block = Solid::cube(2.0, Point3::new(-4.0, -3.0, 2.0), Primitive::Triangle);
    block.set_name("block");
    block.rotate(20.0, 35.0, 0.0);

    let mut floor = Solid::cuboid(Vector3::new(16.0, 0.4, 16.0), Point3::new(0.0, -6.0, 0.0), Primitive::Triangle);
    floor.set_name("floor");

    Scene::new(vec![room, lens, core, block, floor])
}

/// A `n × n × n` grid of spheres, for scaling runs.
pub fn sphere_grid(n: usize, order: usize) -> Scene {
    let mut scene = Scene::default();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let center = Point3::new(3.0 * i as f64, 3.0 * j as f64, 3.0 * k as f64);
                scene.add(Solid::ico_sphere(1.0, order, center));
            }
        }
    }
    scene
}

/// Runs `f` and measures how long it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Outcome of comparing a finder against a reference on a batch of rays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agreement {
    /// Rays compared.
    pub rays: usize,
    /// Rays the reference finder reported a hit for.
    pub hits: usize,
    /// Indices of rays whose results differ.
    pub mismatches: Vec<usize>,
}

impl Agreement {
    /// Returns true if no ray disagreed.
    pub fn is_exact(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compares two finders ray by ray: same hit or miss, same polygon, and
/// distances within `tolerance`.
pub fn compare<R, C>(reference: &R, candidate: &C, rays: &[Ray], tolerance: f64) -> Agreement
where
    R: IntersectionFinder + ?Sized,
    C: IntersectionFinder + ?Sized,
{
    let expected = tissue_bvh::find_all(reference, rays);
    let actual = tissue_bvh::find_all(candidate, rays);

    let mut agreement = Agreement {
        rays: rays.len(),
        ..Agreement::default()
    };
    for (i, (expected, actual)) in expected.iter().zip(&actual).enumerate() {
        agreement.hits += expected.is_some() as usize;
        let same = match (expected, actual) {
            (None, None) => true,
            (Some(e), Some(a)) => e.polygon == a.polygon && (e.distance - a.distance).abs() <= tolerance,
            _ => false,
        };
        if !same {
            agreement.mismatches.push(i);
        }
    }
    agreement
}
