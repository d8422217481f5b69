//! Nearest-polygon ray queries for Monte Carlo light transport.
//!
//! Photon propagation asks one question over and over: along this ray, which
//! polygon of the scene comes first? This crate answers it.
//!
//! - Geometry: [`BoundingBox`], [`Ray`], [`Polygon`], and the [`Solid`] and
//!   [`Scene`] containers that supply polygons.
//! - Ray versus box tests: [`SlabIntersect`] and [`CandidatePlaneIntersect`].
//! - A bounding volume hierarchy ([`bvh`]) with pluggable construction
//!   policies, configured through [`TreeConfig`].
//! - Two [`IntersectionFinder`]s: brute force and tree accelerated.
//!
//! # Example
//!
//! ```ignore
//! use nalgebra::{Point3, Vector3};
//! use tissue_bvh::{FastIntersectionFinder, IntersectionFinder, Primitive, Ray, Scene, Solid};
//!
//! let scene = Scene::new(vec![Solid::cube(2.0, Point3::new(0.0, 0.0, 5.0), Primitive::Triangle)]);
//! let finder = FastIntersectionFinder::new(&scene)?;
//!
//! let hit = finder.find_intersection(&Ray::new(Point3::origin(), Vector3::z()));
//! assert_eq!(hit.map(|hit| hit.distance), Some(4.0));
//! ```

mod axis;
mod bbox;
mod box_intersect;
mod config;
mod error;
mod intersection;
mod polygon;
mod ray;
mod scene;
mod solid;

pub mod bvh;
pub mod finder;

pub use axis::{Axis, Edge};
pub use bbox::BoundingBox;
pub use box_intersect::{BoxIntersect, CandidatePlaneIntersect, SlabIntersect};
pub use bvh::{SpatialTree, TreeStats};
pub use config::{AxisPolicy, PartitionKind, SplitterKind, TreeConfig, DEFAULT_SAH_PLANES, DEFAULT_SAH_SPLIT_COST};
pub use error::BuildError;
pub use finder::{find_all, FastIntersectionFinder, IntersectionFinder, SimpleIntersectionFinder};
pub use intersection::Intersection;
pub use polygon::{Polygon, PolygonHit};
pub use ray::{Ray, DIRECTION_EPSILON};
pub use scene::Scene;
pub use solid::{Primitive, Solid};
