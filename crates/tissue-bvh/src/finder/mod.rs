//! Nearest-intersection queries.
//!
//! Both finders answer the same question over a fixed polygon table: which
//! polygon does a ray hit first, where, and with which surface normal.
//!
//! - [`SimpleIntersectionFinder`] tests every polygon. It is the reference
//!   the accelerated finder is checked against.
//! - [`FastIntersectionFinder`] walks a [`SpatialTree`](crate::SpatialTree),
//!   visiting nearer children first and skipping subtrees that start beyond
//!   the best hit found so far.
//!
//! Finders hold no mutable state and are `Send + Sync`, so one finder can
//! serve any number of threads.

mod fast;
mod simple;

pub use fast::{FastIntersectionFinder, NODE_BOX_PADDING};
pub use simple::SimpleIntersectionFinder;

use crate::{Intersection, Polygon, Ray};

/// A nearest-hit query over a fixed polygon table.
pub trait IntersectionFinder: Send + Sync {
    /// Nearest polygon hit along `ray`, or `None` if the ray hits nothing.
    ///
    /// Exact distance ties resolve to the lower polygon index.
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection>;

    /// The polygon table that [`Intersection::polygon`] indexes into.
    fn polygons(&self) -> &[Polygon];
}

/// Answers a batch of rays, in order.
///
/// With the `parallel` feature the rays are spread over the rayon thread pool.
pub fn find_all<F>(finder: &F, rays: &[Ray]) -> Vec<Option<Intersection>>
where
    F: IntersectionFinder + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        rays.par_iter().map(|ray| finder.find_intersection(ray)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        rays.iter().map(|ray| finder.find_intersection(ray)).collect()
    }
}
