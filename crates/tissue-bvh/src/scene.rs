//! Scenes: ordered collections of solids sharing one polygon table.

use std::sync::Arc;

use crate::{BoundingBox, Polygon, Solid};

/// An ordered set of solids.
///
/// Polygon indices used by trees, finders and [`Intersection`](crate::Intersection)
/// refer to the flattened table returned by [`polygons`](Self::polygons):
/// the polygons of the first solid, then those of the second, and so on.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    solids: Vec<Solid>,
}

impl Scene {
    /// Creates a scene from solids.
    pub fn new(solids: Vec<Solid>) -> Self {
        Self { solids }
    }

    /// Appends a solid.
    pub fn add(&mut self, solid: Solid) {
        self.solids.push(solid);
    }

    /// Returns the solids in insertion order.
    #[inline]
    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    /// Mutable access for placement. Tables taken earlier are snapshots and
    /// do not see later changes.
    #[inline]
    pub fn solids_mut(&mut self) -> &mut [Solid] {
        &mut self.solids
    }

    /// Total number of polygons across all solids.
    pub fn polygon_count(&self) -> usize {
        self.solids.iter().map(Solid::polygon_count).sum()
    }

    /// Snapshot of every polygon as one shared table.
    pub fn polygons(&self) -> Arc<[Polygon]> {
        self.solids
            .iter()
            .flat_map(|solid| solid.polygons().iter().cloned())
            .collect()
    }

    /// Union of the solid bounding boxes (empty for an empty scene).
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for solid in &self.solids {
            bbox.extend_to(solid.bbox());
        }
        bbox
    }

    /// Solid owning the polygon at `index` of the flattened table.
    pub fn solid_of(&self, index: usize) -> Option<&Solid> {
        let mut start = 0;
        for solid in &self.solids {
            let end = start + solid.polygon_count();
            if index < end {
                return Some(solid);
            }
            start = end;
        }
        None
    }
}
