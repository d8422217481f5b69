//! Visitor pattern for leaf enumeration.
//!
//! Visitors receive each leaf of a [`SpatialTree`](super::SpatialTree) in
//! depth-first order, low child before high child.

use crate::BoundingBox;

/// Visitor called once per tree leaf.
pub trait LeafVisitor {
    /// Called with the leaf volume and its polygon indices.
    fn visit(&mut self, bbox: &BoundingBox, polygons: &[usize]);
}

/// A visitor that records every leaf it sees.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    leaves: Vec<(BoundingBox, Vec<usize>)>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected leaves.
    pub fn leaves(&self) -> &[(BoundingBox, Vec<usize>)] {
        &self.leaves
    }

    /// Consumes the visitor, returning the collected leaves.
    pub fn into_leaves(self) -> Vec<(BoundingBox, Vec<usize>)> {
        self.leaves
    }

    /// Distinct polygon indices across all leaves, sorted.
    pub fn distinct_polygons(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self.leaves.iter().flat_map(|(_, p)| p.iter().copied()).collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

impl LeafVisitor for CollectingVisitor {
    fn visit(&mut self, bbox: &BoundingBox, polygons: &[usize]) {
        self.leaves.push((*bbox, polygons.to_vec()));
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F>
where
    F: FnMut(&BoundingBox, &[usize]),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&BoundingBox, &[usize]),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> LeafVisitor for FnVisitor<F>
where
    F: FnMut(&BoundingBox, &[usize]),
{
    fn visit(&mut self, bbox: &BoundingBox, polygons: &[usize]) {
        (self.func)(bbox, polygons);
    }
}
