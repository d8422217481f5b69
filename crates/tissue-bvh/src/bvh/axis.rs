//! Split axis selection policies.

use super::node::NodeContext;
use crate::Axis;

/// Strategy for choosing which axis (or axes) a node may be split along.
///
/// Returning more than one axis asks the constructor to evaluate a split on
/// each and keep the cheapest one.
pub trait AxisSelector: Send + Sync {
    /// Candidate split axes for the node.
    fn select(&self, node: &NodeContext<'_>) -> &'static [Axis];
}

static AXES: [Axis; 3] = Axis::ALL;

fn single(axis: Axis) -> &'static [Axis] {
    let i = axis.index();
    &AXES[i..=i]
}

/// Cycles `x, y, z` with depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotateAxis;

impl AxisSelector for RotateAxis {
    fn select(&self, node: &NodeContext<'_>) -> &'static [Axis] {
        single(Axis::ALL[node.depth % 3])
    }
}

/// Picks the axis along which the node volume is widest.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidestAxis;

impl AxisSelector for WidestAxis {
    fn select(&self, node: &NodeContext<'_>) -> &'static [Axis] {
        single(node.bbox.widest_axis())
    }
}

/// Always splits along one axis.
#[derive(Debug, Clone, Copy)]
pub struct FixedAxis(pub Axis);

impl AxisSelector for FixedAxis {
    fn select(&self, _node: &NodeContext<'_>) -> &'static [Axis] {
        single(self.0)
    }
}

/// Offers all three axes, letting the constructor keep the best split.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideAxes;

impl AxisSelector for WideAxes {
    fn select(&self, _node: &NodeContext<'_>) -> &'static [Axis] {
        &AXES
    }
}
