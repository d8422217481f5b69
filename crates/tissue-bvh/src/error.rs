//! Tree construction errors.

use thiserror::Error;

use crate::Axis;

/// Reasons a tree cannot be built.
///
/// Only invalid configuration or a misbehaving splitter fails a build;
/// degenerate geometry never does.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Maximum depth exceeds the supported recursion limit.
    #[error("max depth {depth} exceeds the limit of {limit}")]
    MaxDepthTooLarge { depth: usize, limit: usize },

    /// The surface-area heuristic needs at least one candidate plane.
    #[error("surface area heuristic needs at least one candidate plane")]
    NoCandidatePlanes,

    /// Split cost fraction must lie in `[0, 1)`.
    #[error("split cost fraction {0} is outside [0, 1)")]
    InvalidSplitCost(f64),

    /// A splitter returned a split coordinate that is not a finite number.
    #[error("splitter returned non-finite split line {line} on axis {axis} at depth {depth}")]
    NonFiniteSplit { axis: Axis, line: f64, depth: usize },
}
