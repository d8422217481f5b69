//! Named tree construction presets.
//!
//! [`TreeConfig`] picks one policy from each closed family (axis selection,
//! split placement, partitioning). Building from a config dispatches to a
//! statically typed [`TreeConstructor`].

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bvh::{
    AxisSelector, BBoxPolyCounter, CentroidPolyCounter, FixedAxis, MeanCentroidSplitter, MiddleSpanSplitter,
    NoSplitAxes, NodeSplitter, PolyCounter, RotateAxis, SahSplitter, SpatialTree, TreeConstructor, WideAxes, WidestAxis,
    DEFAULT_MAX_DEPTH, DEFAULT_MIN_SPLIT_POLYGONS, MAX_DEPTH_LIMIT,
};
use crate::{Axis, BoundingBox, BuildError, Polygon};

/// Default number of SAH candidate planes per axis.
pub const DEFAULT_SAH_PLANES: usize = 20;

/// Default fraction by which a hard SAH split must beat the leaf cost.
pub const DEFAULT_SAH_SPLIT_COST: f64 = 0.1;

/// How each node picks its split axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum AxisPolicy {
    /// `x, y, z` by depth.
    RoundRobin,
    /// The widest axis of the node volume.
    Widest,
    /// Always the same axis.
    Fixed(Axis),
    /// Every axis, keeping the cheapest split.
    #[default]
    Wide,
}

/// Where the split plane goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SplitterKind {
    /// Mean of polygon centroids.
    MeanCentroid,
    /// Middle of the node volume.
    MiddleSpan,
    /// Surface area heuristic requiring a cost margin.
    #[default]
    HardSah,
    /// Surface area heuristic accepting any improvement.
    SoftSah,
    /// Never split.
    NoSplit,
}

/// How polygons are assigned to children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum PartitionKind {
    /// By bounding-box overlap, duplicating straddling polygons.
    #[default]
    BoundingBox,
    /// By centroid side, without duplication.
    Centroid,
}

/// Tree construction settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TreeConfig {
    /// Maximum depth, at most [`MAX_DEPTH_LIMIT`]. 0 yields a single leaf.
    pub max_depth: usize,
    /// Nodes with fewer polygons stay leaves.
    pub min_split_polygons: usize,
    /// Axis selection policy.
    pub axis: AxisPolicy,
    /// Split placement policy.
    pub splitter: SplitterKind,
    /// Partitioning policy.
    pub partition: PartitionKind,
    /// Candidate planes per axis for the SAH splitters.
    pub sah_planes: usize,
    /// Required SAH improvement fraction for [`SplitterKind::HardSah`], in `[0, 1)`.
    pub sah_split_cost: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::sah_wide_axis()
    }
}

impl TreeConfig {
    /// Surface area heuristic on all three axes with bounding-box partitioning.
    pub fn sah_wide_axis() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_split_polygons: DEFAULT_MIN_SPLIT_POLYGONS,
            axis: AxisPolicy::Wide,
            splitter: SplitterKind::HardSah,
            partition: PartitionKind::BoundingBox,
            sah_planes: DEFAULT_SAH_PLANES,
            sah_split_cost: DEFAULT_SAH_SPLIT_COST,
        }
    }

    /// Classic kd-tree: round-robin axes, mean-centroid planes, bounding-box partitioning.
    pub fn split_three_axes() -> Self {
        Self {
            axis: AxisPolicy::RoundRobin,
            splitter: SplitterKind::MeanCentroid,
            ..Self::sah_wide_axis()
        }
    }

    /// A single leaf, considering only the widest axis.
    pub fn no_split_one_axis() -> Self {
        Self {
            axis: AxisPolicy::Widest,
            splitter: SplitterKind::NoSplit,
            ..Self::sah_wide_axis()
        }
    }

    /// A single leaf, considering all three axes.
    pub fn no_split_three_axes() -> Self {
        Self {
            axis: AxisPolicy::Wide,
            splitter: SplitterKind::NoSplit,
            ..Self::sah_wide_axis()
        }
    }

    /// Returns the config with another maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks the settings without building anything.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(BuildError::MaxDepthTooLarge {
                depth: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        if matches!(self.splitter, SplitterKind::HardSah | SplitterKind::SoftSah) {
            if self.sah_planes == 0 {
                return Err(BuildError::NoCandidatePlanes);
            }
            if !(0.0..1.0).contains(&self.sah_split_cost) {
                return Err(BuildError::InvalidSplitCost(self.sah_split_cost));
            }
        }
        Ok(())
    }

    /// Validates, then builds a tree over `polygons` rooted at `bbox`.
    pub(crate) fn build(&self, polygons: Arc<[Polygon]>, bbox: BoundingBox) -> Result<SpatialTree, BuildError> {
        self.validate()?;
        match self.axis {
            AxisPolicy::RoundRobin => self.with_axis(RotateAxis, polygons, bbox),
            AxisPolicy::Widest => self.with_axis(WidestAxis, polygons, bbox),
            AxisPolicy::Fixed(axis) => self.with_axis(FixedAxis(axis), polygons, bbox),
            AxisPolicy::Wide => self.with_axis(WideAxes, polygons, bbox),
        }
    }

    fn with_axis<A: AxisSelector>(
        &self,
        axis: A,
        polygons: Arc<[Polygon]>,
        bbox: BoundingBox,
    ) -> Result<SpatialTree, BuildError> {
        match self.splitter {
            SplitterKind::MeanCentroid => self.with_splitter(axis, MeanCentroidSplitter, polygons, bbox),
            SplitterKind::MiddleSpan => self.with_splitter(axis, MiddleSpanSplitter, polygons, bbox),
            SplitterKind::HardSah => {
                let splitter = SahSplitter::hard(self.sah_planes, self.sah_split_cost);
                self.with_splitter(axis, splitter, polygons, bbox)
            }
            SplitterKind::SoftSah => self.with_splitter(axis, SahSplitter::soft(self.sah_planes), polygons, bbox),
            SplitterKind::NoSplit => self.with_splitter(axis, NoSplitAxes::all(), polygons, bbox),
        }
    }

    fn with_splitter<A: AxisSelector, S: NodeSplitter>(
        &self,
        axis: A,
        splitter: S,
        polygons: Arc<[Polygon]>,
        bbox: BoundingBox,
    ) -> Result<SpatialTree, BuildError> {
        match self.partition {
            PartitionKind::BoundingBox => {
                let constructor = self.constructor(axis, splitter, BBoxPolyCounter);
                SpatialTree::with_constructor(polygons, bbox, &constructor)
            }
            PartitionKind::Centroid => {
                let constructor = self.constructor(axis, splitter, CentroidPolyCounter);
                SpatialTree::with_constructor(polygons, bbox, &constructor)
            }
        }
    }

    fn constructor<A, S, C>(&self, axis: A, splitter: S, counter: C) -> TreeConstructor<A, S, C>
    where
        A: AxisSelector,
        S: NodeSplitter,
        C: PolyCounter,
    {
        TreeConstructor::new(axis, splitter, counter)
            .with_max_depth(self.max_depth)
            .with_min_split_polygons(self.min_split_polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for config in [
            TreeConfig::default(),
            TreeConfig::split_three_axes(),
            TreeConfig::no_split_one_axis(),
            TreeConfig::no_split_three_axes(),
        ] {
            assert_eq!(config.validate(), Ok(()));
        }
        assert_eq!(TreeConfig::default().max_depth, 10);
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert_eq!(
            TreeConfig::default().with_max_depth(100).validate(),
            Err(BuildError::MaxDepthTooLarge { depth: 100, limit: 64 })
        );

        let no_planes = TreeConfig {
            sah_planes: 0,
            ..TreeConfig::default()
        };
        assert_eq!(no_planes.validate(), Err(BuildError::NoCandidatePlanes));

        let bad_cost = TreeConfig {
            sah_split_cost: 1.0,
            ..TreeConfig::default()
        };
        assert_eq!(bad_cost.validate(), Err(BuildError::InvalidSplitCost(1.0)));
    }

    #[test]
    fn sah_settings_ignored_by_other_splitters() {
        let config = TreeConfig {
            sah_planes: 0,
            sah_split_cost: -3.0,
            ..TreeConfig::split_three_axes()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let polygons: Arc<[Polygon]> = Arc::from(Vec::new());
        let config = TreeConfig::default().with_max_depth(65);
        assert!(config.build(polygons, BoundingBox::empty()).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_json_round_trip() {
        let config = TreeConfig {
            axis: AxisPolicy::Fixed(Axis::Y),
            partition: PartitionKind::Centroid,
            ..TreeConfig::split_three_axes()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: TreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: TreeConfig = serde_json::from_str(r#"{"splitter": "soft_sah", "max_depth": 4}"#).unwrap();
        assert_eq!(partial.splitter, SplitterKind::SoftSah);
        assert_eq!(partial.max_depth, 4);
        assert_eq!(partial.axis, AxisPolicy::Wide);
    }
}
