use serde::{Deserialize, Serialize};
use std::fmt;

/// How a non-point target geometry is tested against a reference polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContainmentMode {
    /// Points use boundary-inclusive point-in-polygon; other geometries must
    /// lie entirely inside the reference
    #[default]
    Whole,
    /// Non-point geometries are reduced to their centroid
    Centroid,
    /// Non-point geometries cannot be evaluated and never match
    PointsOnly,
}

impl fmt::Display for ContainmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainmentMode::Whole => "whole",
            ContainmentMode::Centroid => "centroid",
            ContainmentMode::PointsOnly => "points-only",
        })
    }
}

/// Candidate selection used by the join engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JoinStrategy {
    /// Test every target feature against every reference
    #[default]
    FullScan,
    /// Prefilter candidates through an R-tree of target envelopes
    #[serde(rename = "rtree")]
    RTree,
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinStrategy::FullScan => "full-scan",
            JoinStrategy::RTree => "rtree",
        })
    }
}
