//! Candidate selection for the join engine
//!
//! A strategy narrows the target features that must be tested against one
//! reference. Every strategy returns indices in ascending order so the join
//! output is identical whichever one is used.

use rstar::{RTree, RTreeObject, AABB};
use synergy_core::models::Feature;

use crate::models::JoinStrategy;
use crate::validation::validate_geometry;

/// Produces candidate target indices for a reference bounding box
pub trait CandidateStrategy: Send + Sync {
    /// Ascending indices of target features that may lie within `bounds`
    fn candidates(&self, bounds: Option<([f64; 2], [f64; 2])>) -> Vec<usize>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Build the strategy selected by `kind` over one target dataset
pub fn build_strategy(kind: JoinStrategy, features: &[Feature]) -> Box<dyn CandidateStrategy> {
    match kind {
        JoinStrategy::FullScan => Box::new(FullScan::new(features.len())),
        JoinStrategy::RTree => Box::new(RTreeStrategy::new(features)),
    }
}

/// Every target is a candidate
#[derive(Debug, Clone, Copy)]
pub struct FullScan {
    len: usize,
}

impl FullScan {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl CandidateStrategy for FullScan {
    fn candidates(&self, _bounds: Option<([f64; 2], [f64; 2])>) -> Vec<usize> {
        (0..self.len).collect()
    }

    fn name(&self) -> &'static str {
        "full-scan"
    }
}

/// Target envelope with its position in the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEnvelope {
    pub id: usize,
    envelope: AABB<[f64; 2]>,
}

impl IndexedEnvelope {
    pub fn new(id: usize, min: [f64; 2], max: [f64; 2]) -> Self {
        Self { id, envelope: AABB::from_corners(min, max) }
    }
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over target envelopes
///
/// Targets that cannot be indexed (no geometry, invalid coordinates) are
/// always returned so their predicate failures are still observed.
pub struct RTreeStrategy {
    tree: RTree<IndexedEnvelope>,
    unindexed: Vec<usize>,
}

impl RTreeStrategy {
    pub fn new(features: &[Feature]) -> Self {
        let mut indexed = Vec::with_capacity(features.len());
        let mut unindexed = Vec::new();

        for (id, feature) in features.iter().enumerate() {
            let bounds = feature
                .geometry
                .as_ref()
                .filter(|g| validate_geometry(g).is_valid)
                .and_then(|g| g.bounds());

            match bounds {
                Some((min, max)) => indexed.push(IndexedEnvelope::new(id, min, max)),
                None => unindexed.push(id),
            }
        }

        Self { tree: RTree::bulk_load(indexed), unindexed }
    }

    /// Number of indexed envelopes
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0 && self.unindexed.is_empty()
    }
}

impl CandidateStrategy for RTreeStrategy {
    fn candidates(&self, bounds: Option<([f64; 2], [f64; 2])>) -> Vec<usize> {
        let mut ids: Vec<usize> = match bounds {
            Some((min, max)) => {
                let query = AABB::from_corners(min, max);
                self.tree.locate_in_envelope_intersecting(&query).map(|e| e.id).collect()
            }
            None => self.tree.iter().map(|e| e.id).collect(),
        };

        ids.extend_from_slice(&self.unindexed);
        ids.sort_unstable();
        ids
    }

    fn name(&self) -> &'static str {
        "rtree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geometry;

    fn dataset() -> Vec<Feature> {
        vec![
            Feature::new(Geometry::point(0.5, 0.5)),
            Feature::new(Geometry::point(10.0, 10.0)),
            Feature::without_geometry(),
            Feature::new(Geometry::line_string(vec![[0.9, 0.9], [3.0, 3.0]])),
            Feature::new(Geometry::point(1.0, 0.0)),
        ]
    }

    #[test]
    fn test_full_scan_returns_everything() {
        let strategy = FullScan::new(3);
        assert_eq!(strategy.candidates(None), vec![0, 1, 2]);
        assert_eq!(strategy.candidates(Some(([0.0, 0.0], [1.0, 1.0]))), vec![0, 1, 2]);
    }

    #[test]
    fn test_rtree_candidates_are_sorted() {
        let features = dataset();
        let strategy = RTreeStrategy::new(&features);

        assert_eq!(strategy.len(), 4);
        // Boundary-touching envelopes are kept, unindexed features always included
        assert_eq!(strategy.candidates(Some(([0.0, 0.0], [1.0, 1.0]))), vec![0, 2, 3, 4]);
        assert_eq!(strategy.candidates(Some(([9.0, 9.0], [11.0, 11.0]))), vec![1, 2]);
    }

    #[test]
    fn test_rtree_without_bounds_returns_all() {
        let features = dataset();
        let strategy = RTreeStrategy::new(&features);
        assert_eq!(strategy.candidates(None), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_geometry_is_unindexed() {
        let features = vec![Feature::new(Geometry::line_string(vec![[f64::NAN, 0.0], [50.0, 50.0]]))];
        let strategy = RTreeStrategy::new(&features);
        assert_eq!(strategy.len(), 0);
        assert_eq!(strategy.candidates(Some(([0.0, 0.0], [1.0, 1.0]))), vec![0]);
    }

    #[test]
    fn test_build_strategy() {
        let features = dataset();
        assert_eq!(build_strategy(JoinStrategy::FullScan, &features).name(), "full-scan");
        assert_eq!(build_strategy(JoinStrategy::RTree, &features).name(), "rtree");
    }
}
