//! Categorical grouping of matched target features

use synergy_core::models::{Feature, GroupCounts, GroupKey, TargetDatasetConfig, UNKNOWN};

/// Resolve the group key of `feature` for the ordered `fields`
///
/// Absent or falsy values become `Unknown`. Zero fields give the empty key.
pub fn group_key<S: AsRef<str>>(feature: &Feature, fields: &[S]) -> GroupKey {
    GroupKey::new(fields.iter().map(|field| feature.property_or(field.as_ref(), UNKNOWN)).collect())
}

/// One pass over the matches of a (reference, dataset) pair
///
/// Updates the pair's local counts and the analysis-wide summary from the
/// same key, keeping both accumulators separately owned.
pub struct GroupingPass<'a> {
    config: &'a TargetDatasetConfig,
    local: GroupCounts,
    summary: &'a mut GroupCounts,
}

impl<'a> GroupingPass<'a> {
    pub fn new(config: &'a TargetDatasetConfig, summary: &'a mut GroupCounts) -> Self {
        Self { config, local: GroupCounts::new(), summary }
    }

    /// Count one matched feature
    pub fn record(&mut self, feature: &Feature) {
        let key = group_key(feature, self.config.group_by_fields.as_slice());
        if self.local.get(&key) == 0 && key.is_ambiguous() {
            tracing::warn!("Group key '{}' has a segment containing the separator", key);
        }
        self.local.increment(&key);
        self.summary.increment(&key);
    }

    /// Local counts of this pass
    pub fn finish(self) -> GroupCounts {
        self.local
    }
}
