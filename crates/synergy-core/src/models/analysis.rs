//! Result types produced by a spatial analysis run.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::feature::{Feature, ReferenceFeature, TargetFeature, UNKNOWN};

/// Separator used when a group key is rendered as text
pub const GROUP_KEY_SEPARATOR: &str = " - ";

/// Ordered per-field values identifying a group of matched features
///
/// The structured form is kept internally. It is joined with
/// [`GROUP_KEY_SEPARATOR`] only when rendered for output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// True when a segment contains [`GROUP_KEY_SEPARATOR`], so the rendered
    /// text no longer identifies the segments
    pub fn is_ambiguous(&self) -> bool {
        self.0.iter().any(|s| s.contains(GROUP_KEY_SEPARATOR))
    }

    /// True when the key has segments and every one fell back to `Unknown`
    pub fn is_all_unknown(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|s| s == UNKNOWN)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(GROUP_KEY_SEPARATOR))
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Vec<&str>> for GroupKey {
    fn from(segments: Vec<&str>) -> Self {
        Self(segments.into_iter().map(str::to_string).collect())
    }
}

/// Count accumulator keyed by [`GroupKey`]
///
/// Serialized as a map of rendered keys. Distinct keys that render to the
/// same text have their counts summed under that text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupCounts(BTreeMap<GroupKey, usize>);

impl Serialize for GroupCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut rendered: BTreeMap<String, usize> = BTreeMap::new();
        for (key, count) in &self.0 {
            *rendered.entry(key.to_string()).or_insert(0) += count;
        }
        serializer.collect_map(rendered)
    }
}

impl GroupCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &GroupKey) {
        *self.0.entry(key.clone()).or_insert(0) += 1;
    }

    pub fn add(&mut self, key: &GroupKey, count: usize) {
        *self.0.entry(key.clone()).or_insert(0) += count;
    }

    pub fn get(&self, key: &GroupKey) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, usize)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

/// Matches of one target dataset inside one reference feature
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TargetMatch {
    pub target_features: Vec<TargetFeature>,
    pub match_count: usize,
    pub grouped_matches: GroupCounts,
}

impl TargetMatch {
    /// Zero-match entry keeping dataset index alignment
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A reference feature together with its per-dataset matches
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialMatch {
    pub reference_feature: ReferenceFeature,

    /// One entry per target dataset, in configuration order
    pub target_matches: Vec<TargetMatch>,

    pub total_match_count: usize,
}

impl SpatialMatch {
    pub fn new(reference_feature: Feature, target_matches: Vec<TargetMatch>) -> Self {
        let total_match_count = target_matches.iter().map(|m| m.match_count).sum();
        Self { reference_feature, target_matches, total_match_count }
    }
}

/// Observability counters for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JoinDiagnostics {
    pub references_scanned: usize,
    pub predicate_calls: usize,

    /// Target features whose containment test could not be evaluated
    pub skipped_features: usize,

    /// References without a usable polygonal geometry
    pub invalid_references: usize,
}

/// Outcome of a full spatial join
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpatialAnalysisResult {
    pub matches: Vec<SpatialMatch>,
    pub total_matches: usize,
    pub summary: GroupCounts,
    pub diagnostics: JoinDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_key_display() {
        assert_eq!(GroupKey::from(vec!["EV Charger", "Active"]).to_string(), "EV Charger - Active");
        assert_eq!(GroupKey::default().to_string(), "");
    }

    #[test]
    fn test_colliding_keys_are_summed_when_serialized() {
        let split = GroupKey::from(vec!["A", "B"]);
        let joined = GroupKey::from(vec!["A - B"]);
        assert!(!split.is_ambiguous());
        assert!(joined.is_ambiguous());

        let mut counts = GroupCounts::new();
        counts.increment(&split);
        counts.add(&joined, 2);
        counts.increment(&GroupKey::from(vec!["C"]));
        assert_eq!(counts.len(), 3);

        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"A - B":3,"C":1}"#);
    }

    #[test]
    fn test_all_unknown() {
        assert!(GroupKey::from(vec!["Unknown", "Unknown"]).is_all_unknown());
        assert!(!GroupKey::from(vec!["Unknown", "Active"]).is_all_unknown());
        assert!(!GroupKey::default().is_all_unknown());
    }

    #[test]
    fn test_group_counts_serialize_as_text_keys() {
        let mut counts = GroupCounts::new();
        let key = GroupKey::from(vec!["Level 2", "Active"]);
        counts.increment(&key);
        counts.increment(&key);
        counts.add(&GroupKey::from(vec!["DC Fast", "Planned"]), 3);

        assert_eq!(counts.get(&key), 2);
        assert_eq!(counts.total(), 5);

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json, serde_json::json!({"DC Fast - Planned": 3, "Level 2 - Active": 2}));
    }

    #[test]
    fn test_spatial_match_total() {
        let mut first = TargetMatch::empty();
        first.match_count = 2;
        let mut second = TargetMatch::empty();
        second.match_count = 3;

        let m = SpatialMatch::new(Feature::default(), vec![first, TargetMatch::empty(), second]);
        assert_eq!(m.total_match_count, 5);
        assert_eq!(m.target_matches.len(), 3);
    }
}
