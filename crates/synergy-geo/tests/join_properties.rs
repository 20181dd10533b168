//! Property-based tests for the join invariants using proptest

use proptest::prelude::*;
use synergy_core::models::{
    Feature, Geometry, GroupCounts, JoinStrategy, SpatialAnalysisResult, TargetDatasetConfig,
};
use synergy_geo::{join, JoinOptions, SpatialJoin};

const FIELDS: [&str; 2] = ["type", "status"];

/// Axis-aligned reference rectangle inside a 0..100 grid
fn reference_strategy() -> impl Strategy<Value = Feature> {
    (0.0..80.0f64, 0.0..80.0f64, 1.0..20.0f64, 1.0..20.0f64)
        .prop_map(|(x, y, w, h)| Feature::new(Geometry::rectangle([x, y], [x + w, y + h])))
}

/// Point target with sparse categorical properties
fn target_strategy() -> impl Strategy<Value = Feature> {
    (
        0.0..100.0f64,
        0.0..100.0f64,
        prop::option::of(prop::sample::select(vec!["Level 2", "DC Fast", ""])),
        prop::option::of(prop::sample::select(vec!["Active", "Planned"])),
    )
        .prop_map(|(x, y, kind, status)| {
            let mut feature = Feature::new(Geometry::point(x, y));
            if let Some(kind) = kind {
                feature = feature.with_property("type", kind);
            }
            if let Some(status) = status {
                feature = feature.with_property("status", status);
            }
            feature
        })
}

fn config_strategy() -> impl Strategy<Value = TargetDatasetConfig> {
    (0..=FIELDS.len()).prop_map(|n| TargetDatasetConfig::new(FIELDS[..n].iter().copied()))
}

fn inputs_strategy(
) -> impl Strategy<Value = (Vec<Feature>, Vec<Vec<Feature>>, Vec<TargetDatasetConfig>)> {
    (1usize..4).prop_flat_map(|datasets| {
        (
            prop::collection::vec(reference_strategy(), 0..6),
            prop::collection::vec(prop::collection::vec(target_strategy(), 0..25), datasets),
            prop::collection::vec(config_strategy(), datasets),
        )
    })
}

fn summed_groups(result: &SpatialAnalysisResult) -> GroupCounts {
    let mut sum = GroupCounts::new();
    for m in &result.matches {
        for tm in &m.target_matches {
            for (key, count) in tm.grouped_matches.iter() {
                sum.add(key, count);
            }
        }
    }
    sum
}

proptest! {
    #[test]
    fn join_invariants_hold((references, targets, configs) in inputs_strategy()) {
        let result = join(&references, &targets, &configs).unwrap();

        for m in &result.matches {
            // Only references with at least one match are reported
            prop_assert!(m.total_match_count > 0);
            prop_assert_eq!(m.target_matches.len(), targets.len());
            prop_assert_eq!(
                m.total_match_count,
                m.target_matches.iter().map(|tm| tm.match_count).sum::<usize>()
            );
            for tm in &m.target_matches {
                prop_assert_eq!(tm.match_count, tm.target_features.len());
                prop_assert_eq!(tm.match_count, tm.grouped_matches.total());
            }
        }

        prop_assert_eq!(&result.summary, &summed_groups(&result));
        prop_assert_eq!(
            result.total_matches,
            result.matches.iter().map(|m| m.total_match_count).sum::<usize>()
        );
        prop_assert_eq!(result.diagnostics.references_scanned, references.len());
    }

    #[test]
    fn rtree_and_full_scan_agree((references, targets, configs) in inputs_strategy()) {
        let full = join(&references, &targets, &configs).unwrap();
        let indexed = SpatialJoin::new(JoinOptions::default().with_strategy(JoinStrategy::RTree))
            .join(&references, &targets, &configs)
            .unwrap();

        prop_assert_eq!(&full.matches, &indexed.matches);
        prop_assert_eq!(&full.summary, &indexed.summary);
        prop_assert_eq!(full.total_matches, indexed.total_matches);
    }

    #[test]
    fn group_keys_have_one_segment_per_field((references, targets, configs) in inputs_strategy()) {
        let result = join(&references, &targets, &configs).unwrap();

        for m in &result.matches {
            for (tm, config) in m.target_matches.iter().zip(&configs) {
                for key in tm.grouped_matches.keys() {
                    prop_assert_eq!(key.segments().len(), config.group_by_fields.len());
                    prop_assert!(key.segments().iter().all(|s| !s.is_empty()));
                }
            }
        }
    }
}
