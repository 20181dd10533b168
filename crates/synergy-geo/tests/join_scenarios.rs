//! End-to-end join scenarios

use synergy_core::models::{
    ContainmentMode, Feature, Geometry, GroupKey, JoinStrategy, SpatialAnalysisResult,
    TargetDatasetConfig,
};
use synergy_geo::{join, JoinOptions, SpatialJoin};

fn unit_square() -> Feature {
    Feature::new(Geometry::polygon(vec![vec![
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 0.0],
    ]]))
    .with_property("OBJECTID", 1_i64)
}

fn asset(x: f64, y: f64) -> Feature {
    Feature::new(Geometry::point(x, y))
}

fn key(segments: &[&str]) -> GroupKey {
    GroupKey::from(segments.to_vec())
}

fn type_status() -> TargetDatasetConfig {
    TargetDatasetConfig::new(["Type", "Status"])
}

#[test]
fn scenario_single_contained_point() {
    let targets = vec![vec![
        asset(0.5, 0.5).with_property("Type", "EV Charger").with_property("Status", "Active"),
        asset(2.0, 2.0).with_property("Type", "EV Charger").with_property("Status", "Active"),
    ]];

    let result = join(&[unit_square()], &targets, &[type_status()]).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].total_match_count, 1);
    assert_eq!(result.total_matches, 1);
    assert_eq!(result.summary.len(), 1);
    assert_eq!(result.summary.get(&key(&["EV Charger", "Active"])), 1);

    let json = serde_json::to_value(&result.summary).unwrap();
    assert_eq!(json, serde_json::json!({"EV Charger - Active": 1}));
}

#[test]
fn scenario_nothing_contained() {
    let targets = vec![vec![asset(2.0, 2.0), asset(-1.0, 0.5)]];

    let result = join(&[unit_square()], &targets, &[type_status()]).unwrap();

    assert!(result.matches.is_empty());
    assert!(result.summary.is_empty());
    assert_eq!(result.total_matches, 0);
}

#[test]
fn scenario_placeholder_for_empty_dataset() {
    let targets = vec![vec![asset(0.5, 0.5)], vec![asset(4.0, 4.0)]];
    let configs = vec![type_status(), TargetDatasetConfig::new(["material"])];

    let result = join(&[unit_square()], &targets, &configs).unwrap();

    let m = &result.matches[0];
    assert_eq!(m.target_matches.len(), 2);
    assert_eq!(m.target_matches[0].match_count, 1);
    assert_eq!(m.target_matches[1].match_count, 0);
    assert!(m.target_matches[1].grouped_matches.is_empty());
    assert!(m.target_matches[1].target_features.is_empty());
}

#[test]
fn scenario_no_group_fields_collapse_to_empty_key() {
    let targets = vec![vec![
        asset(0.1, 0.1).with_property("Type", "A"),
        asset(0.2, 0.2).with_property("Type", "B"),
        asset(0.3, 0.3),
    ]];

    let result = join(&[unit_square()], &targets, &[TargetDatasetConfig::default()]).unwrap();

    assert_eq!(result.summary.len(), 1);
    assert_eq!(result.summary.get(&GroupKey::default()), 3);

    let json = serde_json::to_value(&result.summary).unwrap();
    assert_eq!(json, serde_json::json!({"": 3}));
}

#[test]
fn scenario_missing_property_resolves_to_unknown() {
    let targets = vec![vec![asset(0.5, 0.5).with_property("Type", "Hydrant")]];

    let result = join(&[unit_square()], &targets, &[type_status()]).unwrap();

    let grouped = &result.matches[0].target_matches[0].grouped_matches;
    assert_eq!(grouped.get(&key(&["Hydrant", "Unknown"])), 1);
    assert_eq!(
        grouped.keys().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["Hydrant - Unknown"]
    );
}

#[test]
fn points_in_holes_are_excluded() {
    let donut = Feature::new(Geometry::polygon(vec![
        vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]],
        vec![[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0], [4.0, 4.0]],
    ]));
    let targets = vec![vec![asset(5.0, 5.0), asset(1.0, 1.0), asset(9.0, 5.0)]];

    let result = join(&[donut], &targets, &[TargetDatasetConfig::default()]).unwrap();
    assert_eq!(result.total_matches, 2);
}

#[test]
fn keys_rendering_alike_keep_summary_total() {
    let targets = vec![
        vec![asset(0.5, 0.5).with_property("Type", "A").with_property("Status", "B")],
        vec![asset(0.5, 0.5).with_property("Type", "A - B")],
    ];
    let configs = vec![type_status(), TargetDatasetConfig::new(["Type"])];

    let result = join(&[unit_square()], &targets, &configs).unwrap();
    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.total_matches, 2);

    let json = serde_json::to_value(&result.summary).unwrap();
    assert_eq!(json, serde_json::json!({"A - B": 2}));
}

#[test]
fn zero_area_reference_is_invalid() {
    let collapsed = Feature::new(Geometry::polygon(vec![vec![[0.0, 0.0]; 4]]));
    let targets = vec![vec![asset(0.0, 0.0)]];

    for strategy in [JoinStrategy::FullScan, JoinStrategy::RTree] {
        let result = SpatialJoin::new(JoinOptions::default().with_strategy(strategy))
            .join(&[collapsed.clone()], &targets, &[TargetDatasetConfig::default()])
            .unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.total_matches, 0);
        assert_eq!(result.diagnostics.invalid_references, 1);
        assert_eq!(result.diagnostics.predicate_calls, 0);
    }
}

#[test]
fn multipolygon_reference_matches_each_part() {
    let reference = Feature::new(Geometry::multi_polygon(vec![
        vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]],
        vec![vec![[10.0, 10.0], [10.0, 11.0], [11.0, 11.0], [11.0, 10.0], [10.0, 10.0]]],
    ]));
    let targets = vec![vec![asset(0.5, 0.5), asset(5.0, 5.0), asset(10.5, 10.5)]];

    let result = join(&[reference], &targets, &[TargetDatasetConfig::default()]).unwrap();
    assert_eq!(result.total_matches, 2);
}

#[test]
fn summary_spans_references() {
    let references = vec![
        unit_square(),
        Feature::new(Geometry::rectangle([10.0, 10.0], [11.0, 11.0])),
        Feature::new(Geometry::rectangle([50.0, 50.0], [51.0, 51.0])),
    ];
    let charger = |x: f64, status: &str| {
        asset(x, x).with_property("Type", "EV Charger").with_property("Status", status)
    };
    let targets = vec![vec![charger(0.5, "Active"), charger(10.5, "Active"), charger(10.6, "Planned")]];

    let result = join(&references, &targets, &[type_status()]).unwrap();

    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.total_matches, 3);
    assert_eq!(result.summary.get(&key(&["EV Charger", "Active"])), 2);
    assert_eq!(result.summary.get(&key(&["EV Charger", "Planned"])), 1);
    assert_eq!(result.diagnostics.references_scanned, 3);
}

fn mixed_inputs() -> (Vec<Feature>, Vec<Vec<Feature>>, Vec<TargetDatasetConfig>) {
    let references = vec![
        unit_square(),
        Feature::new(Geometry::rectangle([2.0, 2.0], [4.0, 4.0])),
        Feature::without_geometry(),
    ];
    let targets = vec![
        vec![
            asset(3.0, 3.0).with_property("Type", "Level 2"),
            asset(0.5, 0.5).with_property("Type", "DC Fast"),
            Feature::without_geometry(),
            asset(f64::NAN, 1.0),
            asset(1.0, 1.0).with_property("Type", "Level 2"),
        ],
        vec![
            Feature::new(Geometry::line_string(vec![[2.5, 2.5], [3.5, 3.5]]))
                .with_property("material", "Steel"),
            Feature::new(Geometry::rectangle([0.2, 0.2], [0.4, 0.4])),
        ],
    ];
    let configs = vec![TargetDatasetConfig::new(["Type"]), TargetDatasetConfig::new(["material"])];
    (references, targets, configs)
}

#[test]
fn rtree_strategy_matches_full_scan() {
    let (references, targets, configs) = mixed_inputs();

    for containment in [ContainmentMode::Whole, ContainmentMode::Centroid, ContainmentMode::PointsOnly]
    {
        let options = JoinOptions::default().with_containment(containment);
        let full = SpatialJoin::new(options).join(&references, &targets, &configs).unwrap();
        let indexed = SpatialJoin::new(options.with_strategy(JoinStrategy::RTree))
            .join(&references, &targets, &configs)
            .unwrap();

        assert_eq!(full.matches, indexed.matches);
        assert_eq!(full.summary, indexed.summary);
        assert_eq!(full.total_matches, indexed.total_matches);
        if containment != ContainmentMode::PointsOnly {
            // Unsupported targets outside the envelope are pruned before evaluation
            assert_eq!(full.diagnostics.skipped_features, indexed.diagnostics.skipped_features);
        }
        assert_eq!(full.diagnostics.invalid_references, 1);
        assert!(indexed.diagnostics.predicate_calls <= full.diagnostics.predicate_calls);
    }
}

#[test]
fn points_only_skips_non_point_targets() {
    let (references, targets, configs) = mixed_inputs();

    let whole = join(&references, &targets, &configs).unwrap();
    let points_only = SpatialJoin::new(
        JoinOptions::default().with_containment(ContainmentMode::PointsOnly),
    )
    .join(&references, &targets, &configs)
    .unwrap();

    // The line and the small square match in whole mode only
    assert_eq!(whole.total_matches, points_only.total_matches + 2);
    assert_eq!(
        points_only.diagnostics.skipped_features,
        whole.diagnostics.skipped_features + 2 * 2
    );
}

#[test]
fn joins_are_deterministic() {
    let (references, targets, configs) = mixed_inputs();

    let first: SpatialAnalysisResult = join(&references, &targets, &configs).unwrap();
    let second = join(&references, &targets, &configs).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn result_serializes_in_camel_case() {
    let targets = vec![vec![asset(0.5, 0.5).with_property("Type", "Valve")]];
    let result = join(&[unit_square()], &targets, &[TargetDatasetConfig::new(["Type"])]).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["totalMatches"], 1);
    assert_eq!(json["matches"][0]["totalMatchCount"], 1);
    assert_eq!(json["matches"][0]["targetMatches"][0]["matchCount"], 1);
    assert_eq!(json["matches"][0]["targetMatches"][0]["groupedMatches"]["Valve"], 1);
    assert_eq!(json["matches"][0]["referenceFeature"]["properties"]["OBJECTID"], 1.0);
    assert_eq!(json["diagnostics"]["predicateCalls"], 1);
}
