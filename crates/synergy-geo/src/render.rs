//! Helpers that turn an analysis result into map layers
//!
//! Each result replaces the previous layers wholesale; nothing here diffs.

use std::collections::HashMap;
use synergy_core::models::{Feature, PropertyValue, SpatialAnalysisResult};

use crate::models::Geometry;

/// Property added to every reference by [`tag_reference_match_counts`]
pub const MATCH_COUNT_PROPERTY: &str = "matchCount";

/// Clone every reference with its total match count attached
///
/// References are paired with results through `id_field`. References without
/// an id fall back to comparing the whole feature. Unmatched references get 0.
pub fn tag_reference_match_counts(
    references: &[Feature],
    result: &SpatialAnalysisResult,
    id_field: &str,
) -> Vec<Feature> {
    let counts_by_id: HashMap<String, usize> = result
        .matches
        .iter()
        .filter_map(|m| {
            m.reference_feature
                .property(id_field)
                .filter(|id| !matches!(id, PropertyValue::Null))
                .map(|id| (id.to_string(), m.total_match_count))
        })
        .collect();

    references
        .iter()
        .map(|reference| {
            let count = match reference.property(id_field) {
                Some(id) if !matches!(id, PropertyValue::Null) => {
                    counts_by_id.get(&id.to_string()).copied().unwrap_or(0)
                }
                _ => result
                    .matches
                    .iter()
                    .find(|m| m.reference_feature == *reference)
                    .map(|m| m.total_match_count)
                    .unwrap_or(0),
            };

            reference.clone().with_property(MATCH_COUNT_PROPERTY, count as i64)
        })
        .collect()
}

/// All features of target dataset `index` that matched any reference
pub fn matched_targets(result: &SpatialAnalysisResult, index: usize) -> Vec<Feature> {
    result
        .matches
        .iter()
        .filter_map(|m| m.target_matches.get(index))
        .flat_map(|tm| tm.target_features.iter().cloned())
        .collect()
}

fn position(c: &[f64; 2]) -> Vec<f64> {
    vec![c[0], c[1]]
}

fn positions(coords: &[[f64; 2]]) -> Vec<Vec<f64>> {
    coords.iter().map(position).collect()
}

fn rings(rings: &[Vec<[f64; 2]>]) -> Vec<Vec<Vec<f64>>> {
    rings.iter().map(|r| positions(r)).collect()
}

/// Convert a canonical geometry to a `geojson` value
pub fn to_geojson_value(geometry: &Geometry) -> geojson::Value {
    match geometry {
        Geometry::Point { coordinates } => geojson::Value::Point(position(coordinates)),
        Geometry::LineString { coordinates } => geojson::Value::LineString(positions(coordinates)),
        Geometry::Polygon { coordinates } => geojson::Value::Polygon(rings(coordinates)),
        Geometry::MultiPoint { coordinates } => geojson::Value::MultiPoint(positions(coordinates)),
        Geometry::MultiLineString { coordinates } => {
            geojson::Value::MultiLineString(rings(coordinates))
        }
        Geometry::MultiPolygon { coordinates } => {
            geojson::Value::MultiPolygon(coordinates.iter().map(|p| rings(p)).collect())
        }
    }
}

fn json_property(value: &PropertyValue) -> serde_json::Value {
    match value {
        PropertyValue::Null => serde_json::Value::Null,
        PropertyValue::Bool(b) => serde_json::Value::Bool(*b),
        PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        PropertyValue::Text(s) => serde_json::Value::String(s.clone()),
    }
}

/// Build a GeoJSON feature collection for a map layer
pub fn to_geojson_collection(features: &[Feature]) -> geojson::FeatureCollection {
    let features = features
        .iter()
        .map(|feature| {
            let properties: geojson::JsonObject = feature
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), json_property(v)))
                .collect();

            geojson::Feature {
                bbox: None,
                geometry: feature
                    .geometry
                    .as_ref()
                    .map(|g| geojson::Geometry::new(to_geojson_value(g))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection { bbox: None, features, foreign_members: None }
}
