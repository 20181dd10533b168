use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::geometry::Geometry;

/// Fallback used wherever a property is absent or falsy
pub const UNKNOWN: &str = "Unknown";

/// Scalar property value carried by a feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl PropertyValue {
    /// Convert a JSON value; arrays and objects are kept as their JSON text
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Bool(*b),
            serde_json::Value::Number(n) => {
                n.as_f64().map(PropertyValue::Number).unwrap_or(PropertyValue::Null)
            }
            serde_json::Value::String(s) => PropertyValue::Text(s.clone()),
            other => PropertyValue::Text(other.to_string()),
        }
    }

    /// Falsy values are null, empty text, zero, NaN and `false`
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Null => false,
            PropertyValue::Bool(b) => *b,
            PropertyValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropertyValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Property bag keyed by field name
pub type Properties = BTreeMap<String, PropertyValue>;

/// A geometry with its attribute properties
///
/// The geometry is optional because source documents may carry features with
/// a null or undecodable geometry; those never satisfy a spatial predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Feature {
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub properties: Properties,
}

/// Boundary feature that target features are tested against
pub type ReferenceFeature = Feature;

/// Asset feature tested for containment
pub type TargetFeature = Feature;

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry: Some(geometry), properties: Properties::new() }
    }

    /// Feature without geometry
    pub fn without_geometry() -> Self {
        Self::default()
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Property rendered as text, or `fallback` when absent or falsy
    pub fn property_or(&self, name: &str, fallback: &str) -> String {
        match self.property(name) {
            Some(value) if value.is_truthy() => value.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Collection of features as supplied by a dataset loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl AsRef<[Feature]> for FeatureCollection {
    fn as_ref(&self) -> &[Feature] {
        &self.features
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}
