//! Dataset loading
//!
//! Reads GeoJSON feature collections into [`FeatureCollection`]s. Only the
//! envelope is validated strictly: a document must be an object with a `type`
//! and a `features` array. Individual geometries that fail to decode are kept
//! as features without geometry so that the join isolates them per feature.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, SynergyError};
use crate::models::{Feature, FeatureCollection, Geometry, GeometryType, LayerConfig, Properties, PropertyValue};

/// Source of raw feature collections
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load the collection stored at `location`
    async fn load(&self, location: &str) -> Result<FeatureCollection>;
}

/// Loads GeoJSON files from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileDatasetSource {
    /// Base directory for relative locations
    root: Option<PathBuf>,
}

impl FileDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn load(&self, location: &str) -> Result<FeatureCollection> {
        let path = self.resolve(location);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                SynergyError::DatasetNotFound { location: path.display().to_string() }
            }
            _ => SynergyError::Io(e),
        })?;

        let collection = parse_feature_collection(&content, &path.display().to_string())?;
        tracing::info!(
            "Loaded {} features from {}",
            collection.len(),
            path.display()
        );
        Ok(collection)
    }
}

/// Reference and target collections for one analysis run
#[derive(Debug, Clone, Default)]
pub struct LoadedDatasets {
    pub reference: FeatureCollection,

    /// Aligned with the target layers
    pub targets: Vec<FeatureCollection>,
}

/// Load the reference and all target datasets concurrently
///
/// The first failing dataset aborts the whole load.
pub async fn load_datasets<S>(source: &S, layers: &LayerConfig) -> Result<LoadedDatasets>
where
    S: DatasetSource + ?Sized,
{
    let reference = source.load(&layers.reference.file);
    let targets = try_join_all(layers.targets.iter().map(|t| source.load(&t.file)));

    let (reference, targets) = futures::try_join!(reference, targets)?;
    Ok(LoadedDatasets { reference, targets })
}

/// Parse a GeoJSON feature collection document
pub fn parse_feature_collection(text: &str, origin: &str) -> Result<FeatureCollection> {
    let document: serde_json::Value =
        serde_json::from_str(text).map_err(|e| SynergyError::DataFormat {
            origin: origin.to_string(),
            reason: format!("Failed to parse JSON: {}", e),
        })?;

    let object = document.as_object().ok_or_else(|| SynergyError::DataFormat {
        origin: origin.to_string(),
        reason: "Document is not a JSON object".to_string(),
    })?;

    if !object.get("type").is_some_and(serde_json::Value::is_string) {
        return Err(SynergyError::DataFormat {
            origin: origin.to_string(),
            reason: "Missing 'type' member".to_string(),
        });
    }

    let raw_features = object
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SynergyError::DataFormat {
            origin: origin.to_string(),
            reason: "Missing or malformed 'features' array".to_string(),
        })?;

    let features = raw_features
        .iter()
        .enumerate()
        .map(|(idx, raw)| parse_feature(raw, idx, origin))
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection::new(features))
}

fn parse_feature(raw: &serde_json::Value, idx: usize, origin: &str) -> Result<Feature> {
    let object = raw.as_object().ok_or_else(|| SynergyError::DataFormat {
        origin: origin.to_string(),
        reason: format!("Feature {} is not a JSON object", idx),
    })?;

    let geometry = match object.get("geometry") {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => match decode_geometry(value) {
            Ok(geometry) => Some(geometry),
            Err(reason) => {
                tracing::warn!("Feature {} in {} has an unusable geometry: {}", idx, origin, reason);
                None
            }
        },
    };

    let properties: Properties = object
        .get("properties")
        .and_then(serde_json::Value::as_object)
        .map(|props| {
            props.iter().map(|(k, v)| (k.clone(), PropertyValue::from_json(v))).collect()
        })
        .unwrap_or_default();

    Ok(Feature { geometry, properties })
}

/// Decode a GeoJSON geometry object through the `geojson` crate
fn decode_geometry(value: &serde_json::Value) -> std::result::Result<Geometry, String> {
    let geometry = geojson::Geometry::from_json_value(value.clone()).map_err(|e| e.to_string())?;
    convert_geojson_value(&geometry.value)
}

fn convert_geojson_value(value: &geojson::Value) -> std::result::Result<Geometry, String> {
    match value {
        geojson::Value::Point(position) => Ok(Geometry::Point { coordinates: position_xy(position)? }),
        geojson::Value::MultiPoint(points) => {
            Ok(Geometry::MultiPoint { coordinates: positions_xy(points)? })
        }
        geojson::Value::LineString(line) => {
            Ok(Geometry::LineString { coordinates: positions_xy(line)? })
        }
        geojson::Value::MultiLineString(lines) => Ok(Geometry::MultiLineString {
            coordinates: lines.iter().map(|l| positions_xy(l)).collect::<std::result::Result<_, _>>()?,
        }),
        geojson::Value::Polygon(rings) => Ok(Geometry::Polygon {
            coordinates: rings.iter().map(|r| positions_xy(r)).collect::<std::result::Result<_, _>>()?,
        }),
        geojson::Value::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon {
            coordinates: polygons
                .iter()
                .map(|rings| {
                    rings.iter().map(|r| positions_xy(r)).collect::<std::result::Result<Vec<_>, String>>()
                })
                .collect::<std::result::Result<_, _>>()?,
        }),
        geojson::Value::GeometryCollection(_) => {
            Err("GeometryCollection is not supported".to_string())
        }
    }
}

fn position_xy(position: &[f64]) -> std::result::Result<[f64; 2], String> {
    match position {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(format!("Position needs at least 2 values, found {}", position.len())),
    }
}

fn positions_xy(positions: &[Vec<f64>]) -> std::result::Result<Vec<[f64; 2]>, String> {
    positions.iter().map(|p| position_xy(p)).collect()
}

/// Whether every feature carries a geometry of the expected type
pub fn validate_dataset(collection: &FeatureCollection, expected: GeometryType) -> bool {
    collection
        .features
        .iter()
        .all(|f| f.geometry.as_ref().is_some_and(|g| g.geometry_type() == expected))
}
