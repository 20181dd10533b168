//! Canonical geometry types used across all synergy crates.
//!
//! These types mirror GeoJSON geometry objects with planar `[lon, lat]`
//! coordinates and are converted to `geo` crate types for evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    /// Whether this type can act as a reference boundary
    pub fn is_polygonal(&self) -> bool {
        matches!(self, GeometryType::Polygon | GeometryType::MultiPolygon)
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
        };
        f.write_str(name)
    }
}

/// GeoJSON-compatible geometry representation
///
/// Polygon rings are ordered: the first ring is the exterior, the rest are
/// holes. Ring winding is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    /// Axis-aligned rectangle as a closed single-ring polygon
    pub fn rectangle(min: [f64; 2], max: [f64; 2]) -> Self {
        Geometry::polygon(vec![vec![
            [min[0], min[1]],
            [min[0], max[1]],
            [max[0], max[1]],
            [max[0], min[1]],
            [min[0], min[1]],
        ]])
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Iterate over every coordinate in the geometry
    pub fn coords(&self) -> Box<dyn Iterator<Item = &[f64; 2]> + '_> {
        match self {
            Geometry::Point { coordinates } => Box::new(std::iter::once(coordinates)),
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                Box::new(coordinates.iter())
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                Box::new(coordinates.iter().flatten())
            }
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        }
    }

    /// Bounding box as `(min, max)`, `None` when the geometry has no
    /// finite coordinates
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut bounds: Option<([f64; 2], [f64; 2])> = None;
        for c in self.coords() {
            if !c[0].is_finite() || !c[1].is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => (*c, *c),
                Some((min, max)) => (
                    [min[0].min(c[0]), min[1].min(c[1])],
                    [max[0].max(c[0]), max[1].max(c[1])],
                ),
            });
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_serialization() {
        let point = Geometry::point(-118.24, 34.05);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"type\":\"Point\""));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(point, parsed);
    }

    #[test]
    fn test_rectangle_is_closed() {
        let rect = Geometry::rectangle([0.0, 0.0], [1.0, 1.0]);
        match rect {
            Geometry::Polygon { coordinates } => {
                let ring = &coordinates[0];
                assert_eq!(ring.len(), 5);
                assert_eq!(ring.first(), ring.last());
            }
            _ => panic!("Expected Polygon geometry"),
        }
    }

    #[test]
    fn test_bounds_skip_non_finite() {
        let line = Geometry::line_string(vec![[0.0, 0.0], [f64::NAN, 3.0], [2.0, -1.0]]);
        assert_eq!(line.bounds(), Some(([0.0, -1.0], [2.0, 0.0])));

        let empty = Geometry::MultiPolygon { coordinates: vec![] };
        assert_eq!(empty.bounds(), None);
    }

    #[test]
    fn test_polygonal_types() {
        assert!(Geometry::rectangle([0.0, 0.0], [1.0, 1.0]).geometry_type().is_polygonal());
        assert!(!Geometry::point(0.0, 0.0).geometry_type().is_polygonal());
        assert_eq!(GeometryType::MultiPolygon.to_string(), "MultiPolygon");
    }
}
