//! Geometry models for synergy-geo.
//!
//! This module re-exports canonical types from `synergy-core` and converts
//! them into `geo` crate types for predicate evaluation.

use geo::Geometry as GeoGeometry;

// Re-export canonical types from synergy-core
pub use synergy_core::models::{ContainmentMode, Geometry, GeometryType, JoinStrategy};

fn to_line_string(coords: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

/// First ring is the exterior, the rest are holes
fn to_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => {
            GeoGeometry::LineString(to_line_string(coordinates))
        }
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| to_line_string(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(
            geo::MultiPolygon::new(coordinates.iter().map(|p| to_polygon(p)).collect()),
        ),
    }
}

/// Convert a polygonal geometry to a geo::MultiPolygon
///
/// Returns `None` for non-polygonal geometries.
pub fn to_multi_polygon(geom: &Geometry) -> Option<geo::MultiPolygon> {
    match geom {
        Geometry::Polygon { coordinates } => {
            Some(geo::MultiPolygon::new(vec![to_polygon(coordinates)]))
        }
        Geometry::MultiPolygon { coordinates } => {
            Some(geo::MultiPolygon::new(coordinates.iter().map(|p| to_polygon(p)).collect()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_conversion() {
        let geom = Geometry::point(-118.25, 34.05);
        match to_geo_geometry(&geom) {
            GeoGeometry::Point(p) => {
                assert!((p.x() + 118.25).abs() < 1e-10);
                assert!((p.y() - 34.05).abs() < 1e-10);
            }
            other => panic!("Expected Point geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_polygon_rings() {
        let geom = Geometry::polygon(vec![
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0], [1.0, 1.0]],
        ]);

        let GeoGeometry::Polygon(poly) = to_geo_geometry(&geom) else {
            panic!("Expected Polygon geometry");
        };
        assert_eq!(poly.exterior().0.len(), 5);
        assert_eq!(poly.interiors().len(), 1);
    }

    #[test]
    fn test_to_multi_polygon() {
        let square = Geometry::rectangle([0.0, 0.0], [1.0, 1.0]);
        assert_eq!(to_multi_polygon(&square).map(|mp| mp.0.len()), Some(1));

        let multi = Geometry::multi_polygon(vec![
            vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]],
            vec![vec![[5.0, 5.0], [5.0, 6.0], [6.0, 6.0], [6.0, 5.0], [5.0, 5.0]]],
        ]);
        assert_eq!(to_multi_polygon(&multi).map(|mp| mp.0.len()), Some(2));

        assert!(to_multi_polygon(&Geometry::point(0.0, 0.0)).is_none());
    }
}
