//! Containment predicate between a reference polygon and a target geometry

use geo::algorithm::centroid::Centroid;
use geo::algorithm::contains::Contains;
use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::Geometry as GeoGeometry;
use synergy_core::models::Feature;
use thiserror::Error;

use crate::models::{to_geo_geometry, to_multi_polygon, ContainmentMode, Geometry, GeometryType};
use crate::validation::{validate_geometry, ValidationError, ValidationIssue};

/// Reasons a containment test cannot be evaluated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryPredicateError {
    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Reference geometry must be Polygon or MultiPolygon, found {found}")]
    NotPolygonal { found: GeometryType },

    #[error("Geometry has no coordinates")]
    EmptyGeometry,

    #[error("Non-finite coordinate at {location}")]
    NonFiniteCoordinate { location: String },

    #[error("Degenerate geometry at {location}: {reason}")]
    Degenerate { location: String, reason: String },

    #[error("Target geometry {found} cannot be tested in points-only mode")]
    UnsupportedTarget { found: GeometryType },
}

impl From<ValidationError> for GeometryPredicateError {
    fn from(error: ValidationError) -> Self {
        match error.issue {
            ValidationIssue::NonFinite => {
                GeometryPredicateError::NonFiniteCoordinate { location: error.location }
            }
            ValidationIssue::Degenerate => GeometryPredicateError::Degenerate {
                location: error.location,
                reason: error.reason,
            },
            ValidationIssue::Empty => GeometryPredicateError::EmptyGeometry,
        }
    }
}

pub type PredicateResult<T> = std::result::Result<T, GeometryPredicateError>;

fn ensure_valid(geometry: &Geometry) -> PredicateResult<()> {
    match validate_geometry(geometry).errors.into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Reference polygon validated and converted once, then tested many times
#[derive(Debug, Clone)]
pub struct PreparedReference {
    shape: GeoGeometry,
    bounds: Option<([f64; 2], [f64; 2])>,
}

impl PreparedReference {
    pub fn new(geometry: &Geometry) -> PredicateResult<Self> {
        let found = geometry.geometry_type();
        if !found.is_polygonal() {
            return Err(GeometryPredicateError::NotPolygonal { found });
        }

        ensure_valid(geometry)?;

        let polygons =
            to_multi_polygon(geometry).ok_or(GeometryPredicateError::NotPolygonal { found })?;

        Ok(Self { shape: GeoGeometry::MultiPolygon(polygons), bounds: geometry.bounds() })
    }

    /// Prepare the geometry of a reference feature
    pub fn from_feature(feature: &Feature) -> PredicateResult<Self> {
        let geometry = feature.geometry.as_ref().ok_or(GeometryPredicateError::MissingGeometry)?;
        Self::new(geometry)
    }

    /// Bounding box as `(min, max)` corners
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        self.bounds
    }

    /// Boundary-inclusive point test; points inside a hole are outside
    pub fn contains_point(&self, coordinates: [f64; 2]) -> bool {
        let coord = geo::Coord { x: coordinates[0], y: coordinates[1] };
        self.shape.coordinate_position(&coord) != CoordPos::Outside
    }

    /// Test a target geometry under `mode`
    pub fn contains_geometry(
        &self,
        target: &Geometry,
        mode: ContainmentMode,
    ) -> PredicateResult<bool> {
        ensure_valid(target)?;

        if let Geometry::Point { coordinates } = target {
            return Ok(self.contains_point(*coordinates));
        }

        match mode {
            ContainmentMode::Whole => match target {
                Geometry::MultiPoint { coordinates } => {
                    Ok(coordinates.iter().all(|c| self.contains_point(*c)))
                }
                _ => Ok(self.shape.contains(&to_geo_geometry(target))),
            },
            ContainmentMode::Centroid => {
                let centroid = to_geo_geometry(target)
                    .centroid()
                    .ok_or(GeometryPredicateError::EmptyGeometry)?;
                Ok(self.contains_point([centroid.x(), centroid.y()]))
            }
            ContainmentMode::PointsOnly => {
                Err(GeometryPredicateError::UnsupportedTarget { found: target.geometry_type() })
            }
        }
    }

    /// Test a target feature under `mode`
    pub fn contains_target(&self, target: &Feature, mode: ContainmentMode) -> PredicateResult<bool> {
        let geometry = target.geometry.as_ref().ok_or(GeometryPredicateError::MissingGeometry)?;
        self.contains_geometry(geometry, mode)
    }
}

/// Whether `target` lies within `reference` under the default containment mode
pub fn contains(reference: &Geometry, target: &Geometry) -> PredicateResult<bool> {
    PreparedReference::new(reference)?.contains_geometry(target, ContainmentMode::default())
}
