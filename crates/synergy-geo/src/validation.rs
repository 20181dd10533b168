use geo::algorithm::area::Area;
use geo::{LineString, Polygon};

use crate::models::Geometry;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// What made a geometry unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// NaN or infinite coordinate
    NonFinite,
    /// Ring or line with too few positions, an open ring or a zero-area ring
    Degenerate,
    /// Geometry or member without any positions
    Empty,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
    pub issue: ValidationIssue,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String, issue: ValidationIssue) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason, issue });
    }

    /// Merge errors from a member geometry under `prefix`
    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason, error.issue);
        }
    }

    /// First error, if any
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }
}

/// Validate a geometry
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Point { coordinates } => validate_position("Point", coordinates),
        Geometry::LineString { coordinates } => validate_linestring("LineString", coordinates),
        Geometry::Polygon { coordinates } => validate_polygon("Polygon", coordinates),
        Geometry::MultiPoint { coordinates } => {
            let mut result = non_empty("MultiPoint", coordinates.len());
            for (i, point) in coordinates.iter().enumerate() {
                result.absorb(&format!("MultiPoint[{}]", i), validate_position("Point", point));
            }
            result
        }
        Geometry::MultiLineString { coordinates } => {
            let mut result = non_empty("MultiLineString", coordinates.len());
            for (i, line) in coordinates.iter().enumerate() {
                result.absorb(
                    &format!("MultiLineString[{}]", i),
                    validate_linestring("LineString", line),
                );
            }
            result
        }
        Geometry::MultiPolygon { coordinates } => {
            let mut result = non_empty("MultiPolygon", coordinates.len());
            for (i, polygon) in coordinates.iter().enumerate() {
                result.absorb(&format!("MultiPolygon[{}]", i), validate_polygon("Polygon", polygon));
            }
            result
        }
    }
}

fn non_empty(location: &str, len: usize) -> ValidationResult {
    let mut result = ValidationResult::valid();
    if len == 0 {
        result.add_error(
            location.to_string(),
            format!("{} has no members", location),
            ValidationIssue::Empty,
        );
    }
    result
}

fn validate_position(location: &str, position: &[f64; 2]) -> ValidationResult {
    let mut result = ValidationResult::valid();
    if !position[0].is_finite() || !position[1].is_finite() {
        result.add_error(
            format!("{}({}, {})", location, position[0], position[1]),
            "Coordinates must be finite".to_string(),
            ValidationIssue::NonFinite,
        );
    }
    result
}

fn validate_finite(location: &str, positions: &[[f64; 2]], result: &mut ValidationResult) {
    for (i, position) in positions.iter().enumerate() {
        if !position[0].is_finite() || !position[1].is_finite() {
            result.add_error(
                format!("{}[{}]", location, i),
                "Coordinates must be finite".to_string(),
                ValidationIssue::NonFinite,
            );
        }
    }
}

fn validate_linestring(location: &str, line: &[[f64; 2]]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if line.is_empty() {
        result.add_error(
            location.to_string(),
            "LineString has no positions".to_string(),
            ValidationIssue::Empty,
        );
        return result;
    }

    // LineString must have at least 2 points
    if line.len() < 2 {
        result.add_error(
            location.to_string(),
            format!("LineString must have at least 2 points, found {}", line.len()),
            ValidationIssue::Degenerate,
        );
        return result;
    }

    validate_finite(location, line, &mut result);
    result
}

fn validate_ring(location: String, ring: &[[f64; 2]], result: &mut ValidationResult) {
    let errors_before = result.errors.len();

    if ring.len() < 4 {
        result.add_error(
            location.clone(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
            ValidationIssue::Degenerate,
        );
    }

    // Check if closed
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.clone(),
                "Ring must be closed (first point == last point)".to_string(),
                ValidationIssue::Degenerate,
            );
        }
    }

    validate_finite(&location, ring, result);

    // Collapsed or collinear rings enclose nothing
    if result.errors.len() == errors_before && ring_area(ring) == 0.0 {
        result.add_error(
            location,
            "Ring encloses zero area".to_string(),
            ValidationIssue::Degenerate,
        );
    }
}

fn ring_area(ring: &[[f64; 2]]) -> f64 {
    Polygon::new(LineString::from(ring.to_vec()), vec![]).unsigned_area()
}

fn validate_polygon(location: &str, rings: &[Vec<[f64; 2]>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some((exterior, interiors)) = rings.split_first() else {
        result.add_error(
            location.to_string(),
            "Polygon has no rings".to_string(),
            ValidationIssue::Empty,
        );
        return result;
    };

    validate_ring(format!("{} exterior", location), exterior, &mut result);
    for (i, interior) in interiors.iter().enumerate() {
        validate_ring(format!("{} interior[{}]", location, i), interior, &mut result);
    }

    result
}
