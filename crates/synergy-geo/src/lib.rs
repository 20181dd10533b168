//! Synergy Geo - Containment predicates and the spatial join engine
//!
//! This crate tests target geometries against reference polygons, groups
//! matched features by categorical fields, and prepares results for map layers.

pub mod grouping;
pub mod index;
pub mod join;
pub mod models;
pub mod predicate;
pub mod render;
pub mod validation;

pub use join::{join, JoinOptions, SpatialJoin};
pub use predicate::{contains, GeometryPredicateError, PreparedReference};
