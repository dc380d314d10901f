//! Heritage Geo - Coordinate validation, distances, and GeoJSON conversion
//!
//! This crate handles the geospatial pieces shared by the map engine and the
//! similarity ranker.

pub mod features;
pub mod spatial;
pub mod validation;

pub use features::{point_feature, point_geometry};
pub use spatial::{distance_or_infinity, geodesic_distance};
pub use validation::{validate_location, ValidationError, ValidationResult};
