//! GeoJSON conversion for point markers.

use geojson::{feature::Id, Feature, Geometry, JsonObject, Value};
use heritage_core::models::LngLat;

/// GeoJSON point geometry for a coordinate
pub fn point_geometry(location: LngLat) -> Geometry {
    Geometry::new(Value::Point(vec![location.lng, location.lat]))
}

/// GeoJSON point feature with a string id and properties
pub fn point_feature(id: &str, location: LngLat, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(point_geometry(location)),
        id: Some(Id::String(id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}
