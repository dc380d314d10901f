//! Single-marker map shown on an entity's detail page.

use geojson::{Feature, JsonObject};
use heritage_core::models::{EntityId, EntityKind, GeoEntity, LngLat};
use heritage_core::{HeritageError, Result};
use heritage_geo::point_feature;
use serde::Serialize;
use serde_json::json;

use crate::style::{MarkerFill, MarkerStyle};
use crate::viewport::{CameraTransition, Viewport};

/// Zoom of the detail-page map
pub const MINI_MAP_ZOOM: f64 = 12.2;

/// Detail markers have a fixed 10px diameter
const MINI_MARKER_RADIUS: f64 = 5.0;

/// Outline drawn around the detail marker
pub const MINI_MARKER_OUTLINE: &str = "white";

/// The one marker on a mini map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniMarker {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: LngLat,
    pub style: MarkerStyle,
}

impl MiniMarker {
    fn from_entity(entity: &GeoEntity) -> Result<Self> {
        let position = entity
            .location
            .filter(LngLat::is_valid)
            .ok_or_else(|| HeritageError::MarkerNotFound { id: entity.id.to_string() })?;

        Ok(Self {
            id: entity.id.clone(),
            kind: entity.kind,
            position,
            style: MarkerStyle {
                fill: MarkerFill::from_categories(&entity.craft_categories),
                radius: MINI_MARKER_RADIUS,
            },
        })
    }
}

/// Map that follows whichever entity the detail page shows
#[derive(Debug, Clone)]
pub struct MiniMapView {
    marker: MiniMarker,
    camera: Viewport,
}

impl MiniMapView {
    /// Centre on `entity` without animation. Fails when it has no usable location.
    pub fn open(entity: &GeoEntity) -> Result<Self> {
        let marker = MiniMarker::from_entity(entity)?;
        tracing::debug!(id = %marker.id, "Mini map opened");
        Ok(Self { camera: Viewport::new(marker.position, MINI_MAP_ZOOM), marker })
    }

    /// Swap the marker for `entity` and fly to it.
    ///
    /// Returns `None` when the same entity is shown again at the same place.
    /// On error the current marker and camera are left as they were.
    pub fn show(&mut self, entity: &GeoEntity) -> Result<Option<CameraTransition>> {
        let marker = MiniMarker::from_entity(entity)?;
        if marker == self.marker {
            return Ok(None);
        }

        let transition = CameraTransition::fly_to(marker.position, MINI_MAP_ZOOM);
        tracing::debug!(from = %self.marker.id, to = %marker.id, "Mini map marker replaced");

        self.marker = marker;
        self.camera = transition.target();
        Ok(Some(transition))
    }

    pub fn marker(&self) -> &MiniMarker {
        &self.marker
    }

    pub fn camera(&self) -> Viewport {
        self.camera
    }

    /// GeoJSON feature of the marker
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!(self.marker.kind.as_str()));
        properties.insert("colors".to_string(), json!(self.marker.style.fill.colors()));
        properties.insert("diameter".to_string(), json!(self.marker.style.diameter()));
        properties.insert("outline".to_string(), json!(MINI_MARKER_OUTLINE));
        point_feature(self.marker.id.as_str(), self.marker.position, properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_core::models::CraftCategory;

    fn shop(id: &str, location: LngLat) -> GeoEntity {
        GeoEntity::workshop(id)
            .with_location(location)
            .with_categories([CraftCategory::Textiles, CraftCategory::Cuisine])
    }

    #[test]
    fn test_open_centres_on_entity() {
        let view = MiniMapView::open(&shop("w1", LngLat::new(35.51, 33.89))).unwrap();

        assert_eq!(view.camera(), Viewport::new(LngLat::new(35.51, 33.89), MINI_MAP_ZOOM));
        assert_eq!(view.marker().style.diameter(), 10.0);
        assert_eq!(
            view.marker().style.fill,
            MarkerFill::Split { left: CraftCategory::Textiles, right: CraftCategory::Cuisine }
        );
    }

    #[test]
    fn test_show_other_entity_flies_there() {
        let mut view = MiniMapView::open(&shop("w1", LngLat::new(35.51, 33.89))).unwrap();

        let transition = view.show(&shop("w2", LngLat::new(35.48, 33.87))).unwrap().expect("flight");

        assert_eq!(transition.center, LngLat::new(35.48, 33.87));
        assert_eq!(transition.zoom, MINI_MAP_ZOOM);
        assert!(transition.speed.is_some());
        assert_eq!(view.marker().id.as_str(), "w2");
        assert_eq!(view.camera(), transition.target());
    }

    #[test]
    fn test_show_same_entity_is_noop() {
        let entity = shop("w1", LngLat::new(35.51, 33.89));
        let mut view = MiniMapView::open(&entity).unwrap();

        assert_eq!(view.show(&entity).unwrap(), None);
    }

    #[test]
    fn test_entity_without_location_is_rejected() {
        let mut view = MiniMapView::open(&shop("w1", LngLat::new(35.51, 33.89))).unwrap();

        let err = view.show(&GeoEntity::archive("a1")).unwrap_err();

        assert!(matches!(err, HeritageError::MarkerNotFound { .. }));
        assert_eq!(view.marker().id.as_str(), "w1");
        assert!(MiniMapView::open(&shop("bad", LngLat::new(200.0, 0.0))).is_err());
    }

    #[test]
    fn test_feature_has_white_outline() {
        let view = MiniMapView::open(&shop("w1", LngLat::new(35.51, 33.89))).unwrap();
        let feature = view.to_feature();

        let properties = feature.properties.expect("properties");
        assert_eq!(properties["outline"], json!("white"));
        assert_eq!(properties["diameter"], json!(10.0));
    }
}
