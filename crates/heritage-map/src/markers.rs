//! Keyed marker sets and the deltas between them.

use geojson::{FeatureCollection, JsonObject};
use heritage_core::models::{
    EntityId, EntityKind, FilterCriteria, GeoEntity, LngLat, NEUTRAL_KEY,
};
use heritage_geo::point_feature;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::filter::compute_visible_set;
use crate::style::{compute_marker_style, MarkerStyle};
use crate::viewport::Viewport;

/// Everything a rendering surface needs to draw one marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: LngLat,
    pub style: MarkerStyle,
    /// Category slug used to style the hover highlight (`none` when uncategorized)
    pub highlight_key: &'static str,
}

impl MarkerDescriptor {
    /// Build the descriptor for an entity that has a valid location
    pub fn from_entity(entity: &GeoEntity, position: LngLat, zoom: f64) -> Self {
        Self {
            id: entity.id.clone(),
            kind: entity.kind,
            position,
            style: compute_marker_style(entity, zoom),
            highlight_key: entity.primary_category().map(|c| c.as_str()).unwrap_or(NEUTRAL_KEY),
        }
    }

    fn properties(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!(self.kind.as_str()));
        properties.insert("colors".to_string(), json!(self.style.fill.colors()));
        properties.insert("radius".to_string(), json!(self.style.radius));
        properties.insert("diameter".to_string(), json!(self.style.diameter()));
        properties.insert("highlight_key".to_string(), json!(self.highlight_key));
        properties
    }
}

/// Create/update/remove operations turning one marker set into another
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerDelta {
    pub created: Vec<MarkerDescriptor>,
    pub updated: Vec<MarkerDescriptor>,
    pub removed: Vec<EntityId>,
}

impl MarkerDelta {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Total number of operations
    pub fn len(&self) -> usize {
        self.created.len() + self.updated.len() + self.removed.len()
    }
}

/// Markers keyed by entity id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    markers: BTreeMap<EntityId, MarkerDescriptor>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&MarkerDescriptor> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.markers.contains_key(id)
    }

    /// Markers in id order
    pub fn iter(&self) -> impl Iterator<Item = &MarkerDescriptor> {
        self.markers.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.markers.keys()
    }

    fn insert(&mut self, marker: MarkerDescriptor) {
        self.markers.insert(marker.id.clone(), marker);
    }

    /// Operations that turn `self` into `next`
    pub fn diff(&self, next: &MarkerSet) -> MarkerDelta {
        let mut delta = MarkerDelta::default();

        for (id, marker) in &next.markers {
            match self.markers.get(id) {
                None => delta.created.push(marker.clone()),
                Some(previous) if previous != marker => delta.updated.push(marker.clone()),
                Some(_) => {}
            }
        }

        delta.removed =
            self.markers.keys().filter(|id| !next.markers.contains_key(*id)).cloned().collect();

        delta
    }

    /// Delta that removes every marker
    pub fn teardown(&self) -> MarkerDelta {
        MarkerDelta { removed: self.markers.keys().cloned().collect(), ..Default::default() }
    }

    /// GeoJSON representation for map sources
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self
                .iter()
                .map(|marker| point_feature(marker.id.as_str(), marker.position, marker.properties()))
                .collect(),
            foreign_members: None,
        }
    }
}

/// Why an entity did not become a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    MissingLocation(String),
    NoImages,
    DuplicateId,
}

/// An entity left off the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub reason: SkipReason,
}

impl SkippedEntity {
    pub fn new(entity: &GeoEntity, reason: SkipReason) -> Self {
        Self { id: entity.id.clone(), kind: entity.kind, reason }
    }
}

/// Summary of one rendering pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderReport {
    /// Entities considered
    pub total: usize,
    /// Markers produced
    pub visible: usize,
    /// Entities rejected by the filter
    pub filtered_out: usize,
    /// Entities that could not be drawn
    pub skipped: Vec<SkippedEntity>,
}

impl RenderReport {
    /// Entities skipped for lacking a usable location
    pub fn missing_location(&self) -> impl Iterator<Item = &SkippedEntity> {
        self.skipped.iter().filter(|s| matches!(s.reason, SkipReason::MissingLocation(_)))
    }
}

/// Interaction emitted by a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarkerEvent {
    /// Open the detail view for an entity
    Click { id: EntityId, kind: EntityKind },
    /// Apply the highlight style
    HoverEnter { id: EntityId, highlight_key: &'static str },
    /// Remove the highlight style
    HoverLeave { id: EntityId, highlight_key: &'static str },
}

/// Compute the marker set for a filter and viewport.
///
/// Pure: identical inputs always produce an identical set.
pub fn render(
    entities: &[GeoEntity],
    criteria: &FilterCriteria,
    viewport: &Viewport,
) -> (MarkerSet, RenderReport) {
    let visible_set = compute_visible_set(entities, criteria);

    let mut markers = MarkerSet::new();
    for entity in &visible_set.visible {
        if let Some(position) = entity.valid_location() {
            markers.insert(MarkerDescriptor::from_entity(entity, position, viewport.zoom));
        }
    }

    let report = RenderReport {
        total: entities.len(),
        visible: markers.len(),
        filtered_out: visible_set.filtered_out,
        skipped: visible_set.skipped,
    };

    (markers, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::MarkerFill;
    use heritage_core::models::{CategorySelection, CraftCategory};
    use proptest::prelude::*;

    fn viewport(zoom: f64) -> Viewport {
        Viewport::new(LngLat::city_center(), zoom)
    }

    fn entity(id: &str, categories: &[CraftCategory]) -> GeoEntity {
        GeoEntity::workshop(id)
            .with_location(LngLat::new(35.5, 33.89))
            .with_images(true)
            .with_categories(categories.iter().copied())
    }

    #[test]
    fn test_render_builds_styled_markers() {
        let entities = vec![
            entity("a", &[CraftCategory::Cuisine, CraftCategory::Textiles]),
            entity("b", &[]),
        ];

        let (markers, report) = render(&entities, &FilterCriteria::new(), &viewport(13.5));

        assert_eq!(report.visible, 2);
        let a = markers.get(&EntityId::from("a")).unwrap();
        assert_eq!(
            a.style.fill,
            MarkerFill::Split { left: CraftCategory::Cuisine, right: CraftCategory::Textiles }
        );
        assert_eq!(a.style.radius, 6.0);
        assert_eq!(a.highlight_key, "cuisine");

        let b = markers.get(&EntityId::from("b")).unwrap();
        assert_eq!(b.style.fill, MarkerFill::Neutral);
        assert_eq!(b.highlight_key, "none");
    }

    #[test]
    fn test_render_is_idempotent() {
        let entities = vec![
            entity("a", &[CraftCategory::Cuisine]),
            entity("b", &[CraftCategory::Fashion]),
            GeoEntity::archive("c").with_images(true),
        ];
        let criteria = FilterCriteria::new();

        let first = render(&entities, &criteria, &viewport(12.0));
        let second = render(&entities, &criteria, &viewport(12.0));

        assert_eq!(first, second);
        assert!(first.0.diff(&second.0).is_empty());
    }

    #[test]
    fn test_diff_reports_created_updated_removed() {
        let before = vec![entity("a", &[CraftCategory::Cuisine]), entity("b", &[])];
        let after = vec![entity("b", &[CraftCategory::Decorative]), entity("c", &[])];

        let (old, _) = render(&before, &FilterCriteria::new(), &viewport(13.0));
        let (new, _) = render(&after, &FilterCriteria::new(), &viewport(13.0));
        let delta = old.diff(&new);

        assert_eq!(delta.created.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(delta.updated.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(delta.removed, vec![EntityId::from("a")]);
        assert_eq!(delta.len(), 3);
    }

    #[test]
    fn test_zoom_change_updates_every_marker() {
        let entities = vec![entity("a", &[]), entity("b", &[])];

        let (small, _) = render(&entities, &FilterCriteria::new(), &viewport(11.0));
        let (large, _) = render(&entities, &FilterCriteria::new(), &viewport(15.0));
        let delta = small.diff(&large);

        assert!(delta.created.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(delta.updated.len(), 2);
        assert!(delta.updated.iter().all(|m| m.style.radius == 7.5));
    }

    #[test]
    fn test_filter_change_removes_markers() {
        let entities = vec![
            entity("a", &[CraftCategory::Cuisine]),
            entity("b", &[CraftCategory::Furniture]),
        ];

        let (all, _) = render(&entities, &FilterCriteria::new(), &viewport(13.0));
        let criteria = FilterCriteria::new()
            .with_categories(CategorySelection::only([CraftCategory::Furniture]));
        let (furniture, report) = render(&entities, &criteria, &viewport(13.0));

        assert_eq!(report.filtered_out, 1);
        assert_eq!(all.diff(&furniture).removed, vec![EntityId::from("a")]);
    }

    #[test]
    fn test_teardown_removes_everything() {
        let entities = vec![entity("a", &[]), entity("b", &[])];
        let (markers, _) = render(&entities, &FilterCriteria::new(), &viewport(13.0));

        let delta = markers.teardown();
        assert_eq!(delta.removed.len(), 2);
        assert!(delta.created.is_empty());
    }

    #[test]
    fn test_feature_collection_properties() {
        let entities = vec![entity("a", &[CraftCategory::Cuisine, CraftCategory::Textiles])];
        let (markers, _) = render(&entities, &FilterCriteria::new(), &viewport(14.0));

        let collection = markers.to_feature_collection();

        assert_eq!(collection.features.len(), 1);
        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["kind"], json!("workshop"));
        assert_eq!(properties["colors"], json!(["#DFBA96", "#EACC74"]));
        assert_eq!(properties["diameter"], json!(15.0));
    }

    fn arb_entity() -> impl Strategy<Value = GeoEntity> {
        (
            "[a-f]",
            prop::collection::vec(prop::sample::select(CraftCategory::ALL.to_vec()), 0..3),
            prop::option::of((35.0f64..36.0, 33.0f64..34.5)),
            1880i32..2030,
            any::<bool>(),
        )
            .prop_map(|(id, categories, location, year, has_images)| {
                let entity = GeoEntity::workshop(id)
                    .with_categories(categories)
                    .with_year(year)
                    .with_images(has_images);
                match location {
                    Some((lng, lat)) => entity.with_location(LngLat::new(lng, lat)),
                    None => entity,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_render_is_idempotent(
            entities in prop::collection::vec(arb_entity(), 0..12),
            start in 1880i32..2030,
            zoom in 10.0f64..18.0,
        ) {
            let criteria = FilterCriteria::new().with_year_range(start, 2030);
            let (first, first_report) = render(&entities, &criteria, &viewport(zoom));
            let (second, second_report) = render(&entities, &criteria, &viewport(zoom));

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first_report, second_report);
            prop_assert!(first.iter().all(|m| m.position.is_valid()));
        }
    }
}
