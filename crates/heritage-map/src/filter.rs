use heritage_core::models::{EntityId, FilterCriteria, GeoEntity};
use heritage_geo::validate_location;
use std::collections::HashSet;

use crate::markers::{SkipReason, SkippedEntity};

/// Evaluate if an entity satisfies every filter criterion.
///
/// Location is not part of the decision; it only gates marker creation.
pub fn matches(entity: &GeoEntity, criteria: &FilterCriteria) -> bool {
    matches_craft(entity, criteria)
        && matches_year(entity, criteria)
        && matches_status(entity, criteria)
        && matches_text(entity, &criteria.search_text)
}

/// Check the entity's craft categories against the selection
fn matches_craft(entity: &GeoEntity, criteria: &FilterCriteria) -> bool {
    criteria.categories.admits(&entity.craft_categories)
}

/// Check the resolved year against the inclusive year range
fn matches_year(entity: &GeoEntity, criteria: &FilterCriteria) -> bool {
    criteria.year_range.contains(entity.temporal_anchor.resolve_year_or_sentinel())
}

/// Check the open-only constraint
fn matches_status(entity: &GeoEntity, criteria: &FilterCriteria) -> bool {
    !criteria.only_open || entity.is_open()
}

/// Case-insensitive prefix match against any localized name
fn matches_text(entity: &GeoEntity, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }

    let needle = search_text.to_lowercase();
    entity.display_name.names().any(|name| name.to_lowercase().starts_with(&needle))
}

/// Entities that should become markers, plus the ones skipped on the way
#[derive(Debug, Default)]
pub struct VisibleSet<'a> {
    pub visible: Vec<&'a GeoEntity>,
    pub skipped: Vec<SkippedEntity>,
    pub filtered_out: usize,
}

/// Select the entities that pass the filter and can be drawn.
///
/// Entities without a usable location are skipped with a warning; entities
/// without images are skipped silently; duplicate ids keep the first entry.
pub fn compute_visible_set<'a>(
    entities: &'a [GeoEntity],
    criteria: &FilterCriteria,
) -> VisibleSet<'a> {
    let mut set = VisibleSet::default();
    let mut seen: HashSet<&EntityId> = HashSet::with_capacity(entities.len());

    for entity in entities {
        if !seen.insert(&entity.id) {
            tracing::warn!(id = %entity.id, kind = %entity.kind, "Duplicate entity id ignored");
            set.skipped.push(SkippedEntity::new(entity, SkipReason::DuplicateId));
            continue;
        }

        let validation = validate_location(entity.location.as_ref());
        if !validation.is_valid {
            tracing::warn!(
                id = %entity.id,
                kind = %entity.kind,
                reason = %validation.summary(),
                "Entity has no usable geo location"
            );
            set.skipped.push(SkippedEntity::new(
                entity,
                SkipReason::MissingLocation(validation.summary()),
            ));
            continue;
        }

        if !matches(entity, criteria) {
            set.filtered_out += 1;
            continue;
        }

        if !entity.has_images {
            tracing::debug!(id = %entity.id, "Entity has no images, not drawn");
            set.skipped.push(SkippedEntity::new(entity, SkipReason::NoImages));
            continue;
        }

        set.visible.push(entity);
    }

    set
}
