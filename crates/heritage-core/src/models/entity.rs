//! Geolocated workshop and archive records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::craft::CraftCategory;
use super::location::LngLat;

/// Year assumed for entities whose founding date is unknown
pub const UNKNOWN_YEAR_SENTINEL: i32 = 2010;

/// Stable identifier of a workshop or archive record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which collection an entity comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Workshop,
    Archive,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Workshop => "workshop",
            EntityKind::Archive => "archive",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating status of a workshop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Open,
    Closed,
    Other(String),
}

impl EntityStatus {
    /// Interpret a raw status string from the data source
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "open" => EntityStatus::Open,
            "closed" => EntityStatus::Closed,
            other => EntityStatus::Other(other.to_string()),
        }
    }
}

const DECADE_SPAN: i32 = 10;

/// When an entity was established or depicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemporalAnchor {
    /// An explicit year
    Year { year: i32 },
    /// A single decade, identified by its first year (1950 for the 1950s)
    Decade { start: i32 },
    /// An interval between two decade starts, both decades included
    DecadeRange { start: i32, end: i32 },
    #[default]
    Unknown,
}

impl TemporalAnchor {
    /// Resolve to a single representative year.
    ///
    /// Decades resolve to their midpoint. A decade range spans from the first
    /// year of its start decade to the last year of its end decade, so
    /// `DecadeRange { start: d, end: d }` resolves like `Decade { start: d }`.
    /// Unknown anchors resolve to `None`.
    pub fn resolve_year(&self) -> Option<i32> {
        match *self {
            TemporalAnchor::Year { year } => Some(year),
            TemporalAnchor::Decade { start } => Some(start + DECADE_SPAN / 2),
            TemporalAnchor::DecadeRange { start, end } => {
                let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
                Some(lo + (hi + DECADE_SPAN - lo) / 2)
            }
            TemporalAnchor::Unknown => None,
        }
    }

    /// Resolve to a year, substituting [`UNKNOWN_YEAR_SENTINEL`] when unknown
    pub fn resolve_year_or_sentinel(&self) -> i32 {
        self.resolve_year().unwrap_or(UNKNOWN_YEAR_SENTINEL)
    }

    /// Build an anchor from the decade list shape used by the data source
    pub fn from_decades(decades: &[i32]) -> Self {
        match decades {
            [] => TemporalAnchor::Unknown,
            [start] => TemporalAnchor::Decade { start: *start },
            [start, .., end] if start == end => TemporalAnchor::Decade { start: *start },
            [start, .., end] => TemporalAnchor::DecadeRange { start: *start, end: *end },
        }
    }
}

/// Localized name fields of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName {
    /// Name in the atlas display language
    pub content: Option<String>,

    /// Name as originally submitted
    pub content_orig: Option<String>,
}

impl DisplayName {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), content_orig: None }
    }

    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.content_orig = Some(original.into());
        self
    }

    /// Every non-empty name field
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [self.content.as_deref(), self.content_orig.as_deref()]
            .into_iter()
            .flatten()
            .filter(|name| !name.is_empty())
    }
}

/// A workshop or archive record that may appear on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntity {
    /// Unique identifier
    pub id: EntityId,

    /// Source collection
    pub kind: EntityKind,

    /// Coarse categories; only the first two drive marker rendering
    pub craft_categories: Vec<CraftCategory>,

    /// Fine-grained disciplines, used for similarity only
    pub craft_disciplines: Vec<String>,

    /// Geocoordinate, if known
    pub location: Option<LngLat>,

    /// Founding year or depicted period
    pub temporal_anchor: TemporalAnchor,

    /// Operating status, if known
    pub status: Option<EntityStatus>,

    /// Whether at least one image is attached
    pub has_images: bool,

    /// Thumbnail image id
    pub thumbnail_id: Option<String>,

    /// Localized names
    pub display_name: DisplayName,
}

impl GeoEntity {
    /// Create an entity with no optional data attached
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: EntityId::new(id),
            kind,
            craft_categories: Vec::new(),
            craft_disciplines: Vec::new(),
            location: None,
            temporal_anchor: TemporalAnchor::Unknown,
            status: None,
            has_images: false,
            thumbnail_id: None,
            display_name: DisplayName::default(),
        }
    }

    pub fn workshop(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Workshop)
    }

    pub fn archive(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Archive)
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CraftCategory>) -> Self {
        self.craft_categories = categories.into_iter().collect();
        self
    }

    pub fn with_disciplines(
        mut self,
        disciplines: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.craft_disciplines = disciplines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: LngLat) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_anchor(mut self, anchor: TemporalAnchor) -> Self {
        self.temporal_anchor = anchor;
        self
    }

    pub fn with_year(self, year: i32) -> Self {
        self.with_anchor(TemporalAnchor::Year { year })
    }

    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_images(mut self, has_images: bool) -> Self {
        self.has_images = has_images;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_id: impl Into<String>) -> Self {
        self.thumbnail_id = Some(thumbnail_id.into());
        self
    }

    pub fn with_name(mut self, name: DisplayName) -> Self {
        self.display_name = name;
        self
    }

    /// True when the status is explicitly `open`
    pub fn is_open(&self) -> bool {
        matches!(self.status, Some(EntityStatus::Open))
    }

    /// Location, only when it is present and within WGS 84 bounds
    pub fn valid_location(&self) -> Option<LngLat> {
        self.location.filter(LngLat::is_valid)
    }

    /// Category used to key hover highlights
    pub fn primary_category(&self) -> Option<CraftCategory> {
        self.craft_categories.first().copied()
    }
}
