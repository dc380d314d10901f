pub mod craft;
pub mod criteria;
pub mod entity;
pub mod location;

pub use craft::{CraftCategory, NEUTRAL_COLOR, NEUTRAL_KEY};
pub use criteria::{CategorySelection, FilterCriteria, YearRange};
pub use entity::{
    DisplayName, EntityId, EntityKind, EntityStatus, GeoEntity, TemporalAnchor,
    UNKNOWN_YEAR_SENTINEL,
};
pub use location::LngLat;
