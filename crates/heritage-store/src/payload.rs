//! Wire records of the workshops and archive endpoints.

use heritage_core::models::{
    CraftCategory, DisplayName, EntityId, EntityKind, EntityStatus, GeoEntity, LngLat,
    TemporalAnchor,
};
use heritage_core::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope returned by the list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub response: Vec<T>,
}

/// Either the envelope or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope(ListResponse<T>),
    List(Vec<T>),
}

impl<T> Payload<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Payload::Envelope(envelope) => envelope.response,
            Payload::List(records) => records,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRecord {
    pub content: Option<String>,
    pub content_orig: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoRecord {
    pub lng: Option<f64>,
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRecord {
    pub geo: Option<GeoRecord>,
}

impl LocationRecord {
    fn lng_lat(&self) -> Option<LngLat> {
        let geo = self.geo.as_ref()?;
        Some(LngLat::new(geo.lng?, geo.lat?))
    }
}

/// A record from the workshops collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopRecord {
    #[serde(rename = "ID")]
    pub id: String,
    pub shop_name: Option<NameRecord>,
    pub craft_discipline_category: Option<Vec<String>>,
    pub craft_discipline: Option<Vec<String>>,
    pub location: Option<LocationRecord>,
    pub shop_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year_established: Option<i32>,
    #[serde(default, deserialize_with = "lenient_years")]
    pub decade_established: Vec<i32>,
    pub images: Option<Vec<String>>,
    pub thumb_img_id: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// A record from the archive collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveRecord {
    #[serde(rename = "ID")]
    pub id: String,
    pub shop_name: Option<NameRecord>,
    pub craft_discipline_category: Option<Vec<String>>,
    pub craft_discipline: Option<Vec<String>>,
    pub primary_location: Option<LocationRecord>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub primary_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_years")]
    pub primary_decade: Vec<i32>,
    pub images: Option<Vec<String>>,
    pub thumb_img_id: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// Read a year given as a number or as a date string such as `1956-04-01`
fn year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.split('-').next()?.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(year_from_value))
}

fn lenient_years<'de, D>(deserializer: D) -> std::result::Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.unwrap_or_default().iter().filter_map(year_from_value).collect())
}

/// Keep the categories this atlas knows; the rest are dropped
fn parse_categories(id: &str, raw: Option<Vec<String>>) -> Vec<CraftCategory> {
    raw.unwrap_or_default()
        .iter()
        .filter_map(|value| match value.parse::<CraftCategory>() {
            Ok(category) => Some(category),
            Err(e) => {
                tracing::debug!(id, error = %e, "Dropping craft category");
                None
            }
        })
        .collect()
}

fn anchor(year: Option<i32>, decades: &[i32]) -> TemporalAnchor {
    match year {
        Some(year) => TemporalAnchor::Year { year },
        None => TemporalAnchor::from_decades(decades),
    }
}

fn display_name(name: Option<NameRecord>) -> DisplayName {
    let name = name.unwrap_or_default();
    DisplayName { content: name.content, content_orig: name.content_orig }
}

impl WorkshopRecord {
    pub fn into_entity(self) -> GeoEntity {
        let categories = parse_categories(&self.id, self.craft_discipline_category);
        GeoEntity {
            kind: EntityKind::Workshop,
            craft_categories: categories,
            craft_disciplines: self.craft_discipline.unwrap_or_default(),
            location: self.location.as_ref().and_then(LocationRecord::lng_lat),
            temporal_anchor: anchor(self.year_established, &self.decade_established),
            status: self.shop_status.as_deref().map(EntityStatus::from_raw),
            has_images: self.images.as_ref().is_some_and(|images| !images.is_empty()),
            thumbnail_id: self.thumb_img_id,
            display_name: display_name(self.shop_name),
            id: EntityId::new(self.id),
        }
    }
}

impl ArchiveRecord {
    pub fn into_entity(self) -> GeoEntity {
        let categories = parse_categories(&self.id, self.craft_discipline_category);
        GeoEntity {
            kind: EntityKind::Archive,
            craft_categories: categories,
            craft_disciplines: self.craft_discipline.unwrap_or_default(),
            location: self.primary_location.as_ref().and_then(LocationRecord::lng_lat),
            temporal_anchor: anchor(self.primary_year, &self.primary_decade),
            status: None,
            has_images: self.images.as_ref().is_some_and(|images| !images.is_empty()),
            thumbnail_id: self.thumb_img_id,
            display_name: display_name(self.shop_name),
            id: EntityId::new(self.id),
        }
    }
}

/// Parse a workshops payload, keeping verified records only
pub fn parse_workshops(json: &str) -> Result<Vec<GeoEntity>> {
    let records = serde_json::from_str::<Payload<WorkshopRecord>>(json)?.into_records();
    let total = records.len();
    let entities: Vec<_> = records
        .into_iter()
        .filter(|record| record.verified)
        .map(WorkshopRecord::into_entity)
        .collect();

    tracing::debug!(total, verified = entities.len(), "Parsed workshops");
    Ok(entities)
}

/// Parse an archive payload, keeping verified records only
pub fn parse_archives(json: &str) -> Result<Vec<GeoEntity>> {
    let records = serde_json::from_str::<Payload<ArchiveRecord>>(json)?.into_records();
    let total = records.len();
    let entities: Vec<_> = records
        .into_iter()
        .filter(|record| record.verified)
        .map(ArchiveRecord::into_entity)
        .collect();

    tracing::debug!(total, verified = entities.len(), "Parsed archives");
    Ok(entities)
}
