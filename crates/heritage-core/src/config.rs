use crate::error::{HeritageError, Result};
use crate::models::LngLat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Set programmatically by the embedding application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Resolved settings consumed by the map engine and the similarity ranker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasSettings {
    /// Camera anchor when no entity is focused
    pub city_center: LngLat,
    /// Zoom used when returning to the city centre
    pub default_zoom: f64,
    /// Zoom used when focusing an entity
    pub focus_zoom: f64,
    /// Zoom used after a successful geolocation
    pub geolocate_zoom: f64,
    /// Number of similar entities to return
    pub similar_count: usize,
}

impl Default for AtlasSettings {
    fn default() -> Self {
        LayeredConfig::with_defaults().settings()
    }
}

/// Layered configuration for the atlas
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub city_center_lng: ConfigValue<f64>,
    pub city_center_lat: ConfigValue<f64>,
    pub default_zoom: ConfigValue<f64>,
    pub focus_zoom: ConfigValue<f64>,
    pub geolocate_zoom: ConfigValue<f64>,
    pub similar_count: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let center = LngLat::city_center();
        Self {
            city_center_lng: ConfigValue::new(center.lng, ConfigSource::Default),
            city_center_lat: ConfigValue::new(center.lat, ConfigSource::Default),
            default_zoom: ConfigValue::new(13.25, ConfigSource::Default),
            focus_zoom: ConfigValue::new(16.0, ConfigSource::Default),
            geolocate_zoom: ConfigValue::new(20.0, ConfigSource::Default),
            similar_count: ConfigValue::new(6, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| HeritageError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| HeritageError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(center) = file_config.city_center {
            let location = LngLat::new(center.lng, center.lat);
            if !location.is_valid() {
                return Err(HeritageError::ConfigInvalid {
                    key: "city_center".to_string(),
                    reason: format!("({}, {}) is not a WGS 84 coordinate", center.lng, center.lat),
                });
            }
            self.city_center_lng.update(center.lng, ConfigSource::File);
            self.city_center_lat.update(center.lat, ConfigSource::File);
        }

        if let Some(zoom) = file_config.default_zoom {
            self.default_zoom.update(parse_zoom("default_zoom", zoom)?, ConfigSource::File);
        }

        if let Some(zoom) = file_config.focus_zoom {
            self.focus_zoom.update(parse_zoom("focus_zoom", zoom)?, ConfigSource::File);
        }

        if let Some(zoom) = file_config.geolocate_zoom {
            self.geolocate_zoom.update(parse_zoom("geolocate_zoom", zoom)?, ConfigSource::File);
        }

        if let Some(count) = file_config.similar_count {
            self.similar_count.update(count, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // HERITAGE_CITY_CENTER="lng,lat"
        if let Ok(center_str) = env::var("HERITAGE_CITY_CENTER") {
            match parse_lng_lat(&center_str) {
                Ok(center) => {
                    self.city_center_lng.update(center.lng, ConfigSource::Environment);
                    self.city_center_lat.update(center.lat, ConfigSource::Environment);
                }
                Err(_) => tracing::warn!(
                    "Invalid HERITAGE_CITY_CENTER value '{}': expected 'lng,lat' in degrees",
                    center_str
                ),
            }
        }

        for (var, key) in [
            ("HERITAGE_DEFAULT_ZOOM", "default_zoom"),
            ("HERITAGE_FOCUS_ZOOM", "focus_zoom"),
            ("HERITAGE_GEOLOCATE_ZOOM", "geolocate_zoom"),
        ] {
            let Ok(raw) = env::var(var) else {
                continue;
            };
            match raw.parse::<f64>() {
                Ok(zoom) if parse_zoom(key, zoom).is_ok() => {
                    self.zoom_mut(key).update(zoom, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid {} value '{}': expected a zoom level between 0 and 24",
                    var,
                    raw
                ),
            }
        }

        // HERITAGE_SIMILAR_COUNT
        if let Ok(count_str) = env::var("HERITAGE_SIMILAR_COUNT") {
            match count_str.parse::<usize>() {
                Ok(count) => self.similar_count.update(count, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HERITAGE_SIMILAR_COUNT value '{}': expected a non-negative integer",
                    count_str
                ),
            }
        }

        self
    }

    /// Apply overrides supplied by the embedding application
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(center) = overrides.city_center {
            self.city_center_lng.update(center.lng, ConfigSource::Override);
            self.city_center_lat.update(center.lat, ConfigSource::Override);
        }

        if let Some(zoom) = overrides.default_zoom {
            self.default_zoom.update(zoom, ConfigSource::Override);
        }

        if let Some(zoom) = overrides.focus_zoom {
            self.focus_zoom.update(zoom, ConfigSource::Override);
        }

        if let Some(zoom) = overrides.geolocate_zoom {
            self.geolocate_zoom.update(zoom, ConfigSource::Override);
        }

        if let Some(count) = overrides.similar_count {
            self.similar_count.update(count, ConfigSource::Override);
        }
    }

    /// Collapse the layers into plain settings
    pub fn settings(&self) -> AtlasSettings {
        AtlasSettings {
            city_center: LngLat::new(self.city_center_lng.value, self.city_center_lat.value),
            default_zoom: self.default_zoom.value,
            focus_zoom: self.focus_zoom.value,
            geolocate_zoom: self.geolocate_zoom.value,
            similar_count: self.similar_count.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "city_center".to_string(),
            (
                format!("{}, {}", self.city_center_lng.value, self.city_center_lat.value),
                self.city_center_lng.source,
            ),
        );

        map.insert(
            "default_zoom".to_string(),
            (self.default_zoom.value.to_string(), self.default_zoom.source),
        );

        map.insert(
            "focus_zoom".to_string(),
            (self.focus_zoom.value.to_string(), self.focus_zoom.source),
        );

        map.insert(
            "geolocate_zoom".to_string(),
            (self.geolocate_zoom.value.to_string(), self.geolocate_zoom.source),
        );

        map.insert(
            "similar_count".to_string(),
            (self.similar_count.value.to_string(), self.similar_count.source),
        );

        map
    }

    fn zoom_mut(&mut self, key: &str) -> &mut ConfigValue<f64> {
        match key {
            "focus_zoom" => &mut self.focus_zoom,
            "geolocate_zoom" => &mut self.geolocate_zoom,
            _ => &mut self.default_zoom,
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    city_center: Option<FileLngLat>,
    default_zoom: Option<f64>,
    focus_zoom: Option<f64>,
    geolocate_zoom: Option<f64>,
    similar_count: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize)]
struct FileLngLat {
    lng: f64,
    lat: f64,
}

/// Programmatic configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub city_center: Option<LngLat>,
    pub default_zoom: Option<f64>,
    pub focus_zoom: Option<f64>,
    pub geolocate_zoom: Option<f64>,
    pub similar_count: Option<usize>,
}

/// Parse a `lng,lat` pair in degrees
pub fn parse_lng_lat(s: &str) -> Result<LngLat> {
    let invalid = |reason: String| HeritageError::ConfigInvalid {
        key: "city_center".to_string(),
        reason,
    };

    let (lng, lat) = s
        .split_once(',')
        .ok_or_else(|| invalid(format!("Expected 'lng,lat', got '{}'", s)))?;

    let lng = lng.trim().parse::<f64>().map_err(|e| invalid(format!("Invalid longitude: {}", e)))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| invalid(format!("Invalid latitude: {}", e)))?;

    let location = LngLat::new(lng, lat);
    if !location.is_valid() {
        return Err(invalid(format!("({}, {}) is not a WGS 84 coordinate", lng, lat)));
    }
    Ok(location)
}

/// Validate a zoom level
pub fn parse_zoom(key: &str, zoom: f64) -> Result<f64> {
    if zoom.is_finite() && (0.0..=24.0).contains(&zoom) {
        Ok(zoom)
    } else {
        Err(HeritageError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Zoom {} is outside 0..=24", zoom),
        })
    }
}
