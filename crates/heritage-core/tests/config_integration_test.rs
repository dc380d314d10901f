//! Integration tests for layered configuration
//!
//! Precedence: overrides > environment variables > config file > defaults

use heritage_core::config::{ConfigOverrides, ConfigSource, LayeredConfig};
use heritage_core::models::LngLat;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [
    "HERITAGE_CITY_CENTER",
    "HERITAGE_DEFAULT_ZOOM",
    "HERITAGE_FOCUS_ZOOM",
    "HERITAGE_GEOLOCATE_ZOOM",
    "HERITAGE_SIMILAR_COUNT",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
default_zoom = 12.0
focus_zoom = 15.0

[city_center]
lng = 35.5
lat = 33.9
"#,
    );
    env::set_var("HERITAGE_FOCUS_ZOOM", "17.5");
    env::set_var("HERITAGE_SIMILAR_COUNT", "4");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    clear_env();

    assert_eq!(config.default_zoom.value, 12.0);
    assert_eq!(config.default_zoom.source, ConfigSource::File);
    assert_eq!(config.focus_zoom.value, 17.5);
    assert_eq!(config.focus_zoom.source, ConfigSource::Environment);
    assert_eq!(config.similar_count.value, 4);
    assert_eq!(config.city_center_lng.source, ConfigSource::File);
    assert_eq!(config.geolocate_zoom.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("HERITAGE_CITY_CENTER", "beirut");
    env::set_var("HERITAGE_DEFAULT_ZOOM", "40");
    env::set_var("HERITAGE_SIMILAR_COUNT", "-1");

    let config = LayeredConfig::with_defaults().load_from_env();
    clear_env();

    assert_eq!(config.settings().city_center, LngLat::city_center());
    assert_eq!(config.default_zoom.value, 13.25);
    assert_eq!(config.default_zoom.source, ConfigSource::Default);
    assert_eq!(config.similar_count.value, 6);
}

#[test]
#[serial]
fn test_env_city_center() {
    clear_env();
    env::set_var("HERITAGE_CITY_CENTER", "35.48, 33.87");

    let config = LayeredConfig::with_defaults().load_from_env();
    clear_env();

    assert_eq!(config.settings().city_center, LngLat::new(35.48, 33.87));
    assert_eq!(config.to_inspection_map()["city_center"].1, ConfigSource::Environment);
}

#[test]
#[serial]
fn test_overrides_win_over_env() {
    clear_env();
    env::set_var("HERITAGE_GEOLOCATE_ZOOM", "18");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    clear_env();
    config.apply_overrides(ConfigOverrides {
        geolocate_zoom: Some(19.0),
        ..Default::default()
    });

    assert_eq!(config.geolocate_zoom.value, 19.0);
    assert_eq!(config.geolocate_zoom.source, ConfigSource::Override);
    assert_eq!(config.settings().geolocate_zoom, 19.0);
}

#[test]
fn test_file_with_invalid_center_is_rejected() {
    let file = config_file(
        r#"
[city_center]
lng = 200.0
lat = 33.9
"#,
    );

    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_rejected() {
    assert!(LayeredConfig::with_defaults().load_from_file("/nonexistent/heritage.toml").is_err());
}
