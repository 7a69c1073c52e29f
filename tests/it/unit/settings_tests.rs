//! Settings persistence against a temporary config directory

use dataplotter::constants::{DEFAULT_CHART_WIDTH, DEFAULT_PORT};
use dataplotter::settings::Settings;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_round_trip_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dataplotter").join("settings.json");
    let settings = Settings {
        host: "0.0.0.0".to_string(),
        port: 9100,
        open_browser: false,
        ..Settings::default()
    };

    settings.save_to(&path).unwrap();
    let loaded = Settings::load_from(&path);

    assert_eq!(loaded, settings);
    assert_eq!(loaded.address(), "0.0.0.0:9100");
}

#[test]
fn test_zero_dimensions_fall_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"chart_width": 0, "table_page_size": 100000}"#).unwrap();

    let loaded = Settings::load_from(&path);
    assert_eq!(loaded.chart_width, DEFAULT_CHART_WIDTH);
    assert_eq!(loaded.table_page_size, dataplotter::constants::MAX_PAGE_SIZE);
    assert_eq!(loaded.port, DEFAULT_PORT);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"port": 8001, "theme": "dark"}"#).unwrap();

    assert_eq!(Settings::load_from(&path).port, 8001);
}
