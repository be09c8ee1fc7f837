//! Tests for YAML map configuration loading.

use std::io::Write;

use station_common::{MapConfig, MapError, MeasurementLayer, ValueRange};

#[test]
fn test_empty_document_uses_defaults() {
    let config = MapConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, MapConfig::default());
    assert_eq!(config.ranges.temperature_padding, 4.0);
    assert_eq!(config.ranges.pressure_half_span, 5.0);
    assert_eq!(config.wind.gust_cap, 25.0);
    assert_eq!(config.initial_layer, MeasurementLayer::Temperature);
}

#[test]
fn test_partial_override() {
    let yaml = r#"
initial_layer: pressure
view:
  zoom: 9
ranges:
  pressure_half_span: 7.5
  pressure_default_window:
    min: 960
    max: 1040
glow:
  max_radius: 300
"#;

    let config = MapConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.initial_layer, MeasurementLayer::Pressure);
    assert_eq!(config.view.zoom, 9.0);
    // untouched fields keep their defaults
    assert_eq!(config.view.min_zoom, 5.0);
    assert_eq!(config.ranges.temperature_padding, 4.0);
    assert_eq!(config.ranges.pressure_half_span, 7.5);
    assert_eq!(config.ranges.pressure_default_window, ValueRange::new(960.0, 1040.0));
    assert_eq!(config.glow.max_radius, 300.0);
    assert_eq!(config.glow.min_radius, 50.0);
}

#[test]
fn test_invalid_values_rejected() {
    let err = MapConfig::from_yaml_str("ranges:\n  temperature_padding: 0\n").unwrap_err();
    assert!(matches!(err, MapError::InvalidConfig(_)));

    let err = MapConfig::from_yaml_str("view:\n  zoom: 20\n").unwrap_err();
    assert!(matches!(err, MapError::InvalidConfig(_)));

    let err = MapConfig::from_yaml_str("glow:\n  min_radius: 400\n").unwrap_err();
    assert!(matches!(err, MapError::InvalidConfig(_)));
}

#[test]
fn test_malformed_yaml() {
    let err = MapConfig::from_yaml_str("initial_layer: humidity\n").unwrap_err();
    assert!(matches!(err, MapError::InvalidConfig(_)));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "wind:\n  gust_cap: 30").unwrap();

    let config = MapConfig::from_file(file.path()).unwrap();
    assert_eq!(config.wind.gust_cap, 30.0);
}

#[test]
fn test_missing_file() {
    let err = MapConfig::from_file("/nonexistent/map.yaml").unwrap_err();
    assert!(matches!(err, MapError::ConfigRead(_)));
}
