//! Tests for per-layer range computation.

use station_common::range::{pressure_range, temperature_range};
use station_common::{LayerRanges, MeasurementLayer, RangeConfig, StationMeasurement, ValueRange};

fn station(id: &str) -> StationMeasurement {
    StationMeasurement::new(id, format!("Station {}", id), 52.0, 5.0)
}

fn with_temperature(id: &str, t: f64) -> StationMeasurement {
    StationMeasurement {
        temperature: Some(t),
        ..station(id)
    }
}

fn with_pressure(id: &str, p: f64) -> StationMeasurement {
    StationMeasurement {
        air_pressure: Some(p),
        ..station(id)
    }
}

// ============================================================================
// Temperature range tests
// ============================================================================

#[test]
fn test_temperature_range_is_recentered() {
    let stations = vec![with_temperature("A", 2.0), with_temperature("B", 18.0)];
    let range = temperature_range(&stations, 4.0).unwrap();

    // midpoint 10, ±4 regardless of how far the extremes are
    assert_eq!(range, ValueRange::new(6.0, 14.0));
}

#[test]
fn test_temperature_range_ignores_outlier_distance() {
    let narrow = vec![with_temperature("A", 9.0), with_temperature("B", 11.0)];
    let wide = vec![with_temperature("A", -30.0), with_temperature("B", 50.0)];

    assert_eq!(temperature_range(&narrow, 4.0), temperature_range(&wide, 4.0));
}

#[test]
fn test_temperature_range_empty() {
    let stations = vec![station("A"), station("B")];
    assert!(temperature_range(&stations, 4.0).is_none());
}

#[test]
fn test_temperature_range_single_station() {
    let stations = vec![with_temperature("A", 7.0)];
    assert_eq!(temperature_range(&stations, 4.0), Some(ValueRange::new(3.0, 11.0)));
}

// ============================================================================
// Pressure range tests
// ============================================================================

#[test]
fn test_pressure_range_observed() {
    let stations = vec![with_pressure("A", 1000.0), with_pressure("B", 1020.0)];
    let range = pressure_range(&stations, 5.0, ValueRange::new(980.0, 1045.0));
    assert_eq!(range, ValueRange::new(1005.0, 1015.0));
}

#[test]
fn test_pressure_range_falls_back_to_default_window() {
    let stations = vec![with_temperature("A", 10.0)];
    let range = pressure_range(&stations, 5.0, ValueRange::new(980.0, 1045.0));
    assert_eq!(range, ValueRange::new(1007.5, 1017.5));
}

#[test]
fn test_pressure_range_skips_non_finite() {
    let stations = vec![
        with_pressure("A", 1000.0),
        with_pressure("B", f64::NAN),
        with_pressure("C", 1010.0),
    ];
    let range = pressure_range(&stations, 5.0, ValueRange::new(980.0, 1045.0));
    assert_eq!(range, ValueRange::new(1000.0, 1010.0));
}

// ============================================================================
// LayerRanges tests
// ============================================================================

#[test]
fn test_layer_ranges_compute() {
    let stations = vec![
        StationMeasurement {
            temperature: Some(4.0),
            wind_speed: Some(2.0),
            air_pressure: Some(1012.0),
            ..station("A")
        },
        StationMeasurement {
            temperature: Some(12.0),
            wind_speed: Some(11.0),
            ..station("B")
        },
    ];

    let ranges = LayerRanges::compute(&stations, &RangeConfig::default());
    assert_eq!(ranges.temperature, Some(ValueRange::new(4.0, 12.0)));
    assert_eq!(ranges.wind, Some(ValueRange::new(2.0, 11.0)));
    assert_eq!(ranges.pressure, ValueRange::new(1007.0, 1017.0));

    assert_eq!(ranges.for_layer(MeasurementLayer::Wind), ranges.wind);
    assert_eq!(ranges.for_layer(MeasurementLayer::Pressure), Some(ranges.pressure));
}

#[test]
fn test_layer_ranges_empty() {
    let ranges = LayerRanges::empty(&RangeConfig::default());
    assert!(ranges.temperature.is_none());
    assert!(ranges.wind.is_none());
    assert_eq!(ranges.pressure, ValueRange::new(1007.5, 1017.5));
}
