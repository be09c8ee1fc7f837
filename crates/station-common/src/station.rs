//! Station measurement model as delivered by the weather backend.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{LatLng, MapError, MapResult, MeasurementLayer};

/// One weather station and its latest readings.
///
/// All readings are optional. The producer is expected to have dropped NaN and
/// infinite values already, but consumers should still go through
/// [`StationMeasurement::reading`], which only yields finite numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationMeasurement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub weather_description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub ground_temperature: Option<f64>,
    #[serde(default)]
    pub feel_temperature: Option<f64>,
    /// Wind speed in m/s
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_beaufort: Option<f64>,
    /// Direction the wind blows from, in degrees
    #[serde(default)]
    pub wind_direction: Option<f64>,
    #[serde(default)]
    pub wind_direction_text: Option<String>,
    /// Gust speed in m/s
    #[serde(default)]
    pub wind_gusts: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Air pressure in hPa
    #[serde(default)]
    pub air_pressure: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub rain_last_hour: Option<f64>,
    #[serde(default)]
    pub rain_last24_hours: Option<f64>,
    #[serde(default)]
    pub sun_power: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl StationMeasurement {
    /// Create a station with identity and position only.
    pub fn new(id: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            ..Default::default()
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// The reading a layer visualizes, if present and finite.
    pub fn reading(&self, layer: MeasurementLayer) -> Option<f64> {
        let value = match layer {
            MeasurementLayer::Temperature => self.temperature,
            MeasurementLayer::Wind => self.wind_speed,
            MeasurementLayer::Pressure => self.air_pressure,
        };
        value.filter(|v| v.is_finite())
    }

    /// Whether this station takes part in the given layer's rendering.
    pub fn is_valid_for(&self, layer: MeasurementLayer) -> bool {
        self.reading(layer).is_some()
    }
}

/// A complete station list as published by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSnapshot {
    pub stations: Vec<StationMeasurement>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

impl StationSnapshot {
    /// Parse a snapshot from its JSON representation.
    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MapError::InvalidSnapshot(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Number of stations valid for the given layer.
    pub fn count_valid(&self, layer: MeasurementLayer) -> usize {
        self.stations.iter().filter(|s| s.is_valid_for(layer)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_filters_non_finite() {
        let mut station = StationMeasurement::new("6260", "De Bilt", 52.1, 5.18);
        station.temperature = Some(f64::NAN);
        station.wind_speed = Some(4.2);
        station.air_pressure = Some(f64::INFINITY);

        assert_eq!(station.reading(MeasurementLayer::Temperature), None);
        assert_eq!(station.reading(MeasurementLayer::Wind), Some(4.2));
        assert!(!station.is_valid_for(MeasurementLayer::Pressure));
    }

    #[test]
    fn test_parse_camel_case_snapshot() {
        let json = r#"{
            "stations": [
                {
                    "id": "6260",
                    "name": "Meetstation De Bilt",
                    "latitude": 52.1,
                    "longitude": 5.18,
                    "timestamp": "2024-03-01T12:00:00",
                    "temperature": 9.4,
                    "windSpeed": 3.1,
                    "windGusts": 6.0,
                    "airPressure": null
                }
            ],
            "generatedAt": "2024-03-01T12:05:00+01:00"
        }"#;

        let snapshot = StationSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.stations.len(), 1);
        let station = &snapshot.stations[0];
        assert_eq!(station.wind_gusts, Some(6.0));
        assert_eq!(station.air_pressure, None);
        assert_eq!(snapshot.generated_at.as_deref(), Some("2024-03-01T12:05:00+01:00"));
        assert_eq!(snapshot.count_valid(MeasurementLayer::Temperature), 1);
        assert_eq!(snapshot.count_valid(MeasurementLayer::Pressure), 0);
    }

    #[test]
    fn test_malformed_snapshot_is_error() {
        let err = StationSnapshot::from_json("{\"stations\": 3}").unwrap_err();
        assert!(matches!(err, MapError::InvalidSnapshot(_)));
    }
}
