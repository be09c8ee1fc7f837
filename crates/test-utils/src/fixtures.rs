//! Common test fixtures for weather station map tests.
//!
//! Stations are modeled on the Dutch automatic weather station network so
//! positions fall inside the default map view.

use station_common::StationMeasurement;

/// A handful of real station locations (id, name, latitude, longitude).
pub mod locations {
    pub const DE_BILT: (&str, &str, f64, f64) = ("6260", "De Bilt", 52.10, 5.18);
    pub const SCHIPHOL: (&str, &str, f64, f64) = ("6240", "Schiphol", 52.32, 4.79);
    pub const ROTTERDAM: (&str, &str, f64, f64) = ("6344", "Rotterdam", 51.96, 4.45);
    pub const GRONINGEN: (&str, &str, f64, f64) = ("6280", "Groningen", 53.13, 6.59);
    pub const MAASTRICHT: (&str, &str, f64, f64) = ("6380", "Maastricht", 50.91, 5.77);
    pub const DEN_HELDER: (&str, &str, f64, f64) = ("6235", "De Kooy", 52.92, 4.78);

    pub const ALL: [(&str, &str, f64, f64); 6] =
        [DE_BILT, SCHIPHOL, ROTTERDAM, GRONINGEN, MAASTRICHT, DEN_HELDER];
}

/// A station with identity and position only, placed near De Bilt.
///
/// Stations created with different ids get slightly different positions.
pub fn station(id: &str) -> StationMeasurement {
    let offset = id.bytes().map(|b| b as f64).sum::<f64>() % 50.0 / 100.0;
    StationMeasurement::new(id, format!("Station {}", id), 52.1 + offset, 5.18 + offset)
}

/// Builder-style setters for station readings.
pub trait StationExt: Sized {
    fn with_temperature(self, value: f64) -> Self;
    fn with_wind(self, speed: f64, direction: Option<f64>, gusts: Option<f64>) -> Self;
    fn with_pressure(self, value: f64) -> Self;
    fn at(self, latitude: f64, longitude: f64) -> Self;
}

impl StationExt for StationMeasurement {
    fn with_temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    fn with_wind(mut self, speed: f64, direction: Option<f64>, gusts: Option<f64>) -> Self {
        self.wind_speed = Some(speed);
        self.wind_direction = direction;
        self.wind_gusts = gusts;
        self
    }

    fn with_pressure(mut self, value: f64) -> Self {
        self.air_pressure = Some(value);
        self
    }

    fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

/// The six fixture locations with every reading filled in.
pub fn dutch_stations() -> Vec<StationMeasurement> {
    locations::ALL
        .iter()
        .enumerate()
        .map(|(i, (id, name, lat, lon))| {
            let i = i as f64;
            StationMeasurement::new(*id, *name, *lat, *lon)
                .with_temperature(4.0 + i * 2.5)
                .with_wind(2.0 + i, Some(i * 45.0), Some(5.0 + i * 4.0))
                .with_pressure(1004.0 + i * 3.0)
        })
        .collect()
}

/// Stations where each layer has a gap: A has only temperature, B only wind,
/// C only pressure and D nothing at all.
pub fn partial_stations() -> Vec<StationMeasurement> {
    vec![
        station("A").with_temperature(10.0),
        station("B").with_wind(6.5, Some(270.0), None),
        station("C").with_pressure(1012.0),
        station("D"),
    ]
}

/// A snapshot JSON document in the backend's wire format.
pub const SNAPSHOT_JSON: &str = r#"{
  "stations": [
    {
      "id": "6260",
      "name": "Meetstation De Bilt",
      "region": "Utrecht",
      "latitude": 52.1,
      "longitude": 5.18,
      "timestamp": "2024-03-01T15:00:00+01:00",
      "temperature": 9.4,
      "windSpeed": 3.1,
      "windDirection": 240,
      "windGusts": 6.0,
      "airPressure": 1012.3
    },
    {
      "id": "6240",
      "name": "Meetstation Schiphol",
      "latitude": 52.32,
      "longitude": 4.79,
      "timestamp": "2024-03-01T15:00:00+01:00",
      "temperature": 8.1,
      "windSpeed": 5.4,
      "airPressure": null
    }
  ],
  "generatedAt": "2024-03-01T15:05:00+01:00"
}"#;
