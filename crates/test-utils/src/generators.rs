//! Synthetic station generators for larger test and benchmark inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use station_common::StationMeasurement;

/// Bounding box (south, west, north, east) roughly covering the Netherlands.
pub const NETHERLANDS: (f64, f64, f64, f64) = (50.75, 3.35, 53.55, 7.25);

/// Creates a `rows` x `cols` grid of stations spread evenly over `bounds`.
///
/// Station `r{row}c{col}` gets temperature `row + col`, wind speed
/// `col as f64` blowing from `row * 30` degrees, and pressure
/// `1000 + row * 2`, so every reading is predictable from the id.
pub fn create_station_grid(
    rows: usize,
    cols: usize,
    bounds: (f64, f64, f64, f64),
) -> Vec<StationMeasurement> {
    let (south, west, north, east) = bounds;
    let lat_step = if rows > 1 { (north - south) / (rows - 1) as f64 } else { 0.0 };
    let lon_step = if cols > 1 { (east - west) / (cols - 1) as f64 } else { 0.0 };

    let mut stations = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let id = format!("r{}c{}", row, col);
            let mut station = StationMeasurement::new(
                id.clone(),
                id,
                south + row as f64 * lat_step,
                west + col as f64 * lon_step,
            );
            station.temperature = Some((row + col) as f64);
            station.wind_speed = Some(col as f64);
            station.wind_direction = Some((row * 30 % 360) as f64);
            station.air_pressure = Some(1000.0 + row as f64 * 2.0);
            stations.push(station);
        }
    }
    stations
}

/// Creates `count` stations at random positions inside `bounds`.
///
/// The same seed always yields the same stations. Roughly one station in ten
/// lacks a temperature and one in eight lacks a pressure reading.
pub fn create_scattered_stations(
    count: usize,
    bounds: (f64, f64, f64, f64),
    seed: u64,
) -> Vec<StationMeasurement> {
    let (south, west, north, east) = bounds;
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let id = format!("s{:05}", i);
            let mut station = StationMeasurement::new(
                id.clone(),
                id,
                rng.gen_range(south..=north),
                rng.gen_range(west..=east),
            );
            if rng.gen_ratio(9, 10) {
                station.temperature = Some(rng.gen_range(-5.0..25.0));
            }
            let speed: f64 = rng.gen_range(0.0..20.0);
            station.wind_speed = Some(speed);
            station.wind_direction = Some(rng.gen_range(0.0..360.0));
            station.wind_gusts = Some(speed + rng.gen_range(0.0..15.0));
            if rng.gen_ratio(7, 8) {
                station.air_pressure = Some(rng.gen_range(985.0..1035.0));
            }
            station
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_values_follow_position() {
        let stations = create_station_grid(3, 4, NETHERLANDS);
        assert_eq!(stations.len(), 12);

        let last = &stations[11];
        assert_eq!(last.id, "r2c3");
        assert_eq!(last.temperature, Some(5.0));
        assert_eq!(last.air_pressure, Some(1004.0));
        assert!((last.latitude - NETHERLANDS.2).abs() < 1e-9);
        assert!((last.longitude - NETHERLANDS.3).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_grid() {
        let stations = create_station_grid(1, 1, NETHERLANDS);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].latitude, NETHERLANDS.0);
    }

    #[test]
    fn test_scattered_is_deterministic() {
        let a = create_scattered_stations(50, NETHERLANDS, 7);
        let b = create_scattered_stations(50, NETHERLANDS, 7);
        assert_eq!(a, b);

        let (south, west, north, east) = NETHERLANDS;
        assert!(a.iter().all(|s| {
            (south..=north).contains(&s.latitude) && (west..=east).contains(&s.longitude)
        }));
    }
}
