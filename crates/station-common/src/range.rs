//! Normalization ranges computed from the live station set.

use serde::{Deserialize, Serialize};

use crate::{MeasurementLayer, RangeConfig, StationMeasurement};

/// An ordered (min, max) pair used to normalize readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range spanning `half_span` on either side of `midpoint`.
    pub fn centered(midpoint: f64, half_span: f64) -> Self {
        Self::new(midpoint - half_span, midpoint + half_span)
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Observed extremes over the finite values, or `None` if there are none.
    pub fn observed<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<ValueRange>, v| match acc {
                None => Some(ValueRange::new(v, v)),
                Some(r) => Some(ValueRange::new(r.min.min(v), r.max.max(v))),
            })
    }

    /// Observed range of one layer's readings across a station list.
    pub fn observed_for(stations: &[StationMeasurement], layer: MeasurementLayer) -> Option<Self> {
        Self::observed(stations.iter().filter_map(|s| s.reading(layer)))
    }
}

/// The per-layer ranges the orchestrator hands to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRanges {
    /// Observed midpoint ± padding, so one outlier cannot flatten the scale.
    pub temperature: Option<ValueRange>,
    /// Raw observed extremes.
    pub wind: Option<ValueRange>,
    /// Observed midpoint ± half-span; never empty.
    pub pressure: ValueRange,
}

impl LayerRanges {
    /// Recompute all three ranges from a station list.
    pub fn compute(stations: &[StationMeasurement], config: &RangeConfig) -> Self {
        Self {
            temperature: temperature_range(stations, config.temperature_padding),
            wind: ValueRange::observed_for(stations, MeasurementLayer::Wind),
            pressure: pressure_range(
                stations,
                config.pressure_half_span,
                config.pressure_default_window,
            ),
        }
    }

    /// Ranges used before any station data has arrived.
    pub fn empty(config: &RangeConfig) -> Self {
        Self::compute(&[], config)
    }

    /// Range handed to the given layer's renderer.
    pub fn for_layer(&self, layer: MeasurementLayer) -> Option<ValueRange> {
        match layer {
            MeasurementLayer::Temperature => self.temperature,
            MeasurementLayer::Wind => self.wind,
            MeasurementLayer::Pressure => Some(self.pressure),
        }
    }
}

/// Temperature range re-centered on the observed midpoint.
pub fn temperature_range(stations: &[StationMeasurement], padding: f64) -> Option<ValueRange> {
    ValueRange::observed_for(stations, MeasurementLayer::Temperature)
        .map(|raw| ValueRange::centered(raw.midpoint(), padding))
}

/// Pressure range re-centered on the observed midpoint.
///
/// Without any pressure readings the midpoint of `default_window` is used, so
/// the result is always a usable range.
pub fn pressure_range(
    stations: &[StationMeasurement],
    half_span: f64,
    default_window: ValueRange,
) -> ValueRange {
    let midpoint = ValueRange::observed_for(stations, MeasurementLayer::Pressure)
        .unwrap_or(default_window)
        .midpoint();
    ValueRange::centered(midpoint, half_span)
}
