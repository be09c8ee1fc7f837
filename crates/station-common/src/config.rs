//! Map and layer configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the stock Netherlands view with the standard layer tuning.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{LatLng, MapError, MapResult, MeasurementLayer, ValueRange};

/// Root configuration for a weather map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub basemap: BasemapConfig,
    pub ranges: RangeConfig,
    pub wind: WindConfig,
    pub glow: GlowConfig,
    /// Layer activated when the map is mounted.
    pub initial_layer: MeasurementLayer,
}

impl MapConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> MapResult<Self> {
        let config: MapConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MapError::ConfigRead(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml_str(&content)?;
        debug!(path = %path.display(), "Loaded map config");
        Ok(config)
    }

    /// Check the numeric invariants the renderers rely on.
    pub fn validate(&self) -> MapResult<()> {
        let view = &self.view;
        if !view.center.is_finite() {
            return Err(MapError::InvalidConfig("view.center must be finite".into()));
        }
        if !(view.min_zoom <= view.zoom && view.zoom <= view.max_zoom) {
            return Err(MapError::InvalidConfig(format!(
                "view.zoom {} outside [{}, {}]",
                view.zoom, view.min_zoom, view.max_zoom
            )));
        }

        let ranges = &self.ranges;
        if !(ranges.temperature_padding.is_finite() && ranges.temperature_padding > 0.0) {
            return Err(MapError::InvalidConfig(
                "ranges.temperature_padding must be positive".into(),
            ));
        }
        if !(ranges.pressure_half_span.is_finite() && ranges.pressure_half_span > 0.0) {
            return Err(MapError::InvalidConfig(
                "ranges.pressure_half_span must be positive".into(),
            ));
        }
        let window = ranges.pressure_default_window;
        if !(window.min.is_finite() && window.max.is_finite() && window.min < window.max) {
            return Err(MapError::InvalidConfig(
                "ranges.pressure_default_window must be an increasing finite pair".into(),
            ));
        }

        if !(self.wind.gust_cap.is_finite() && self.wind.gust_cap > 0.0) {
            return Err(MapError::InvalidConfig("wind.gust_cap must be positive".into()));
        }

        let glow = &self.glow;
        if !(glow.min_radius > 0.0 && glow.min_radius <= glow.max_radius) {
            return Err(MapError::InvalidConfig(format!(
                "glow radius bounds [{}, {}] are invalid",
                glow.min_radius, glow.max_radius
            )));
        }
        if !(0.0..=1.0).contains(&glow.alpha) {
            return Err(MapError::InvalidConfig("glow.alpha must be within [0, 1]".into()));
        }

        Ok(())
    }
}

/// Initial viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(52.1, 5.29),
            zoom: 8.0,
            min_zoom: 5.0,
            max_zoom: 16.0,
        }
    }
}

/// Basemap tile source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasemapConfig {
    pub url_template: String,
    pub subdomains: String,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png".to_string(),
            subdomains: "abcd".to_string(),
        }
    }
}

/// Normalization range tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Degrees on either side of the observed temperature midpoint
    pub temperature_padding: f64,
    /// hPa on either side of the observed pressure midpoint
    pub pressure_half_span: f64,
    /// Typical sea-level pressure spread, used when no station reports pressure
    pub pressure_default_window: ValueRange,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            temperature_padding: 4.0,
            pressure_half_span: 5.0,
            pressure_default_window: ValueRange::new(980.0, 1045.0),
        }
    }
}

/// Wind marker tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Upper bound for the gust-derived marker strength (m/s)
    pub gust_cap: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self { gust_cap: 25.0 }
    }
}

/// Temperature glow overlay tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    /// Blob radius in CSS pixels at `reference_zoom`
    pub base_radius: f64,
    pub reference_zoom: f64,
    /// Radius doubles every `1 / zoom_exponent` zoom levels
    pub zoom_exponent: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Global alpha applied on top of the stop alphas
    pub alpha: f64,
    pub center_alpha: f64,
    pub mid_alpha: f64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            base_radius: 120.0,
            reference_zoom: 7.0,
            zoom_exponent: 0.25,
            min_radius: 50.0,
            max_radius: 260.0,
            alpha: 0.65,
            center_alpha: 0.45,
            mid_alpha: 0.18,
        }
    }
}

impl GlowConfig {
    /// Blob radius for the given zoom level, clamped to the configured bounds.
    pub fn radius_at(&self, zoom: f64) -> f64 {
        let scale = 2f64.powf((zoom - self.reference_zoom) * self.zoom_exponent);
        let radius = self.base_radius * scale;
        if radius.is_finite() {
            radius.clamp(self.min_radius, self.max_radius)
        } else {
            self.base_radius.clamp(self.min_radius, self.max_radius)
        }
    }
}
