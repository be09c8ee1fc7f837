//! Wind layer: rotated arrow markers.

use std::collections::BTreeSet;

use tracing::trace;

use map_engine::{MapEngine, MarkerIcon, MarkerId};
use station_common::{MeasurementLayer, StationMeasurement, WindConfig};

use crate::layer::{LayerRenderer, Lifecycle, RenderPayload};
use crate::markers::{format_reading, MarkerLayer};

const LAYER: MeasurementLayer = MeasurementLayer::Wind;

/// Renders wind as arrows pointing along the wind direction, in the `wind`
/// pane.
#[derive(Debug)]
pub struct WindRenderer {
    markers: MarkerLayer,
    gust_cap: f64,
}

impl WindRenderer {
    pub fn new(config: &WindConfig) -> Self {
        Self {
            markers: MarkerLayer::new(LAYER),
            gust_cap: config.gust_cap,
        }
    }

    pub fn marker_for(&self, station_id: &str) -> Option<MarkerId> {
        self.markers.marker_for(station_id)
    }
}

impl Default for WindRenderer {
    fn default() -> Self {
        Self::new(&WindConfig::default())
    }
}

/// Visual intensity of a station's wind: the gust speed (or the mean speed
/// when no gust is reported) capped at `gust_cap`.
pub fn wind_strength(station: &StationMeasurement, gust_cap: f64) -> f64 {
    let speed = station.reading(LAYER).unwrap_or(0.0);
    let gust = station
        .wind_gusts
        .filter(|g| g.is_finite())
        .unwrap_or(speed);
    gust.min(gust_cap)
}

/// Arrow icon rotated to the station's wind direction.
pub fn arrow_icon(station: &StationMeasurement, gust_cap: f64) -> MarkerIcon {
    let speed = station.reading(LAYER).unwrap_or(0.0);
    let direction = station
        .wind_direction
        .filter(|d| d.is_finite())
        .unwrap_or(0.0);
    let strength = wind_strength(station, gust_cap);

    let html = format!(
        concat!(
            r#"<div class="marker wind-marker" style="--wind-rotation: {direction}deg; --wind-speed: {strength}">"#,
            r#"<div class="wind-arrow"></div>"#,
            r#"<span class="marker-value">{speed} m/s</span>"#,
            r#"</div>"#
        ),
        direction = direction,
        strength = strength,
        speed = format_reading(speed, 1),
    );

    MarkerIcon::new("weather-marker measurement-wind", html)
        .with_size(60, 60)
        .centered()
}

impl LayerRenderer for WindRenderer {
    fn layer(&self) -> MeasurementLayer {
        LAYER
    }

    fn init(&mut self, map: &mut dyn MapEngine) {
        self.markers.attach(map);
    }

    fn render(&mut self, map: &mut dyn MapEngine, payload: &RenderPayload) {
        let gust_cap = self.gust_cap;
        self.markers.sync(map, payload, |station| arrow_icon(station, gust_cap));
        trace!(markers = self.markers.len(), "Rendered wind layer");
    }

    fn on_view_change(&mut self, _map: &mut dyn MapEngine) {}

    fn clear(&mut self, map: &mut dyn MapEngine) {
        self.markers.clear(map);
    }

    fn destroy(&mut self, map: &mut dyn MapEngine) {
        self.markers.detach(map);
    }

    fn marker_keys(&self) -> BTreeSet<&str> {
        self.markers.keys()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.markers.lifecycle()
    }
}
