//! Temperature layer: flag markers plus the glow overlay.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use map_engine::{MapEngine, MarkerIcon, MarkerId};
use station_common::{GlowConfig, MeasurementLayer, StationMeasurement, ValueRange};

use crate::color::temperature_to_rgb;
use crate::layer::{LayerRenderer, Lifecycle, RenderPayload};
use crate::markers::{format_reading, MarkerLayer};
use crate::overlay::{GlowOverlay, GlowPoint};

const LAYER: MeasurementLayer = MeasurementLayer::Temperature;

/// Renders temperature as colored flags and a glow overlay in the
/// `temperature` pane.
#[derive(Debug)]
pub struct TemperatureRenderer {
    markers: MarkerLayer,
    overlay: Option<GlowOverlay>,
    last_payload: Option<RenderPayload>,
    glow: GlowConfig,
}

impl TemperatureRenderer {
    pub fn new(glow: GlowConfig) -> Self {
        Self {
            markers: MarkerLayer::new(LAYER),
            overlay: None,
            last_payload: None,
            glow,
        }
    }

    pub fn marker_for(&self, station_id: &str) -> Option<MarkerId> {
        self.markers.marker_for(station_id)
    }

    /// The overlay currently on the map, if any.
    pub fn overlay(&self) -> Option<&GlowOverlay> {
        self.overlay.as_ref()
    }

    /// Rebuild the overlay from the valid stations, or tear it down when there
    /// is nothing to paint.
    fn update_overlay(&mut self, map: &mut dyn MapEngine, points: &[GlowPoint], range: Option<ValueRange>) {
        let Some(range) = range.filter(|_| !points.is_empty()) else {
            self.destroy_overlay(map);
            return;
        };

        let colorize = move |t| temperature_to_rgb(Some(t), Some(range));
        if let Some(overlay) = self.overlay.as_mut() {
            if overlay.update(map, points, colorize, &self.glow).is_some() {
                return;
            }
            debug!("Temperature overlay canvas lost, recreating");
            self.overlay = None;
        }

        self.overlay = GlowOverlay::create(map, LAYER.pane_name());
        if let Some(overlay) = self.overlay.as_mut() {
            if overlay.update(map, points, colorize, &self.glow).is_none() {
                self.overlay = None;
            }
        }
    }

    fn destroy_overlay(&mut self, map: &mut dyn MapEngine) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.destroy(map);
            debug!("Removed temperature overlay");
        }
    }
}

impl Default for TemperatureRenderer {
    fn default() -> Self {
        Self::new(GlowConfig::default())
    }
}

fn glow_points(payload: &RenderPayload) -> Vec<GlowPoint> {
    payload
        .valid_stations(LAYER)
        .filter_map(|s| {
            s.reading(LAYER).map(|value| GlowPoint {
                position: s.position(),
                value,
            })
        })
        .collect()
}

/// Flag icon colored by the station's temperature.
pub fn flag_icon(station: &StationMeasurement, range: Option<ValueRange>) -> MarkerIcon {
    let temperature = station.reading(LAYER);
    let color = temperature_to_rgb(temperature, range).to_css();
    let label = match temperature {
        Some(t) => format!("{}&deg;", format_reading(t, 1)),
        None => "--".to_string(),
    };

    let html = format!(
        concat!(
            r#"<div class="marker temperature-marker flag-mode" style="--marker-color: {color}">"#,
            r#"<div class="flag-pole"></div>"#,
            r#"<div class="flag-body"><span class="marker-value">{label}</span></div>"#,
            r#"</div>"#
        ),
        color = color,
        label = label,
    );

    MarkerIcon::new("weather-marker measurement-temperature style-flag", html)
        .with_size(64, 44)
        .with_anchor(12, 30)
}

impl LayerRenderer for TemperatureRenderer {
    fn layer(&self) -> MeasurementLayer {
        LAYER
    }

    fn init(&mut self, map: &mut dyn MapEngine) {
        self.markers.attach(map);
    }

    fn render(&mut self, map: &mut dyn MapEngine, payload: &RenderPayload) {
        if !self.markers.is_attached() {
            return;
        }
        self.last_payload = Some(payload.clone());

        let points = glow_points(payload);
        self.update_overlay(map, &points, payload.range);

        let range = payload.range;
        self.markers.sync(map, payload, |station| flag_icon(station, range));
        trace!(markers = self.markers.len(), overlay = self.overlay.is_some(), "Rendered temperature layer");
    }

    fn on_view_change(&mut self, map: &mut dyn MapEngine) {
        if !self.markers.is_attached() {
            return;
        }
        let Some(payload) = self.last_payload.as_ref() else {
            return;
        };
        let points = glow_points(payload);
        let range = payload.range;
        self.update_overlay(map, &points, range);
    }

    fn clear(&mut self, map: &mut dyn MapEngine) {
        self.markers.clear(map);
        self.destroy_overlay(map);
        self.last_payload = None;
    }

    fn destroy(&mut self, map: &mut dyn MapEngine) {
        if self.is_destroyed() {
            return;
        }
        self.clear(map);
        self.markers.detach(map);
    }

    fn marker_keys(&self) -> BTreeSet<&str> {
        self.markers.keys()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.markers.lifecycle()
    }

    fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_icon_layout() {
        let mut station = StationMeasurement::new("6260", "De Bilt", 52.1, 5.18);
        station.temperature = Some(12.34);

        let icon = flag_icon(&station, Some(ValueRange::new(6.0, 14.0)));
        assert_eq!(icon.class_name, "weather-marker measurement-temperature style-flag");
        assert_eq!(icon.size, (64, 44));
        assert_eq!(icon.anchor, (12, 30));
        assert!(icon.html.contains(r#"<span class="marker-value">12.3&deg;</span>"#));
        assert!(icon.html.contains("--marker-color: rgb("));
    }

    #[test]
    fn test_flag_icon_without_range_is_neutral() {
        let mut station = StationMeasurement::new("1", "A", 52.0, 5.0);
        station.temperature = Some(3.0);

        let icon = flag_icon(&station, None);
        assert!(icon.html.contains("--marker-color: rgb(148, 163, 184)"));
    }
}
