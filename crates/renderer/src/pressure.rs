//! Pressure layer: bubbles sized by the reading.

use std::collections::BTreeSet;

use tracing::trace;

use map_engine::{MapEngine, MarkerIcon, MarkerId};
use station_common::{MeasurementLayer, StationMeasurement, ValueRange};

use crate::color::{normalize, pressure_to_rgb};
use crate::layer::{LayerRenderer, Lifecycle, RenderPayload};
use crate::markers::{format_reading, MarkerLayer};

const LAYER: MeasurementLayer = MeasurementLayer::Pressure;

/// Smallest bubble diameter in pixels.
pub const MIN_BUBBLE_SIZE: f64 = 20.0;
/// Diameter added at the top of the range.
pub const BUBBLE_SIZE_SPAN: f64 = 24.0;
/// Diameter used when the reading cannot be placed in a range.
pub const DEFAULT_BUBBLE_SIZE: f64 = 44.0;
/// Room around the bubble for the label.
const ICON_PADDING: f64 = 30.0;

/// Renders pressure as bubbles in the `pressure` pane.
#[derive(Debug)]
pub struct PressureRenderer {
    markers: MarkerLayer,
}

impl PressureRenderer {
    pub fn new() -> Self {
        Self {
            markers: MarkerLayer::new(LAYER),
        }
    }

    pub fn marker_for(&self, station_id: &str) -> Option<MarkerId> {
        self.markers.marker_for(station_id)
    }
}

impl Default for PressureRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bubble diameter for a reading.
pub fn bubble_size(pressure: Option<f64>, range: Option<ValueRange>) -> f64 {
    match (pressure.filter(|p| p.is_finite()), range) {
        (Some(p), Some(range)) => {
            MIN_BUBBLE_SIZE + normalize(p, range.min, range.max) * BUBBLE_SIZE_SPAN
        }
        _ => DEFAULT_BUBBLE_SIZE,
    }
}

/// Bubble icon for a station.
///
/// Size follows the payload range; color follows the fixed regional window.
pub fn bubble_icon(station: &StationMeasurement, range: Option<ValueRange>) -> MarkerIcon {
    let pressure = station.reading(LAYER);
    let size = bubble_size(pressure, range);
    let color = pressure_to_rgb(pressure, None).to_css();
    let label = match pressure {
        Some(p) => format!("{} hPa", format_reading(p, 0)),
        None => "--".to_string(),
    };

    let html = format!(
        concat!(
            r#"<div class="marker pressure-marker" style="--bubble-size: {size}px; --bubble-color: {color}">"#,
            r#"<div class="pressure-circle"></div>"#,
            r#"<span class="marker-value">{label}</span>"#,
            r#"</div>"#
        ),
        size = size,
        color = color,
        label = label,
    );

    let edge = (size + ICON_PADDING).round() as u32;
    MarkerIcon::new("weather-marker measurement-pressure", html)
        .with_size(edge, edge)
        .centered()
}

impl LayerRenderer for PressureRenderer {
    fn layer(&self) -> MeasurementLayer {
        LAYER
    }

    fn init(&mut self, map: &mut dyn MapEngine) {
        self.markers.attach(map);
    }

    fn render(&mut self, map: &mut dyn MapEngine, payload: &RenderPayload) {
        let range = payload.range;
        self.markers.sync(map, payload, |station| bubble_icon(station, range));
        trace!(markers = self.markers.len(), "Rendered pressure layer");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_size_bounds() {
        let range = Some(ValueRange::new(1005.0, 1015.0));
        assert_eq!(bubble_size(Some(1005.0), range), 20.0);
        assert_eq!(bubble_size(Some(1015.0), range), 44.0);
        assert_eq!(bubble_size(Some(1010.0), range), 32.0);
        assert_eq!(bubble_size(Some(990.0), range), 20.0);
        assert_eq!(bubble_size(Some(1010.0), None), DEFAULT_BUBBLE_SIZE);
        assert_eq!(bubble_size(None, range), DEFAULT_BUBBLE_SIZE);
    }

    #[test]
    fn test_bubble_icon() {
        let mut station = StationMeasurement::new("6344", "Rotterdam", 51.96, 4.45);
        station.air_pressure = Some(1010.4);

        let icon = bubble_icon(&station, Some(ValueRange::new(1005.0, 1015.0)));
        assert_eq!(icon.class_name, "weather-marker measurement-pressure");
        assert!(icon.html.contains("1010 hPa"));
        assert!(icon.html.contains("--bubble-color: rgb("));
        let (w, h) = icon.size;
        assert_eq!(w, h);
        assert_eq!(icon.anchor, ((w as i32 + 1) / 2, (h as i32 + 1) / 2));
    }
}
