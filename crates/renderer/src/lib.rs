//! Multi-layer rendering of weather station measurements on a map.
//!
//! Three measurement layers share one map:
//! - Temperature: colored flag markers plus an additive glow overlay
//! - Wind: arrow markers rotated to the wind direction
//! - Pressure: bubbles sized by the reading
//!
//! [`WeatherMap`] owns the map engine and the renderers, keeps the normalization
//! ranges current and routes data, layer, selection and viewport changes to the
//! active renderer.

pub mod color;
pub mod layer;
pub mod markers;
pub mod orchestrator;
pub mod overlay;
pub mod pressure;
pub mod temperature;
pub mod wind;

pub use color::{
    hsl_to_rgb, normalize, pressure_to_rgb, rgb_to_css, temperature_to_rgb, ColorScale, Rgb,
};
pub use layer::{LayerRenderer, Lifecycle, RenderPayload, StationSelectFn};
pub use markers::{format_reading, MarkerLayer, SELECTED_CLASS};
pub use orchestrator::{MapSummary, SelectionHandler, WeatherMap};
pub use overlay::{paint_glows, Glow, GlowOverlay, GlowPoint, GLOW_CANVAS_CLASS};
pub use pressure::PressureRenderer;
pub use temperature::TemperatureRenderer;
pub use wind::WindRenderer;
