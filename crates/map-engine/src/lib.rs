//! Map engine boundary for the weather station map.
//!
//! The renderers never talk to a concrete map library. Everything they need
//! (panes, layer groups, markers, canvas surfaces, projection queries and
//! viewport events) goes through the [`MapEngine`] trait.
//!
//! [`HeadlessMap`] is a complete in-memory engine: it keeps marker state,
//! projects with spherical Web Mercator and backs canvases with real raster
//! buffers, so layers can be rendered and inspected without a browser.

pub mod canvas;
pub mod engine;
pub mod headless;
pub mod icon;
pub mod mercator;

pub use canvas::CanvasSurface;
pub use engine::{
    CanvasId, ClickHandler, LayerGroupId, MapEngine, MarkerId, TileLayerSpec, ViewEventKind,
    OVERLAY_PANE,
};
pub use headless::{HeadlessMap, MarkerState};
pub use icon::MarkerIcon;
