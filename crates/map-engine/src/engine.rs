//! The `MapEngine` trait and its handle types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use station_common::{LatLng, MapResult, Point, Size};

use crate::{CanvasSurface, MarkerIcon};

/// Pane every engine provides for generic overlays.
pub const OVERLAY_PANE: &str = "overlayPane";

/// Callback fired when a marker is clicked.
///
/// Rendering is single-threaded, so handlers are reference counted rather
/// than `Send`.
pub type ClickHandler = Rc<dyn Fn()>;

macro_rules! handle_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

handle_id!(
    /// Handle to a group of markers added to the map together.
    LayerGroupId
);
handle_id!(
    /// Handle to a single marker.
    MarkerId
);
handle_id!(
    /// Handle to a canvas element living inside a pane.
    CanvasId
);

/// Viewport changes a map can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewEventKind {
    MoveEnd,
    ZoomEnd,
    Resize,
}

impl ViewEventKind {
    pub const ALL: [ViewEventKind; 3] =
        [ViewEventKind::MoveEnd, ViewEventKind::ZoomEnd, ViewEventKind::Resize];

    /// Engine-side event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewEventKind::MoveEnd => "moveend",
            ViewEventKind::ZoomEnd => "zoomend",
            ViewEventKind::Resize => "resize",
        }
    }
}

impl fmt::Display for ViewEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basemap tile source request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerSpec {
    pub url_template: String,
    pub subdomains: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

/// Operations the weather layers need from an interactive map.
///
/// Implementations own tile rendering, pan/zoom handling and element
/// placement. Renderers only ever mutate content they created themselves.
pub trait MapEngine {
    // === View ===

    /// Center the map on `center` at `zoom`.
    fn set_view(&mut self, center: LatLng, zoom: f64);

    fn zoom(&self) -> f64;

    /// Viewport size in CSS pixels.
    fn size(&self) -> Size;

    fn device_pixel_ratio(&self) -> f64;

    /// Project a coordinate to pixels relative to the map container.
    fn lat_lng_to_container_point(&self, position: LatLng) -> Point;

    /// Convert a container point to the coordinate space of panes.
    fn container_point_to_layer_point(&self, point: Point) -> Point;

    // === Base map ===

    fn add_tile_layer(&mut self, tiles: &TileLayerSpec);

    /// Replace the attribution control's content. `None` empties it.
    fn set_attribution(&mut self, html: Option<&str>);

    // === Panes ===

    /// Create a named pane. Creating an existing pane is a no-op.
    fn create_pane(&mut self, name: &str, class_name: &str) -> MapResult<()>;

    fn has_pane(&self, name: &str) -> bool;

    // === Markers ===

    /// Add an empty layer group, placed in `pane` when given.
    fn add_layer_group(&mut self, pane: Option<&str>) -> MapResult<LayerGroupId>;

    /// Remove a group and every marker in it.
    fn remove_layer_group(&mut self, group: LayerGroupId);

    /// Remove every marker in a group, keeping the group attached.
    fn clear_layer_group(&mut self, group: LayerGroupId);

    fn add_marker(
        &mut self,
        group: LayerGroupId,
        position: LatLng,
        icon: MarkerIcon,
        on_click: ClickHandler,
    ) -> MapResult<MarkerId>;

    /// Move a marker and swap its icon in place.
    fn update_marker(&mut self, marker: MarkerId, position: LatLng, icon: MarkerIcon)
        -> MapResult<()>;

    /// Add or remove a CSS class on the marker element.
    fn toggle_marker_class(&mut self, marker: MarkerId, class_name: &str, enabled: bool);

    fn remove_marker(&mut self, marker: MarkerId);

    // === Canvas ===

    /// Create a canvas element inside `pane`.
    fn create_canvas(&mut self, pane: &str, class_name: &str) -> MapResult<CanvasId>;

    fn canvas_mut(&mut self, canvas: CanvasId) -> Option<&mut CanvasSurface>;

    fn remove_canvas(&mut self, canvas: CanvasId);

    // === Events ===

    fn subscribe(&mut self, kind: ViewEventKind);

    fn unsubscribe(&mut self, kind: ViewEventKind);

    /// Take the subscribed viewport events raised since the last call.
    fn drain_view_events(&mut self) -> Vec<ViewEventKind>;

    // === Lifecycle ===

    /// Tear the map down. Every later call is a no-op or fails with
    /// `MapError::MapRemoved`.
    fn remove(&mut self);
}
