//! In-memory map engine.
//!
//! `HeadlessMap` implements the full [`MapEngine`] contract without a display:
//! markers are kept as plain state, canvases are `tiny-skia` pixmaps and the
//! viewport follows Web Mercator math. It is what the test-suite and the
//! offline snapshot renderer drive.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace, warn};

use station_common::{LatLng, MapError, MapResult, Point, Size};

use crate::engine::{
    CanvasId, ClickHandler, LayerGroupId, MapEngine, MarkerId, TileLayerSpec, ViewEventKind,
    OVERLAY_PANE,
};
use crate::{mercator, CanvasSurface, MarkerIcon};

const TILE_PANE: &str = "tilePane";
const MARKER_PANE: &str = "markerPane";

/// A marker as the engine currently displays it.
#[derive(Clone)]
pub struct MarkerState {
    pub group: LayerGroupId,
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub classes: BTreeSet<String>,
    on_click: ClickHandler,
}

impl MarkerState {
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.contains(class_name)
    }
}

impl fmt::Debug for MarkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerState")
            .field("group", &self.group)
            .field("position", &self.position)
            .field("icon", &self.icon)
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct GroupState {
    pane: String,
    markers: BTreeSet<MarkerId>,
}

#[derive(Debug)]
struct CanvasEntry {
    pane: String,
    surface: CanvasSurface,
}

/// A display-less map with real projection and raster canvases.
pub struct HeadlessMap {
    center: LatLng,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    size: Size,
    device_pixel_ratio: f64,
    /// Position of the map pane relative to the container, moved by panning
    pane_offset: Point,
    panes: BTreeMap<String, String>,
    tile_layers: Vec<TileLayerSpec>,
    attribution: Option<String>,
    groups: HashMap<LayerGroupId, GroupState>,
    markers: HashMap<MarkerId, MarkerState>,
    canvases: HashMap<CanvasId, CanvasEntry>,
    subscriptions: HashSet<ViewEventKind>,
    pending_events: Vec<ViewEventKind>,
    next_id: u64,
    removed: bool,
}

impl HeadlessMap {
    /// Create a map with the given viewport size at device pixel ratio 1.
    pub fn new(size: Size) -> Self {
        let mut panes = BTreeMap::new();
        for pane in [TILE_PANE, OVERLAY_PANE, MARKER_PANE] {
            panes.insert(pane.to_string(), String::new());
        }

        Self {
            center: LatLng::new(0.0, 0.0),
            zoom: 0.0,
            min_zoom: 0.0,
            max_zoom: 18.0,
            size,
            device_pixel_ratio: 1.0,
            pane_offset: Point::default(),
            panes,
            tile_layers: Vec::new(),
            attribution: None,
            groups: HashMap::new(),
            markers: HashMap::new(),
            canvases: HashMap::new(),
            subscriptions: HashSet::new(),
            pending_events: Vec::new(),
            next_id: 1,
            removed: false,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
        self
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn emit(&mut self, kind: ViewEventKind) {
        if !self.removed && self.subscriptions.contains(&kind) {
            trace!(event = %kind, "Queued view event");
            self.pending_events.push(kind);
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.zoom
        }
    }

    // === Viewport interaction ===

    /// Pan by a pixel offset, as a drag gesture would.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if self.removed {
            return;
        }
        let center_px = mercator::project(self.center, self.zoom);
        self.center = mercator::unproject(center_px.offset(dx, dy), self.zoom);
        self.pane_offset = self.pane_offset.offset(-dx, -dy);
        self.emit(ViewEventKind::MoveEnd);
    }

    /// Zoom around the current center.
    pub fn set_zoom(&mut self, zoom: f64) {
        if self.removed {
            return;
        }
        let zoom = self.clamp_zoom(zoom);
        if zoom == self.zoom {
            return;
        }
        self.zoom = zoom;
        self.pane_offset = Point::default();
        self.emit(ViewEventKind::ZoomEnd);
        self.emit(ViewEventKind::MoveEnd);
    }

    /// Resize the map container.
    pub fn resize(&mut self, size: Size) {
        if self.removed || size == self.size {
            return;
        }
        self.size = size;
        self.emit(ViewEventKind::Resize);
    }

    /// Simulate a click on a marker. Returns whether a marker was hit.
    pub fn click_marker(&self, marker: MarkerId) -> bool {
        let handler = match self.markers.get(&marker) {
            Some(state) => state.on_click.clone(),
            None => return false,
        };
        handler();
        true
    }

    // === Inspection ===

    pub fn marker(&self, marker: MarkerId) -> Option<&MarkerState> {
        self.markers.get(&marker)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers whose layer group sits in `pane`.
    pub fn markers_in_pane(&self, pane: &str) -> Vec<&MarkerState> {
        self.markers
            .values()
            .filter(|m| {
                self.groups
                    .get(&m.group)
                    .map_or(false, |group| group.pane == pane)
            })
            .collect()
    }

    pub fn layer_group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn has_layer_group(&self, group: LayerGroupId) -> bool {
        self.groups.contains_key(&group)
    }

    pub fn canvas(&self, canvas: CanvasId) -> Option<&CanvasSurface> {
        self.canvases.get(&canvas).map(|entry| &entry.surface)
    }

    pub fn canvas_count(&self) -> usize {
        self.canvases.len()
    }

    pub fn canvases_in_pane(&self, pane: &str) -> Vec<&CanvasSurface> {
        self.canvases
            .values()
            .filter(|entry| entry.pane == pane)
            .map(|entry| &entry.surface)
            .collect()
    }

    /// Encode a canvas as PNG.
    pub fn canvas_png(&self, canvas: CanvasId) -> MapResult<Vec<u8>> {
        self.canvas(canvas)
            .ok_or_else(|| MapError::CanvasUnavailable(format!("canvas {} not found", canvas)))?
            .encode_png()
    }

    pub fn pane_class(&self, pane: &str) -> Option<&str> {
        self.panes.get(pane).map(String::as_str)
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }

    pub fn tile_layers(&self) -> &[TileLayerSpec] {
        &self.tile_layers
    }

    pub fn is_subscribed(&self, kind: ViewEventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl MapEngine for HeadlessMap {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        if self.removed {
            return;
        }
        let zoom = self.clamp_zoom(zoom);
        let zoom_changed = zoom != self.zoom;
        if center.is_finite() {
            self.center = center;
        }
        self.zoom = zoom;
        self.pane_offset = Point::default();
        if zoom_changed {
            self.emit(ViewEventKind::ZoomEnd);
        }
        self.emit(ViewEventKind::MoveEnd);
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn size(&self) -> Size {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn lat_lng_to_container_point(&self, position: LatLng) -> Point {
        let point = mercator::project(position, self.zoom);
        let center = mercator::project(self.center, self.zoom);
        Point::new(
            point.x - center.x + self.size.width / 2.0,
            point.y - center.y + self.size.height / 2.0,
        )
    }

    fn container_point_to_layer_point(&self, point: Point) -> Point {
        Point::new(point.x - self.pane_offset.x, point.y - self.pane_offset.y)
    }

    fn add_tile_layer(&mut self, tiles: &TileLayerSpec) {
        if self.removed {
            return;
        }
        if tiles.min_zoom <= tiles.max_zoom {
            self.min_zoom = tiles.min_zoom;
            self.max_zoom = tiles.max_zoom;
            self.zoom = self.clamp_zoom(self.zoom);
        } else {
            warn!(min = tiles.min_zoom, max = tiles.max_zoom, "Ignoring inverted zoom bounds");
        }
        self.tile_layers.push(tiles.clone());
    }

    fn set_attribution(&mut self, html: Option<&str>) {
        if self.removed {
            return;
        }
        self.attribution = html.map(str::to_string);
    }

    fn create_pane(&mut self, name: &str, class_name: &str) -> MapResult<()> {
        if self.removed {
            return Err(MapError::MapRemoved);
        }
        if !self.panes.contains_key(name) {
            debug!(pane = %name, "Created pane");
            self.panes.insert(name.to_string(), class_name.to_string());
        }
        Ok(())
    }

    fn has_pane(&self, name: &str) -> bool {
        self.panes.contains_key(name)
    }

    fn add_layer_group(&mut self, pane: Option<&str>) -> MapResult<LayerGroupId> {
        if self.removed {
            return Err(MapError::MapRemoved);
        }
        let pane = pane.unwrap_or(MARKER_PANE);
        if !self.panes.contains_key(pane) {
            return Err(MapError::PaneNotFound(pane.to_string()));
        }

        let id = LayerGroupId(self.next_id());
        self.groups.insert(
            id,
            GroupState {
                pane: pane.to_string(),
                markers: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    fn remove_layer_group(&mut self, group: LayerGroupId) {
        self.clear_layer_group(group);
        self.groups.remove(&group);
    }

    fn clear_layer_group(&mut self, group: LayerGroupId) {
        if let Some(state) = self.groups.get_mut(&group) {
            for marker in std::mem::take(&mut state.markers) {
                self.markers.remove(&marker);
            }
        }
    }

    fn add_marker(
        &mut self,
        group: LayerGroupId,
        position: LatLng,
        icon: MarkerIcon,
        on_click: ClickHandler,
    ) -> MapResult<MarkerId> {
        if self.removed {
            return Err(MapError::MapRemoved);
        }
        if !self.groups.contains_key(&group) {
            return Err(MapError::LayerGroupNotFound(group.0));
        }

        let id = MarkerId(self.next_id());
        if let Some(state) = self.groups.get_mut(&group) {
            state.markers.insert(id);
        }
        self.markers.insert(
            id,
            MarkerState {
                group,
                position,
                icon,
                classes: BTreeSet::new(),
                on_click,
            },
        );
        Ok(id)
    }

    fn update_marker(
        &mut self,
        marker: MarkerId,
        position: LatLng,
        icon: MarkerIcon,
    ) -> MapResult<()> {
        let state = self
            .markers
            .get_mut(&marker)
            .ok_or(MapError::MarkerNotFound(marker.0))?;
        state.position = position;
        state.icon = icon;
        Ok(())
    }

    fn toggle_marker_class(&mut self, marker: MarkerId, class_name: &str, enabled: bool) {
        if let Some(state) = self.markers.get_mut(&marker) {
            if enabled {
                state.classes.insert(class_name.to_string());
            } else {
                state.classes.remove(class_name);
            }
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if let Some(state) = self.markers.remove(&marker) {
            if let Some(group) = self.groups.get_mut(&state.group) {
                group.markers.remove(&marker);
            }
        }
    }

    fn create_canvas(&mut self, pane: &str, class_name: &str) -> MapResult<CanvasId> {
        if self.removed {
            return Err(MapError::MapRemoved);
        }
        if !self.panes.contains_key(pane) {
            return Err(MapError::PaneNotFound(pane.to_string()));
        }

        let surface = CanvasSurface::new(class_name)?;
        let id = CanvasId(self.next_id());
        self.canvases.insert(
            id,
            CanvasEntry {
                pane: pane.to_string(),
                surface,
            },
        );
        debug!(pane = %pane, canvas = %id, "Created canvas");
        Ok(id)
    }

    fn canvas_mut(&mut self, canvas: CanvasId) -> Option<&mut CanvasSurface> {
        self.canvases.get_mut(&canvas).map(|entry| &mut entry.surface)
    }

    fn remove_canvas(&mut self, canvas: CanvasId) {
        if self.canvases.remove(&canvas).is_some() {
            debug!(canvas = %canvas, "Removed canvas");
        }
    }

    fn subscribe(&mut self, kind: ViewEventKind) {
        if !self.removed {
            self.subscriptions.insert(kind);
        }
    }

    fn unsubscribe(&mut self, kind: ViewEventKind) {
        self.subscriptions.remove(&kind);
        self.pending_events.retain(|pending| *pending != kind);
    }

    fn drain_view_events(&mut self) -> Vec<ViewEventKind> {
        std::mem::take(&mut self.pending_events)
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        if !self.markers.is_empty() || !self.canvases.is_empty() {
            warn!(
                markers = self.markers.len(),
                canvases = self.canvases.len(),
                "Removing map with live layer content"
            );
        }
        self.markers.clear();
        self.groups.clear();
        self.canvases.clear();
        self.subscriptions.clear();
        self.pending_events.clear();
        self.tile_layers.clear();
        self.attribution = None;
        self.removed = true;
        debug!("Map removed");
    }
}
