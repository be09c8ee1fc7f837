//! `WeatherMap`: owns the map, the three layer renderers and the state that
//! drives them.
//!
//! Four independent triggers feed the map: new station data, a layer switch, a
//! selection change and viewport events. Each of them ends in
//! [`WeatherMap::render_active_layer`] (or the view-change equivalent), which
//! fully resyncs the active renderer, so triggers may arrive in any order.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, trace};

use map_engine::{MapEngine, TileLayerSpec, ViewEventKind};
use station_common::{
    last_updated_label, LayerRanges, MapConfig, MeasurementLayer, StationMeasurement,
    StationSnapshot, ValueRange,
};

use crate::layer::{LayerRenderer, RenderPayload, StationSelectFn};
use crate::pressure::PressureRenderer;
use crate::temperature::TemperatureRenderer;
use crate::wind::WindRenderer;

/// Raised with `Some(id)` when a station marker is clicked and `None` when the
/// selection is cleared.
pub type SelectionHandler = Rc<dyn Fn(Option<&str>)>;

/// A point-in-time description of what the map shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub active_layer: MeasurementLayer,
    pub stations: usize,
    pub markers: usize,
    pub overlay: bool,
    pub selected_station_id: Option<String>,
    pub temperature_range: Option<ValueRange>,
    pub wind_range: Option<ValueRange>,
    pub pressure_range: ValueRange,
}

/// The weather map: a map engine plus one renderer per measurement layer.
///
/// Exactly one layer is active at a time. Renderers are initialized the first
/// time their layer becomes active and cleared (not destroyed) when another
/// layer takes over. Dropping the map tears everything down.
pub struct WeatherMap<M: MapEngine> {
    map: M,
    config: MapConfig,
    temperature: TemperatureRenderer,
    wind: WindRenderer,
    pressure: PressureRenderer,
    initialized: BTreeSet<MeasurementLayer>,
    active: MeasurementLayer,
    stations: Rc<[StationMeasurement]>,
    ranges: LayerRanges,
    selected_station_id: Option<String>,
    on_station_selected: SelectionHandler,
    on_station_select: StationSelectFn,
    torn_down: bool,
}

impl<M: MapEngine> WeatherMap<M> {
    /// Set up `map` and activate the configured initial layer.
    ///
    /// Sets the initial view, adds the basemap, creates one pane per layer and
    /// subscribes to viewport events. `on_station_selected` receives marker
    /// clicks.
    pub fn mount<F>(mut map: M, config: MapConfig, on_station_selected: F) -> Self
    where
        F: Fn(Option<&str>) + 'static,
    {
        let view = &config.view;
        map.add_tile_layer(&TileLayerSpec {
            url_template: config.basemap.url_template.clone(),
            subdomains: config.basemap.subdomains.clone(),
            min_zoom: view.min_zoom,
            max_zoom: view.max_zoom,
        });
        map.set_view(view.center, view.zoom);

        for layer in MeasurementLayer::ALL {
            if let Err(e) = map.create_pane(layer.pane_name(), &layer.pane_class()) {
                debug!(layer = %layer, error = %e, "Pane not created");
            }
        }

        map.set_attribution(None);
        for kind in ViewEventKind::ALL {
            map.subscribe(kind);
        }

        let on_station_selected: SelectionHandler = Rc::new(on_station_selected);
        let upward = Rc::clone(&on_station_selected);
        let on_station_select: StationSelectFn = Rc::new(move |id: &str| upward(Some(id)));

        let ranges = LayerRanges::empty(&config.ranges);
        let initial_layer = config.initial_layer;

        let mut weather_map = Self {
            map,
            temperature: TemperatureRenderer::new(config.glow.clone()),
            wind: WindRenderer::new(&config.wind),
            pressure: PressureRenderer::new(),
            config,
            initialized: BTreeSet::new(),
            active: initial_layer,
            stations: Rc::from(Vec::new()),
            ranges,
            selected_station_id: None,
            on_station_selected,
            on_station_select,
            torn_down: false,
        };

        info!(layer = %initial_layer, "Mounted weather map");
        weather_map.set_measurement(initial_layer);
        weather_map
    }

    // === Triggers ===

    /// Replace the station list, recompute every layer's range and redraw the
    /// active layer.
    pub fn set_stations(&mut self, stations: Vec<StationMeasurement>) {
        if self.torn_down {
            return;
        }
        self.ranges = LayerRanges::compute(&stations, &self.config.ranges);
        self.stations = Rc::from(stations);
        debug!(
            stations = self.stations.len(),
            temperature = ?self.ranges.temperature,
            wind = ?self.ranges.wind,
            pressure = ?self.ranges.pressure,
            "Updated stations"
        );
        self.render_active_layer();
    }

    /// Apply a backend snapshot: stations plus the last-updated timestamp.
    pub fn apply_snapshot(&mut self, snapshot: StationSnapshot) {
        if self.torn_down {
            return;
        }
        self.set_last_updated(snapshot.generated_at.as_deref());
        self.set_stations(snapshot.stations);
    }

    /// Switch the visible layer.
    ///
    /// The previous layer is cleared but stays attached for reuse. A layer is
    /// initialized the first time it becomes active.
    pub fn set_measurement(&mut self, layer: MeasurementLayer) {
        if self.torn_down {
            return;
        }

        let previous = self.active;
        if previous != layer && self.initialized.contains(&previous) {
            let (renderer, map) = self.parts(previous);
            renderer.clear(map);
            debug!(layer = %previous, "Cleared inactive layer");
        }

        if self.initialized.insert(layer) {
            let (renderer, map) = self.parts(layer);
            renderer.init(map);
            debug!(layer = %layer, "Initialized layer");
        }

        self.active = layer;
        self.render_active_layer();
    }

    /// Highlight a different station. Only the active layer is redrawn.
    pub fn set_selected_station(&mut self, station_id: Option<&str>) {
        if self.torn_down {
            return;
        }
        self.selected_station_id = station_id.map(str::to_owned);
        self.render_active_layer();
    }

    /// Raise a cleared selection upward.
    pub fn clear_selection(&self) {
        if !self.torn_down {
            (self.on_station_selected)(None);
        }
    }

    /// Show when the data was produced, or clear the label with `None`.
    pub fn set_last_updated(&mut self, generated_at: Option<&str>) {
        if self.torn_down {
            return;
        }
        let label = last_updated_label(generated_at);
        self.map.set_attribution(label.as_deref());
    }

    /// Forward a viewport change to the active layer.
    pub fn handle_view_event(&mut self, kind: ViewEventKind) {
        if self.torn_down {
            return;
        }
        trace!(event = %kind, layer = %self.active, "View changed");
        let (renderer, map) = self.parts(self.active);
        renderer.on_view_change(map);
    }

    /// Drain the engine's pending viewport events and handle each of them.
    /// Returns how many were handled.
    pub fn pump_view_events(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        let events = self.map.drain_view_events();
        for kind in &events {
            self.handle_view_event(*kind);
        }
        events.len()
    }

    /// Destroy every renderer, drop the view subscriptions and remove the map.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        for layer in MeasurementLayer::ALL {
            let (renderer, map) = self.parts(layer);
            renderer.destroy(map);
        }
        for kind in ViewEventKind::ALL {
            self.map.unsubscribe(kind);
        }
        self.map.remove();
        self.stations = Rc::from(Vec::new());
        self.initialized.clear();
        info!("Weather map torn down");
    }

    // === Rendering ===

    /// Full resync of the active layer against the current stations,
    /// selection and range.
    fn render_active_layer(&mut self) {
        if self.torn_down {
            return;
        }
        let layer = self.active;
        let payload = self.build_payload(layer);
        let (renderer, map) = self.parts(layer);
        renderer.render(map, &payload);
        trace!(
            layer = %layer,
            markers = renderer.marker_keys().len(),
            "Rendered active layer"
        );
    }

    fn build_payload(&self, layer: MeasurementLayer) -> RenderPayload {
        RenderPayload::new(Rc::clone(&self.stations), Rc::clone(&self.on_station_select))
            .with_selected(self.selected_station_id.as_deref())
            .with_range(self.ranges.for_layer(layer))
    }

    fn parts(&mut self, layer: MeasurementLayer) -> (&mut dyn LayerRenderer, &mut dyn MapEngine) {
        let renderer: &mut dyn LayerRenderer = match layer {
            MeasurementLayer::Temperature => &mut self.temperature,
            MeasurementLayer::Wind => &mut self.wind,
            MeasurementLayer::Pressure => &mut self.pressure,
        };
        (renderer, &mut self.map)
    }

    // === Accessors ===

    pub fn active_layer(&self) -> MeasurementLayer {
        self.active
    }

    pub fn ranges(&self) -> &LayerRanges {
        &self.ranges
    }

    pub fn stations(&self) -> &[StationMeasurement] {
        &self.stations
    }

    pub fn selected_station_id(&self) -> Option<&str> {
        self.selected_station_id.as_deref()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether the layer has been initialized since mount.
    pub fn is_initialized(&self, layer: MeasurementLayer) -> bool {
        self.initialized.contains(&layer)
    }

    pub fn renderer(&self, layer: MeasurementLayer) -> &dyn LayerRenderer {
        match layer {
            MeasurementLayer::Temperature => &self.temperature,
            MeasurementLayer::Wind => &self.wind,
            MeasurementLayer::Pressure => &self.pressure,
        }
    }

    pub fn temperature(&self) -> &TemperatureRenderer {
        &self.temperature
    }

    pub fn wind(&self) -> &WindRenderer {
        &self.wind
    }

    pub fn pressure(&self) -> &PressureRenderer {
        &self.pressure
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Direct engine access, e.g. to simulate user interaction. Viewport
    /// changes made here are picked up by [`Self::pump_view_events`].
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn summary(&self) -> MapSummary {
        let active = self.renderer(self.active);
        MapSummary {
            active_layer: self.active,
            stations: self.stations.len(),
            markers: active.marker_keys().len(),
            overlay: active.has_overlay(),
            selected_station_id: self.selected_station_id.clone(),
            temperature_range: self.ranges.temperature,
            wind_range: self.ranges.wind,
            pressure_range: self.ranges.pressure,
        }
    }
}

impl<M: MapEngine> Drop for WeatherMap<M> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<M: MapEngine> fmt::Debug for WeatherMap<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherMap")
            .field("active", &self.active)
            .field("initialized", &self.initialized)
            .field("stations", &self.stations.len())
            .field("ranges", &self.ranges)
            .field("selected_station_id", &self.selected_station_id)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
