//! The contract every measurement-layer renderer implements.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use map_engine::MapEngine;
use station_common::{MeasurementLayer, StationMeasurement, ValueRange};

/// Callback raised with a station id when one of a renderer's markers is
/// clicked.
pub type StationSelectFn = Rc<dyn Fn(&str)>;

/// Everything a renderer needs for one render pass.
///
/// Rebuilt by the orchestrator for every render; the station list is shared
/// rather than copied.
#[derive(Clone)]
pub struct RenderPayload {
    pub stations: Rc<[StationMeasurement]>,
    pub selected_station_id: Option<String>,
    /// Normalization range, when the layer uses one and it is known
    pub range: Option<ValueRange>,
    pub on_station_select: StationSelectFn,
}

impl RenderPayload {
    pub fn new(stations: Rc<[StationMeasurement]>, on_station_select: StationSelectFn) -> Self {
        Self {
            stations,
            selected_station_id: None,
            range: None,
            on_station_select,
        }
    }

    pub fn with_selected(mut self, station_id: Option<&str>) -> Self {
        self.selected_station_id = station_id.map(str::to_owned);
        self
    }

    pub fn with_range(mut self, range: Option<ValueRange>) -> Self {
        self.range = range;
        self
    }

    /// Stations whose reading for `layer` is present and finite.
    pub fn valid_stations(
        &self,
        layer: MeasurementLayer,
    ) -> impl Iterator<Item = &StationMeasurement> + '_ {
        self.stations.iter().filter(move |s| s.is_valid_for(layer))
    }

    pub fn is_selected(&self, station_id: &str) -> bool {
        self.selected_station_id.as_deref() == Some(station_id)
    }
}

impl fmt::Debug for RenderPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPayload")
            .field("stations", &self.stations.len())
            .field("selected_station_id", &self.selected_station_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

/// Where a renderer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Created but not yet attached to a map
    #[default]
    Detached,
    /// Attached; may hold markers and overlays
    Attached,
    /// Terminal. Every later call is a no-op.
    Destroyed,
}

/// A measurement-layer renderer.
///
/// Lifecycle: `init` attaches the renderer to the map and is idempotent.
/// `render` fully resyncs the renderer's visuals against the payload.
/// `on_view_change` refreshes view-dependent visuals from the last payload.
/// `clear` removes every visual but keeps the renderer attached. `destroy`
/// clears, detaches and makes the renderer inert for good.
///
/// A renderer only ever touches content it created. Every operation is safe to
/// call in any state; calls that make no sense in the current state do
/// nothing.
pub trait LayerRenderer {
    /// The measurement this renderer draws.
    fn layer(&self) -> MeasurementLayer;

    fn init(&mut self, map: &mut dyn MapEngine);

    fn render(&mut self, map: &mut dyn MapEngine, payload: &RenderPayload);

    fn on_view_change(&mut self, map: &mut dyn MapEngine);

    fn clear(&mut self, map: &mut dyn MapEngine);

    fn destroy(&mut self, map: &mut dyn MapEngine);

    /// Station ids of the markers currently on the map.
    fn marker_keys(&self) -> BTreeSet<&str>;

    fn lifecycle(&self) -> Lifecycle;

    fn is_destroyed(&self) -> bool {
        self.lifecycle() == Lifecycle::Destroyed
    }

    /// Whether the renderer currently owns an overlay canvas.
    fn has_overlay(&self) -> bool {
        false
    }
}
