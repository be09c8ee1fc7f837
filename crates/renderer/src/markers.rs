//! Station-keyed marker bookkeeping shared by all layer renderers.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use map_engine::{ClickHandler, LayerGroupId, MapEngine, MarkerIcon, MarkerId};
use station_common::{MeasurementLayer, StationMeasurement};

use crate::layer::{Lifecycle, RenderPayload};

/// Class toggled on the marker of the selected station.
pub const SELECTED_CLASS: &str = "is-selected";

/// Format a reading for a marker label with `decimals` fraction digits,
/// rounding halves away from zero.
pub fn format_reading(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    format!("{:.*}", decimals, (value * scale).round() / scale)
}

/// One layer group plus the markers a renderer placed in it, keyed by station
/// id.
#[derive(Debug)]
pub struct MarkerLayer {
    layer: MeasurementLayer,
    group: Option<LayerGroupId>,
    markers: HashMap<String, MarkerId>,
    lifecycle: Lifecycle,
}

impl MarkerLayer {
    pub fn new(layer: MeasurementLayer) -> Self {
        Self {
            layer,
            group: None,
            markers: HashMap::new(),
            lifecycle: Lifecycle::Detached,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == Lifecycle::Attached && self.group.is_some()
    }

    /// Add the layer group to the map, in the layer's pane when it exists.
    ///
    /// Repeated calls keep the existing group. A destroyed layer stays
    /// detached.
    pub fn attach(&mut self, map: &mut dyn MapEngine) {
        if self.lifecycle == Lifecycle::Destroyed || self.group.is_some() {
            return;
        }

        let pane = self.layer.pane_name();
        let target = if map.has_pane(pane) {
            Some(pane)
        } else {
            debug!(layer = %self.layer, pane = %pane, "Pane missing, using default marker pane");
            None
        };

        match map.add_layer_group(target) {
            Ok(group) => {
                self.group = Some(group);
                self.lifecycle = Lifecycle::Attached;
                debug!(layer = %self.layer, group = %group, "Attached marker layer");
            }
            Err(e) => warn!(layer = %self.layer, error = %e, "Failed to attach marker layer"),
        }
    }

    /// Resync markers with the stations valid for this layer.
    ///
    /// Existing markers are moved and re-iconed in place, new stations get a
    /// marker whose click raises the station id, and markers of stations that
    /// are no longer valid are removed. Afterwards the key set equals the
    /// valid station id set.
    pub fn sync<F>(&mut self, map: &mut dyn MapEngine, payload: &RenderPayload, make_icon: F)
    where
        F: Fn(&StationMeasurement) -> MarkerIcon,
    {
        let Some(group) = self.group.filter(|_| self.lifecycle == Lifecycle::Attached) else {
            return;
        };

        let mut seen: HashSet<&str> = HashSet::new();
        for station in payload.valid_stations(self.layer) {
            // Duplicate ids collapse onto one marker; the last station wins.
            let icon = make_icon(station);
            if let Some(marker) = self.upsert(map, group, station, icon, payload) {
                map.toggle_marker_class(marker, SELECTED_CLASS, payload.is_selected(&station.id));
                seen.insert(station.id.as_str());
            }
        }

        let stale: Vec<String> = self
            .markers
            .keys()
            .filter(|id| !seen.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(marker) = self.markers.remove(&id) {
                map.remove_marker(marker);
                trace!(layer = %self.layer, station = %id, "Removed stale marker");
            }
        }
    }

    fn upsert(
        &mut self,
        map: &mut dyn MapEngine,
        group: LayerGroupId,
        station: &StationMeasurement,
        icon: MarkerIcon,
        payload: &RenderPayload,
    ) -> Option<MarkerId> {
        let position = station.position();

        if let Some(&marker) = self.markers.get(&station.id) {
            match map.update_marker(marker, position, icon.clone()) {
                Ok(()) => return Some(marker),
                Err(e) => {
                    // The engine lost the marker; forget it and add a fresh one.
                    debug!(station = %station.id, error = %e, "Recreating marker");
                    self.markers.remove(&station.id);
                }
            }
        }

        let select = Rc::clone(&payload.on_station_select);
        let station_id = station.id.clone();
        let on_click: ClickHandler = Rc::new(move || select(&station_id));

        match map.add_marker(group, position, icon, on_click) {
            Ok(marker) => {
                self.markers.insert(station.id.clone(), marker);
                Some(marker)
            }
            Err(e) => {
                warn!(layer = %self.layer, station = %station.id, error = %e, "Failed to add marker");
                None
            }
        }
    }

    /// Remove every marker, keeping the group attached.
    pub fn clear(&mut self, map: &mut dyn MapEngine) {
        for (_, marker) in self.markers.drain() {
            map.remove_marker(marker);
        }
        if let Some(group) = self.group {
            map.clear_layer_group(group);
        }
    }

    /// Clear and remove the group from the map. Terminal.
    pub fn detach(&mut self, map: &mut dyn MapEngine) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.clear(map);
        if let Some(group) = self.group.take() {
            map.remove_layer_group(group);
        }
        self.lifecycle = Lifecycle::Destroyed;
        debug!(layer = %self.layer, "Detached marker layer");
    }

    pub fn keys(&self) -> BTreeSet<&str> {
        self.markers.keys().map(String::as_str).collect()
    }

    pub fn marker_for(&self, station_id: &str) -> Option<MarkerId> {
        self.markers.get(station_id).copied()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reading_rounds_half_away_from_zero() {
        assert_eq!(format_reading(3.25, 1), "3.3");
        assert_eq!(format_reading(12.34, 1), "12.3");
        assert_eq!(format_reading(-2.25, 1), "-2.3");
        assert_eq!(format_reading(1012.5, 0), "1013");
        assert_eq!(format_reading(1012.3, 0), "1012");
        assert_eq!(format_reading(7.0, 1), "7.0");
    }
}
