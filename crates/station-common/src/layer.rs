//! Measurement layer selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MapError;

/// The measurement currently visualized on the map.
///
/// Exactly one layer is active at a time; each layer owns a dedicated map pane
/// named after it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementLayer {
    #[default]
    Temperature,
    Wind,
    Pressure,
}

impl MeasurementLayer {
    /// All layers, in pane creation order.
    pub const ALL: [MeasurementLayer; 3] = [
        MeasurementLayer::Temperature,
        MeasurementLayer::Wind,
        MeasurementLayer::Pressure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementLayer::Temperature => "temperature",
            MeasurementLayer::Wind => "wind",
            MeasurementLayer::Pressure => "pressure",
        }
    }

    /// Name of the map pane this layer draws into.
    pub fn pane_name(&self) -> &'static str {
        self.as_str()
    }

    /// CSS class attached to the layer's pane.
    pub fn pane_class(&self) -> String {
        format!("{}-pane", self.as_str())
    }
}

impl fmt::Display for MeasurementLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementLayer {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature" => Ok(MeasurementLayer::Temperature),
            "wind" => Ok(MeasurementLayer::Wind),
            "pressure" => Ok(MeasurementLayer::Pressure),
            _ => Err(MapError::UnknownLayer(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layer() {
        assert_eq!("wind".parse::<MeasurementLayer>().unwrap(), MeasurementLayer::Wind);
        assert_eq!(" Pressure ".parse::<MeasurementLayer>().unwrap(), MeasurementLayer::Pressure);
        assert!("humidity".parse::<MeasurementLayer>().is_err());
    }

    #[test]
    fn test_pane_names() {
        assert_eq!(MeasurementLayer::Temperature.pane_name(), "temperature");
        assert_eq!(MeasurementLayer::Wind.pane_class(), "wind-pane");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&MeasurementLayer::Pressure).unwrap();
        assert_eq!(json, "\"pressure\"");
        let layer: MeasurementLayer = serde_json::from_str("\"temperature\"").unwrap();
        assert_eq!(layer, MeasurementLayer::Temperature);
    }
}
