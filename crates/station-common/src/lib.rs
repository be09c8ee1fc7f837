//! Common types and utilities shared across the weather station map crates.

pub mod config;
pub mod error;
pub mod geo;
pub mod layer;
pub mod range;
pub mod station;
pub mod time;

pub use config::{BasemapConfig, GlowConfig, MapConfig, RangeConfig, ViewConfig, WindConfig};
pub use error::{MapError, MapResult};
pub use geo::{LatLng, Point, Size};
pub use layer::MeasurementLayer;
pub use range::{LayerRanges, ValueRange};
pub use station::{StationMeasurement, StationSnapshot};
pub use time::last_updated_label;
