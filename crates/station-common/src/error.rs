//! Error types for the weather station map crates.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for configuration, ingestion and map-engine operations.
///
/// The rendering path itself never surfaces these: renderers log and fall
/// back to neutral visuals instead.
#[derive(Debug, Error)]
pub enum MapError {
    // === Configuration Errors ===
    #[error("Failed to read configuration: {0}")]
    ConfigRead(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Data Errors ===
    #[error("Invalid station snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unknown measurement layer: {0}")]
    UnknownLayer(String),

    // === Map Engine Errors ===
    #[error("Pane not found: {0}")]
    PaneNotFound(String),

    #[error("Layer group not found: {0}")]
    LayerGroupNotFound(u64),

    #[error("Marker not found: {0}")]
    MarkerNotFound(u64),

    #[error("Canvas unavailable: {0}")]
    CanvasUnavailable(String),

    #[error("Map has been removed")]
    MapRemoved,

    // === Output Errors ===
    #[error("Image encoding failed: {0}")]
    EncodeError(String),
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::ConfigRead(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::InvalidSnapshot(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::InvalidConfig(format!("YAML error: {}", err))
    }
}
