//! Error types for Geolayer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeolayerError {
    // Payload errors
    #[error("Invalid GeoJSON format: {reason}")]
    Format { reason: String },

    #[error("Unsupported geometry: {kind}")]
    UnsupportedGeometry { kind: String },

    // Reprojection errors
    #[error("Failed to transform coordinates ({x}, {y}): {reason}")]
    Transform { x: f64, y: f64, reason: String },

    // Lookup errors
    #[error("Invalid layer ID: {value}")]
    InvalidIdentifier { value: String },

    #[error("Layer not found: {id}")]
    NotFound { id: String },

    // Store errors
    #[error("Store error: {0}")]
    Store(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeolayerError {
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format { reason: reason.into() }
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedGeometry { kind: kind.into() }
    }

    pub fn transform(x: f64, y: f64, reason: impl Into<String>) -> Self {
        Self::Transform { x, y, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GeolayerError>;
