//! Error types for the CO2 bridge.

use co2sight_common::ReadingError;
use thiserror::Error;

/// Result type alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur in the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parse error (including wrongly typed values).
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration validation error.
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    /// A metric reading failed; the poll tick is aborted.
    #[error("Poll aborted: {0}")]
    Read(#[from] ReadingError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Publishing error.
    #[error("Failed to publish to {key}: {message}")]
    Publish { key: String, message: String },

    /// Zenoh session error.
    #[error("Zenoh session error: {0}")]
    ZenohSession(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create a configuration validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ConfigValidation(msg.into())
    }
}

impl From<zenoh::Error> for BridgeError {
    fn from(err: zenoh::Error) -> Self {
        Self::ZenohSession(err.to_string())
    }
}

impl From<co2sight_common::Error> for BridgeError {
    fn from(err: co2sight_common::Error) -> Self {
        match err {
            co2sight_common::Error::Config(msg) => Self::ConfigParse(msg),
            co2sight_common::Error::Json(e) => Self::Serialization(e.to_string()),
            co2sight_common::Error::Cbor(e) => Self::Serialization(e),
            co2sight_common::Error::Io(e) => Self::Io(e),
            other => Self::ZenohSession(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
