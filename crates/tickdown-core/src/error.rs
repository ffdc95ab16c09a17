//! Core error types for tickdown-core.
//!
//! All failures are local and recoverable: the engine is stateless between
//! invocations, so the worst outcome is a one-time loss of background
//! accuracy, never a corrupted persisted record.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tickdown-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Wake-scheduling errors
    #[error("Wake scheduler error: {0}")]
    Wake(#[from] WakeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A persisted field holds a value that cannot be parsed back
    #[error("Corrupt value for key '{key}': {value}")]
    CorruptField { key: String, value: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Wake-scheduler errors.
///
/// A schedule failure leaves the record in `Running` with no wake armed;
/// the next foreground reconcile degrades gracefully instead of crashing.
#[derive(Error, Debug)]
pub enum WakeError {
    /// The host declined to arm the one-shot wake
    #[error("Failed to arm wake: {0}")]
    ScheduleFailed(String),

    /// Cancelling the pending wake failed
    #[error("Failed to cancel wake: {0}")]
    CancelFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
