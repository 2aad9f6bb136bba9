//! Error types for telos-common
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for telos-common
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store load/save errors
    #[error("Store error: {0}")]
    Store(String),

    /// Section data failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using telos-common Error
pub type Result<T> = std::result::Result<T, Error>;
