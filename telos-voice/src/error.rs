//! Error types for telos-voice
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Note that most playback-path failures are deliberately not
//! propagated: the sequencer degrades to silence rather than surfacing
//! errors to its caller.

use thiserror::Error;

/// Main error type for telos-voice
#[derive(Error, Debug)]
pub enum Error {
    /// Audio backend / context creation errors
    #[error("Audio backend error: {0}")]
    Backend(String),

    /// Audio fragment decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio output errors
    #[error("Audio output error: {0}")]
    Output(String),

    /// Remote voice client errors
    #[error("Voice client error: {0}")]
    Client(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using telos-voice Error
pub type Result<T> = std::result::Result<T, Error>;
