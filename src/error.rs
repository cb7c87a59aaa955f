//! Error types for the squat challenge library.
//!
//! Per-frame input problems (missing landmarks, low visibility, bad framing)
//! are never reported through this type. They come back as ordinary values
//! from the validator and the counter.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Recording or export (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation is not allowed in the current session phase
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Device frame rate is too low to run the challenge
    #[error("Device is not compatible: average frame rate {avg_fps:.1} fps is too low")]
    DeviceIncompatible {
        /// Rolling average frame rate at the time of the check
        avg_fps: f64,
    },

    /// Not enough frame-rate samples yet to classify the device
    #[error("Device compatibility is still being measured ({samples}/{required} samples)")]
    CompatibilityPending {
        /// Samples collected so far
        samples: usize,
        /// Samples required before a verdict
        required: usize,
    },

    /// The session was exited by the user
    #[error("Session has been cancelled")]
    SessionCancelled,
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
