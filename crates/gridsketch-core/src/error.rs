//! Error types for gridsketch

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridsketchError {
    // Local precondition failures, never sent to the service
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    // Remote service errors
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Empty response received from server")]
    EmptyResponse,

    // Drawing surface errors
    #[error("Drawing surface unavailable: {reason}")]
    Surface { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GridsketchError {
    /// Shorthand for a local validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        GridsketchError::Validation { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GridsketchError>;
