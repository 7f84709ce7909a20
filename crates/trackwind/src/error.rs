//! Error types for trackwind.
//!
//! The estimation engine itself never fails: an unusable track yields no
//! estimate. These errors cover everything around it, such as reading track
//! files, loading configuration and parsing user input.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for trackwind operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Track Errors ===
    /// Failed to read a track file.
    #[error("failed to read track {path}: {source}")]
    TrackRead {
        /// Path to the track file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A track file could not be parsed.
    #[error("failed to parse track {path}: {source}")]
    TrackParse {
        /// Path to the track file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// A wing size could not be understood.
    #[error("cannot read a wing area from '{input}'")]
    InvalidWingSize {
        /// The text that was given.
        input: String,
    },

    /// A pilot weight was zero, negative or not a number.
    #[error("invalid pilot weight: {value}")]
    InvalidPilotWeight {
        /// The rejected value.
        value: f64,
    },

    // === Output Errors ===
    /// A report could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for trackwind operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid wing size error.
    #[must_use]
    pub fn invalid_wing_size(input: impl Into<String>) -> Self {
        Self::InvalidWingSize {
            input: input.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}
