//! Core error types for skllable-core.
//!
//! Business outcomes (a rejected session, a malformed credential ID, an
//! unmet tier requirement) are reported as data by the evaluators. The types
//! here cover structural failures: bad configuration, records that cannot
//! exist, and storage collaborators that fail.

use std::path::PathBuf;
use thiserror::Error;

use crate::credential::CredentialLevel;

/// Core error type for skllable-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Structurally invalid input records
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Issuance was requested for a tier the history does not satisfy
    #[error("Track '{track_id}' is not eligible for the {level} credential")]
    Ineligible {
        track_id: String,
        level: CredentialLevel,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home directory could not be resolved
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Validation errors for records that cannot structurally exist.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Stored duration disagrees with the timestamps
    #[error("Duration mismatch for session '{id}': stored {stored} min, timestamps give {derived} min")]
    DurationMismatch { id: String, stored: u32, derived: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by session store collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("Failed to access session file {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file contents are not a session list
    #[error("Malformed session file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored record violates the record invariants
    #[error("Invalid stored session: {0}")]
    InvalidRecord(#[from] ValidationError),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
