//! Error types for housestat

use thiserror::Error;

/// housestat error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input file could not be parsed into a household table.
    #[error("malformed input {path}: {reason}")]
    MalformedInput {
        /// Offending file.
        path: String,
        /// What went wrong, including row/column when known.
        reason: String,
    },

    /// Input file has an extension we do not read.
    #[error("unsupported input format {path}: expected {expected}")]
    UnsupportedFormat {
        /// Offending file.
        path: String,
        /// Human-readable list of accepted formats.
        expected: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
