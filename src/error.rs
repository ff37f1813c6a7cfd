//! Error types for Chatterbox
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Chatterbox operations
///
/// Covers configuration loading, substrate reads/writes, and
/// serialization of persisted records.
#[derive(Error, Debug)]
pub enum ChatterboxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Substrate read/write errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A write was rejected because it would exceed the substrate's quota
    #[error("Storage quota exceeded writing key '{key}': {bytes} bytes")]
    QuotaExceeded {
        /// The key whose write was rejected
        key: String,
        /// Size of the rejected value in bytes
        bytes: usize,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Chatterbox operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
