//! Error types for auditr
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur in auditr
#[derive(Debug, Error)]
pub enum AuditError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Points-mall backend error
    #[error("Mall error: {0}")]
    Mall(String),

    /// Notification delivery error
    #[error("Notify error: {0}")]
    Notify(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors, raised eagerly at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type alias for auditr operations
pub type Result<T> = std::result::Result<T, AuditError>;
