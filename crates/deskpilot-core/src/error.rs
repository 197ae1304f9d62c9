//! Error types for plan parsing and configuration loading.

use thiserror::Error;

/// Errors from validating a plan's steps.
///
/// All variants are fatal: a plan that fails to parse never executes,
/// so a malformed step anywhere aborts before any step runs. Indices
/// are 1-based and refer to the step's position in its containing
/// sequence (branches re-count from 1, like the plans they nest).
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("step {index}: missing or empty 'action'")]
    MissingAction { index: usize },
    #[error("step {index}: unsupported action: {action}")]
    UnknownAction { index: usize, action: String },
    #[error("step {index} ({action}): {reason}")]
    InvalidParams {
        index: usize,
        action: String,
        reason: String,
    },
    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid safety config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config serialization failed: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
