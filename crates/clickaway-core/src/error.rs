//! Configuration error types.
//!
//! The event path never fails; errors only surface when options are parsed or
//! validated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid option: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
