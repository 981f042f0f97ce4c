//! Error types for configuration loading and validation.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("failed to parse environment variable {var}: {message}")]
    EnvVar { var: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
