//! Centralized error handling.
//!
//! Every failure while building settings is fatal at startup, so a single
//! error type covers resolution, coercion, and the filesystem side effects.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::is_secret;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    // Resolution
    #[error("{key} is required but was not set in the environment or the env file")]
    MissingRequired { key: String },

    #[error("Failed to read env file {}: {reason}", path.display())]
    EnvFile { path: PathBuf, reason: String },

    // Coercion
    #[error("Invalid value for {key} ({value}): {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    // Side effects
    #[error("Failed to create directory {} for {key}", path.display())]
    Directory {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Failed to render output: {0}")]
    Output(String),
}

impl ConfigError {
    /// Stable error code for operators and scripts
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::MissingRequired { .. } => "MISSING_REQUIRED",
            ConfigError::EnvFile { .. } => "ENV_FILE",
            ConfigError::InvalidValue { .. } => "INVALID_VALUE",
            ConfigError::Directory { .. } => "DIRECTORY",
            ConfigError::Logging(_) => "LOGGING",
            ConfigError::Output(_) => "OUTPUT",
        }
    }

    /// Key of the setting that caused the error, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::MissingRequired { key }
            | ConfigError::InvalidValue { key, .. }
            | ConfigError::Directory { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Result type alias
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience constructors
impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        ConfigError::MissingRequired { key: key.into() }
    }

    /// Secret values are replaced before they reach the message.
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let value = if is_secret(&key) {
            "[REDACTED]".to_string()
        } else {
            value.into()
        };

        ConfigError::InvalidValue {
            key,
            value,
            reason: reason.into(),
        }
    }

    pub fn env_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigError::EnvFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn directory(key: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigError::Directory {
            key: key.into(),
            path: path.into(),
            source,
        }
    }

    pub fn logging(msg: impl Into<String>) -> Self {
        ConfigError::Logging(msg.into())
    }

    pub fn output(msg: impl Into<String>) -> Self {
        ConfigError::Output(msg.into())
    }
}
