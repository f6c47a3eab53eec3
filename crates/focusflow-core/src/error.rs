//! Core error types for focusflow-core.
//!
//! Only two kinds of failure reach callers of the engine: rejected input
//! (`ValidationError`) and configuration problems (`ConfigError`). Removing
//! something that does not exist is never an error.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for an `InvalidInput` validation failure.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation(ValidationError::InvalidInput {
            field: field.into(),
            message: message.into(),
        })
    }

    /// True when the caller can retry with different input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(ValidationError::InvalidInput { .. })
        )
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty title/text or out-of-range priority. State is left unchanged.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
