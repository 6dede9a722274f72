//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        field: &'static str,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        CoreError::InvalidIdentifier(message.into())
    }

    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        CoreError::InvalidValue {
            field,
            value: value.into(),
        }
    }
}
