//! Shared Error Types
//!
//! This module defines error types that are shared between the server and the
//! client.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A message field failed validation
//!
//! # Usage
//!
//! ```rust
//! use radiochat::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Content required");
//! assert_eq!(error.public_message(), "Content required");
//! ```
use thiserror::Error;

/// Shared error types that can occur on either side of the wire
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Message returned to clients as is
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The message shown to API clients
    ///
    /// Validation errors expose their fixed message only, without the field
    /// prefix used by `Display`.
    pub fn public_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
