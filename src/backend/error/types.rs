/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Errors with an explicit status, such as a missing or wrong bearer secret.
 *
 * ## Internal Errors
 *
 * Failures with a fixed public message and a best-effort `details` string,
 * such as a failed flush.
 *
 * ## Wrapped Errors
 *
 * Store, validation and JSON errors converted with `?`. Store and JSON
 * failures become `500 Internal server error`; validation failures become
 * `400` with the fixed validation message.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::backend::chat::store::StoreError;
use crate::shared::SharedError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use axum::http::StatusCode;
/// use radiochat::backend::error::BackendError;
///
/// let err = BackendError::handler(StatusCode::UNAUTHORIZED, "Unauthorized");
/// assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
///
/// let err = BackendError::internal("Failed to clear cache", "connection reset");
/// assert_eq!(err.details().as_deref(), Some("connection reset"));
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Internal failure with a fixed public message
    #[error("{message}: {details}")]
    InternalError {
        /// Message returned to clients
        message: String,
        /// Underlying cause, returned as `details`
        details: String,
    },

    /// Message store failure
    #[error(transparent)]
    StoreError(#[from] StoreError),

    /// Shared error (validation, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Request body could not be parsed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            details: details.into(),
        }
    }

    /// `401 Unauthorized`
    pub fn unauthorized() -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `InternalError` - 500 Internal Server Error
    /// - `StoreError` - 500 Internal Server Error
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to clients as `error`
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::InternalError { message, .. } => message.clone(),
            Self::SharedError(err @ SharedError::ValidationError { .. }) => err.public_message(),
            Self::StoreError(_) | Self::SharedError(_) | Self::SerializationError(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }

    /// Best-effort cause returned to clients as `details`
    pub fn details(&self) -> Option<String> {
        match self {
            Self::HandlerError { .. } => None,
            Self::InternalError { details, .. } => Some(details.clone()),
            Self::StoreError(err) => Some(err.to_string()),
            Self::SharedError(SharedError::ValidationError { .. }) => None,
            Self::SharedError(err) => Some(err.to_string()),
            Self::SerializationError(err) => Some(err.to_string()),
        }
    }
}
