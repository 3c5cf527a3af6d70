//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - `IntoResponse` implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use radiochat::backend::error::BackendError;
//! use axum::Json;
//!
//! async fn handler() -> Result<Json<Vec<String>>, BackendError> {
//!     Ok(Json(Vec::new()))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
