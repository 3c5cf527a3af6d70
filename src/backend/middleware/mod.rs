//! Middleware Module
//!
//! Request checks that run before handlers.
//!
//! - **`auth`** - Bearer secret check for administrative routes

pub mod auth;

pub use auth::{verify_bearer, CronAuthorized};
