//! Chat Handlers Module
//!
//! Axum handlers for the `/api/messages` resource.
//!
//! # Route Handlers
//!
//! ## GET /api/messages
//!
//! Returns the retained messages as a JSON array, oldest first.
//!
//! ## POST /api/messages
//!
//! Accepts `{content, username}` and returns the created message.
//!
//! The realtime stream for the same resource lives in
//! [`backend::realtime`](crate::backend::realtime).

/// `/api/messages` handlers
pub mod messages;

pub use messages::{create_message, list_messages};
