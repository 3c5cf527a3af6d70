//! Chat Backend Module
//!
//! This module contains all server-side chat functionality:
//! - The bounded-retention chat log
//! - Message stores (memory, Redis, PostgreSQL)
//! - HTTP handlers for `/api/messages`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use radiochat::backend::chat::log::{ChatLog, RETENTION_CAP};
//! use radiochat::backend::chat::store::MemoryStore;
//! use radiochat::backend::realtime::event_channel;
//! use radiochat::shared::NewMessage;
//!
//! # async fn example() {
//! let log = ChatLog::new(Arc::new(MemoryStore::new()), RETENTION_CAP, event_channel());
//! let message = log.post(NewMessage::new("Hello!", "alice")).await.unwrap();
//! # }
//! ```

/// Retention policy and id assignment
pub mod log;

/// Storage backends
pub mod store;

/// HTTP handlers
pub mod handlers;

/// Re-export commonly used types
pub use log::{ChatLog, RETENTION_CAP};
pub use store::{MessageStore, StoreError};
pub use handlers::{create_message, list_messages};
