//! Client Module
//!
//! HTTP client for the chat API plus the session logic a front end needs:
//! joining with a username, sending messages and keeping a local copy of
//! the latest messages current.
//!
//! # Architecture
//!
//! - **`api`** - reqwest wrapper for `/api/messages` and `/api/cron/*`
//! - **`session`** - Username, send guard and update lifecycle
//! - **`poller`** - Fixed-interval refetch (every two seconds by default)
//! - **`subscription`** - Realtime updates from the server's event stream
//! - **`error`** - Client error types
//!
//! Updaters publish full snapshots on a `tokio::sync::watch` channel, so
//! readers always see the latest list and never a partial one.

/// Chat HTTP API client
pub mod api;

/// Client error types
pub mod error;

/// Polling updater
pub mod poller;

/// Realtime updater
pub mod subscription;

/// Chat session
pub mod session;

pub use api::ChatApi;
pub use error::ClientError;
pub use poller::Poller;
pub use session::{ChatSession, UpdateStrategy, LOCAL_CAPACITY};
pub use subscription::{RealtimeSubscription, SseParser};
