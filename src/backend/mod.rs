//! Backend Module
//!
//! This module contains all server-side code: an Axum HTTP server exposing
//! the chat API on top of a bounded-retention chat log.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`chat`** - Chat log, message stores and `/api/messages` handlers
//! - **`realtime`** - Event broadcasting and the SSE stream
//! - **`cron`** - Administrative flush endpoint
//! - **`middleware`** - Bearer secret check
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── chat/           - Chat log, stores and handlers
//! ├── realtime/       - Event broadcasting
//! ├── cron/           - Flush endpoint
//! ├── middleware/     - Request checks
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the `ChatLog` (store, id generator,
//! event channel) and the cron secret. The store is an
//! `Arc<dyn MessageStore>` picked at startup.
//!
//! # Concurrency
//!
//! Every request is independent. An append and the trim that follows it are
//! separate store calls, so a crash in between can leave the store briefly
//! over the cap; reads never return more than the cap.

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Chat log, stores and handlers
#[cfg(feature = "ssr")]
pub mod chat;

/// Real-time update system
#[cfg(feature = "ssr")]
pub mod realtime;

/// Administrative endpoints
#[cfg(feature = "ssr")]
pub mod cron;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use server::create_app;
#[cfg(feature = "ssr")]
pub use chat::log::{ChatLog, RETENTION_CAP};
#[cfg(feature = "ssr")]
pub use error::BackendError;
