//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, tracing layer and fallback
//! - **`api_routes`** - `/api/messages`, `/api/cron/*` and `/health`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use radiochat::backend::chat::log::{ChatLog, RETENTION_CAP};
//! use radiochat::backend::chat::store::MemoryStore;
//! use radiochat::backend::realtime::event_channel;
//! use radiochat::backend::routes::create_router;
//! use radiochat::backend::server::shutdown::Shutdown;
//! use radiochat::backend::server::state::{AppState, CronSecret};
//!
//! let chat_log = ChatLog::new(Arc::new(MemoryStore::new()), RETENTION_CAP, event_channel());
//! let router = create_router(AppState {
//!     chat_log,
//!     cron_secret: CronSecret::default(),
//!     shutdown: Shutdown::default(),
//! });
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
