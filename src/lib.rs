//! radiochat - Main Library
//!
//! radiochat is a small live chat service: clients post short text messages
//! tied to a username and either poll for the latest messages or subscribe to
//! a realtime stream. The server keeps only the most recent messages
//! (see [`backend::chat::log::RETENTION_CAP`]) in one of three interchangeable
//! stores.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - `Message`, `MessageId`, `NewMessage` and the id generator
//!   - Realtime `ChatEvent`s
//!   - Error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and routes
//!   - Bounded-retention chat log over a pluggable `MessageStore`
//!   - Memory, Redis and PostgreSQL stores
//!   - Bearer-secret protected flush endpoint
//!
//! - **`client`** - HTTP client, session and update strategies
//!   - Polling every two seconds, or realtime subscription
//!   - Cancellation on teardown
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use radiochat::backend::server::init::create_app;
//! use radiochat::backend::server::config::ServerConfig;
//! use radiochat::backend::server::shutdown::Shutdown;
//!
//! # async fn example() {
//! let config = ServerConfig::default();
//! let app = create_app(config, Shutdown::new()).await;
//! # }
//! ```

/// Types shared between server and client
pub mod shared;

/// Server-side code
pub mod backend;

/// Chat client
pub mod client;
