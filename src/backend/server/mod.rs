//! Server Module
//!
//! This module contains the code that assembles and configures the Axum
//! HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Environment configuration and store selection
//! - **`init`** - Server initialization and app creation
//! - **`shutdown`** - Signal that ends long-lived streams on shutdown
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env`
//! 2. **Store Opening**: memory, Redis or PostgreSQL
//! 3. **State Restoration**: seed the id generator from stored messages
//! 4. **Router Creation**: routes, tracing layer and fallback
//!
//! # Example
//!
//! ```rust,no_run
//! use radiochat::backend::server::{create_app, ServerConfig, Shutdown};
//!
//! # async fn example() {
//! let config = ServerConfig::from_env().unwrap();
//! let app = create_app(config, Shutdown::new()).await;
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

/// Shutdown signal for streaming responses
pub mod shutdown;

// Re-export commonly used types
pub use config::{ServerConfig, StoreBackend};
pub use init::create_app;
pub use shutdown::Shutdown;
pub use state::{AppState, CronSecret};
