//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and the client. All of them serialize to the JSON shapes used
//! on the wire by `/api/messages` and the realtime stream.

/// Message data structure and id generation
pub mod message;

/// Realtime chat events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use message::{IdGenerator, Message, MessageId, NewMessage, ValidMessage};
pub use event::ChatEvent;
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
