//! Message Stores
//!
//! The chat log keeps its messages in a `MessageStore`. Three stores are
//! provided and are interchangeable at startup:
//!
//! - **`memory`** - Process memory, lost on restart
//! - **`redis_list`** - One Redis list of JSON-encoded messages
//! - **`postgres`** - A `chat_messages` table managed through `sqlx`
//!
//! Stores only know how to append, list, trim and flush. The retention rule
//! itself (append, then trim to the cap) lives in
//! [`ChatLog`](crate::backend::chat::log::ChatLog), so it can be tested against
//! the memory store and reused unchanged by the others.

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::Message;

/// In-memory store
pub mod memory;

/// Redis list store
pub mod redis_list;

/// PostgreSQL store
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use redis_list::RedisStore;

/// Storage backend for chat messages
///
/// Implementations must keep messages in append order: `list` returns the
/// oldest message first and `trim` drops from the oldest end.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Push a message to the tail of the log
    async fn append(&self, message: &Message) -> Result<(), StoreError>;

    /// All stored messages, oldest first
    async fn list(&self) -> Result<Vec<Message>, StoreError>;

    /// Drop the oldest messages until at most `keep` remain
    async fn trim(&self, keep: usize) -> Result<(), StoreError>;

    /// Remove every stored message
    async fn flush(&self) -> Result<(), StoreError>;

    /// Short name used in logs and `/health`
    fn backend_name(&self) -> &'static str;
}

/// Errors raised by a message store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored message could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid stored record: {0}")]
    InvalidRecord(String),
}
