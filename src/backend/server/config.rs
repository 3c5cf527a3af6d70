/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables (optionally seeded from a `.env` file) and opening the
 * configured message store.
 *
 * # Configuration Sources
 *
 * | variable         | meaning                          | default         |
 * |------------------|----------------------------------|-----------------|
 * | `SERVER_PORT`    | listen port                      | `3000`          |
 * | `CHAT_BACKEND`   | `memory`, `redis` or `postgres`  | `memory`        |
 * | `REDIS_URL`      | Redis connection URL             | none            |
 * | `REDIS_LIST_KEY` | Redis list key                   | `chat:messages` |
 * | `DATABASE_URL`   | PostgreSQL connection URL        | none            |
 * | `CRON_SECRET`    | bearer secret for `/api/cron/...`| none            |
 *
 * Credentials are only ever read from the environment.
 *
 * # Error Handling
 *
 * A store that fails to open is logged and replaced by the in-memory store
 * so the server still starts.
 */

use std::str::FromStr;
use std::sync::Arc;

use crate::backend::chat::store::redis_list::DEFAULT_LIST_KEY;
use crate::backend::chat::store::{MemoryStore, MessageStore, PostgresStore, RedisStore, StoreError};
use crate::shared::ConfigError;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Which store backs the chat log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidValue("CHAT_BACKEND", other.to_string())),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub backend: StoreBackend,
    pub redis_url: Option<String>,
    pub redis_list_key: String,
    pub database_url: Option<String>,
    pub cron_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend: StoreBackend::Memory,
            redis_url: None,
            redis_list_key: DEFAULT_LIST_KEY.to_string(),
            database_url: None,
            cron_secret: None,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    /// Load the configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env_var("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port.clone()))?,
            None => DEFAULT_PORT,
        };

        let backend = match env_var("CHAT_BACKEND") {
            Some(name) => name.parse()?,
            None => StoreBackend::Memory,
        };

        Ok(Self {
            port,
            backend,
            redis_url: env_var("REDIS_URL"),
            redis_list_key: env_var("REDIS_LIST_KEY").unwrap_or_else(|| DEFAULT_LIST_KEY.to_string()),
            database_url: env_var("DATABASE_URL"),
            cron_secret: env_var("CRON_SECRET"),
        })
    }
}

/// Open the configured store
///
/// # Returns
///
/// The configured store, or the in-memory store if the configured one
/// cannot be opened.
pub async fn load_store(config: &ServerConfig) -> Arc<dyn MessageStore> {
    match open_store(config).await {
        Ok(store) => {
            tracing::info!("Using {} message store", store.backend_name());
            store
        }
        Err(e) => {
            tracing::error!("Failed to open {:?} message store: {}", config.backend, e);
            tracing::warn!("Falling back to the in-memory message store");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn open_store(config: &ServerConfig) -> Result<Arc<dyn MessageStore>, OpenStoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(ConfigError::MissingValue("REDIS_URL"))?;
            tracing::info!("Connecting to Redis...");
            let store = RedisStore::connect(url, config.redis_list_key.clone()).await?;
            store.ping().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::MissingValue("DATABASE_URL"))?;
            tracing::info!("Connecting to database...");
            let store = PostgresStore::connect(url).await?;
            tracing::info!("Running database migrations...");
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum OpenStoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
