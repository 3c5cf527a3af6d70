/**
 * Redis List Store
 *
 * Messages are kept as JSON strings in a single Redis list, oldest at the
 * head. Appending is `RPUSH`, trimming is `LTRIM -keep -1`, listing is
 * `LRANGE 0 -1` and flushing deletes the key.
 *
 * The append and the trim that follows it are two round trips with no
 * transaction around them.
 */
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use super::{MessageStore, StoreError};
use crate::shared::Message;

/// Default list key
pub const DEFAULT_LIST_KEY: &str = "chat:messages";

/// Messages stored in one Redis list
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
    key: String,
}

impl RedisStore {
    /// Connect to `url` and use the list stored under `key`
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        Ok(Self {
            connection,
            key: key.into(),
        })
    }

    /// Round trip to check the connection
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl MessageStore for RedisStore {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        let payload = serde_json::to_string(message)?;
        let mut conn = self.connection.clone();
        let _: i64 = redis::cmd("RPUSH")
            .arg(&self.key)
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        let mut conn = self.connection.clone();
        let raw: Vec<String> = redis::cmd("LRANGE")
            .arg(&self.key)
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;

        raw.iter()
            .map(|entry| serde_json::from_str(entry).map_err(StoreError::from))
            .collect()
    }

    async fn trim(&self, keep: usize) -> Result<(), StoreError> {
        // LTRIM with a start of -0 would keep the whole list.
        if keep == 0 {
            return self.flush().await;
        }

        let start = -i64::try_from(keep).unwrap_or(i64::MAX);
        let mut conn = self.connection.clone();
        let _: () = redis::cmd("LTRIM")
            .arg(&self.key)
            .arg(start)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let _: i64 = redis::cmd("DEL")
            .arg(&self.key)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{MessageId, NewMessage};
    use chrono::Utc;

    fn message(id: u64) -> Message {
        let valid = NewMessage::new(format!("message {id}"), "dj").validate().unwrap();
        Message::new(MessageId::new(id), valid, Utc::now())
    }

    async fn test_store() -> RedisStore {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let key = format!("chat:test:{}", std::process::id());
        let store = RedisStore::connect(&url, key).await.expect("Failed to connect to Redis");
        store.flush().await.unwrap();
        store
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (REDIS_URL)"]
    async fn test_append_trim_list() {
        let store = test_store().await;
        for id in 1..=5 {
            store.append(&message(id)).await.unwrap();
        }
        store.trim(3).await.unwrap();

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![3, 4, 5]);

        store.flush().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (REDIS_URL)"]
    async fn test_trim_to_zero_empties() {
        let store = test_store().await;
        store.append(&message(1)).await.unwrap();
        store.trim(0).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
