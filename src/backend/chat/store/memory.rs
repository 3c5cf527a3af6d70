use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use super::{MessageStore, StoreError};
use crate::shared::Message;

/// Messages held in process memory
///
/// Everything is lost when the server restarts. Each call takes the lock on
/// its own, so an append and the trim that follows it are not one atomic
/// step.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: RwLock<VecDeque<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        self.messages.write().await.push_back(message.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        Ok(self.messages.read().await.iter().cloned().collect())
    }

    async fn trim(&self, keep: usize) -> Result<(), StoreError> {
        let mut messages = self.messages.write().await;
        let excess = messages.len().saturating_sub(keep);
        messages.drain(..excess);
        Ok(())
    }

    async fn flush(&self) -> Result<(), StoreError> {
        self.messages.write().await.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
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

    #[tokio::test]
    async fn test_append_and_list_keep_order() {
        let store = MemoryStore::new();
        for id in 1..=3 {
            store.append(&message(id)).await.unwrap();
        }

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_trim_drops_oldest() {
        let store = MemoryStore::new();
        for id in 1..=5 {
            store.append(&message(id)).await.unwrap();
        }
        store.trim(2).await.unwrap();

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[tokio::test]
    async fn test_trim_below_cap_is_noop() {
        let store = MemoryStore::new();
        store.append(&message(1)).await.unwrap();
        store.trim(100).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_flush_empties() {
        let store = MemoryStore::new();
        store.append(&message(1)).await.unwrap();
        store.flush().await.unwrap();
        assert!(store.is_empty().await);
    }
}
