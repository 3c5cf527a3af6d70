/**
 * Bounded-Retention Chat Log
 *
 * `ChatLog` is the one place where the retention rule lives: every post is
 * an append followed by a trim down to the retention cap, whatever store is
 * underneath. It also assigns ids and timestamps and tells realtime
 * subscribers about new messages and flushes.
 *
 * # Ordering
 *
 * Ids are strictly increasing within one server process. Concurrent posts
 * may reach the store in a different order than their ids; ordering across
 * concurrent writers is best-effort.
 */
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::backend::chat::store::MessageStore;
use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast::{broadcast_event, RealtimeEventBroadcast};
use crate::shared::{ChatEvent, IdGenerator, Message, NewMessage};

/// Maximum number of messages kept system-wide
pub const RETENTION_CAP: usize = 100;

/// Shared chat log handle
///
/// Cheap to clone; all clones share the same store, id generator and
/// broadcast channel.
#[derive(Clone)]
pub struct ChatLog {
    store: Arc<dyn MessageStore>,
    ids: Arc<IdGenerator>,
    capacity: usize,
    events: RealtimeEventBroadcast,
}

impl ChatLog {
    pub fn new(store: Arc<dyn MessageStore>, capacity: usize, events: RealtimeEventBroadcast) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
            capacity,
            events,
        }
    }

    /// Seed the id generator from what the store already holds
    ///
    /// Returns the number of stored messages.
    pub async fn restore(&self) -> Result<usize, BackendError> {
        let messages = self.store.list().await?;
        if let Some(newest) = messages.iter().map(|m| m.id).max() {
            self.ids.observe(newest);
        }
        Ok(messages.len())
    }

    /// Validate, store and announce a new message
    ///
    /// Once the append succeeds the message is returned and broadcast even
    /// if the trim fails; reads stay capped and the next post trims again.
    pub async fn post(&self, body: NewMessage) -> Result<Message, BackendError> {
        let valid = body.validate()?;
        // Microsecond precision, the finest every store round-trips.
        let now = Utc::now().trunc_subsecs(6);
        let message = Message::new(self.ids.next(now), valid, now);

        self.store.append(&message).await?;
        if let Err(e) = self.store.trim(self.capacity).await {
            tracing::error!(
                "[ChatLog] Failed to trim {} store after message {}: {}",
                self.store.backend_name(),
                message.id,
                e
            );
        }

        tracing::debug!(
            "[ChatLog] Stored message {} from {} in {}",
            message.id,
            message.username,
            self.store.backend_name()
        );
        broadcast_event(&self.events, ChatEvent::created(message.clone()));

        Ok(message)
    }

    /// Stored messages, oldest first, never more than the cap
    pub async fn messages(&self) -> Result<Vec<Message>, BackendError> {
        let mut messages = self.store.list().await?;
        // A crash between append and trim can leave the store over the cap.
        if messages.len() > self.capacity {
            let excess = messages.len() - self.capacity;
            messages.drain(..excess);
        }
        Ok(messages)
    }

    /// Remove every stored message
    pub async fn flush(&self) -> Result<(), BackendError> {
        self.store.flush().await?;
        tracing::info!("[ChatLog] Flushed {} store", self.store.backend_name());
        broadcast_event(&self.events, ChatEvent::flushed());
        Ok(())
    }

    /// Receive every event broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::store::{MemoryStore, StoreError};
    use crate::shared::MessageId;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    fn memory_log(capacity: usize) -> (ChatLog, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let (events, _) = broadcast::channel(16);
        (ChatLog::new(store.clone(), capacity, events), store)
    }

    #[tokio::test]
    async fn test_post_trims_and_stores() {
        let (log, _) = memory_log(RETENTION_CAP);
        let message = log.post(NewMessage::new("  hi there ", " alice ")).await.unwrap();

        assert_eq!(message.content, "hi there");
        assert_eq!(message.username, "alice");
        assert_eq!(log.messages().await.unwrap(), vec![message]);
    }

    #[tokio::test]
    async fn test_post_rejects_blank_content() {
        let (log, store) = memory_log(RETENTION_CAP);
        let err = log.post(NewMessage::new(" \n ", "alice")).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Content required");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_retention_keeps_most_recent() {
        let (log, store) = memory_log(RETENTION_CAP);
        for i in 0..=RETENTION_CAP {
            log.post(NewMessage::new(format!("message {i}"), "dj")).await.unwrap();
        }

        let messages = log.messages().await.unwrap();
        assert_eq!(messages.len(), RETENTION_CAP);
        assert_eq!(messages[0].content, "message 1");
        assert_eq!(messages[RETENTION_CAP - 1].content, format!("message {RETENTION_CAP}"));
        assert_eq!(store.len().await, RETENTION_CAP);
    }

    #[tokio::test]
    async fn test_messages_caps_overfull_store() {
        let (log, store) = memory_log(2);
        for id in 1..=3 {
            let valid = NewMessage::new("x", "y").validate().unwrap();
            store
                .append(&Message::new(MessageId::new(id), valid, Utc::now()))
                .await
                .unwrap();
        }

        let ids: Vec<u64> = log.messages().await.unwrap().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_restore_keeps_ids_increasing() {
        let store = Arc::new(MemoryStore::new());
        let future = MessageId::new(u64::try_from(Utc::now().timestamp_millis()).unwrap() + 60_000);
        let valid = NewMessage::new("from before", "dj").validate().unwrap();
        store.append(&Message::new(future, valid, Utc::now())).await.unwrap();

        let (events, _) = broadcast::channel(16);
        let log = ChatLog::new(store, RETENTION_CAP, events);
        assert_eq!(log.restore().await.unwrap(), 1);

        let posted = log.post(NewMessage::new("after", "dj")).await.unwrap();
        assert!(posted.id > future);
    }

    #[tokio::test]
    async fn test_post_and_flush_are_broadcast() {
        let (log, _) = memory_log(RETENTION_CAP);
        let mut rx = log.subscribe();

        let message = log.post(NewMessage::new("hello", "alice")).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::created(message));

        log.flush().await.unwrap();
        assert!(matches!(rx.recv().await.unwrap(), ChatEvent::Flushed { .. }));
        assert!(log.messages().await.unwrap().is_empty());
    }

    struct BrokenStore;

    #[async_trait]
    impl MessageStore for BrokenStore {
        async fn append(&self, _message: &Message) -> Result<(), StoreError> {
            Err(StoreError::InvalidRecord("disk on fire".to_string()))
        }

        async fn list(&self) -> Result<Vec<Message>, StoreError> {
            Err(StoreError::InvalidRecord("disk on fire".to_string()))
        }

        async fn trim(&self, _keep: usize) -> Result<(), StoreError> {
            Ok(())
        }

        async fn flush(&self) -> Result<(), StoreError> {
            Err(StoreError::InvalidRecord("disk on fire".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    struct UntrimmableStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl MessageStore for UntrimmableStore {
        async fn append(&self, message: &Message) -> Result<(), StoreError> {
            self.inner.append(message).await
        }

        async fn list(&self) -> Result<Vec<Message>, StoreError> {
            self.inner.list().await
        }

        async fn trim(&self, _keep: usize) -> Result<(), StoreError> {
            Err(StoreError::InvalidRecord("trim refused".to_string()))
        }

        async fn flush(&self) -> Result<(), StoreError> {
            self.inner.flush().await
        }

        fn backend_name(&self) -> &'static str {
            "untrimmable"
        }
    }

    #[tokio::test]
    async fn test_trim_failure_still_stores_and_broadcasts() {
        let (events, _) = broadcast::channel(16);
        let store = Arc::new(UntrimmableStore { inner: MemoryStore::new() });
        let log = ChatLog::new(store, 2, events);
        let mut rx = log.subscribe();

        let mut posted = Vec::new();
        for i in 0..3 {
            posted.push(log.post(NewMessage::new(format!("m{i}"), "dj")).await.unwrap());
        }

        assert_eq!(rx.recv().await.unwrap(), ChatEvent::created(posted[0].clone()));
        let contents: Vec<String> = log.messages().await.unwrap().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["m1".to_string(), "m2".to_string()]);
    }

    #[tokio::test]
    async fn test_created_at_has_microsecond_precision() {
        let (log, _) = memory_log(RETENTION_CAP);
        for _ in 0..5 {
            let message = log.post(NewMessage::new("tick", "dj")).await.unwrap();
            assert_eq!(message.created_at.timestamp_subsec_nanos() % 1_000, 0);
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let (events, _) = broadcast::channel(16);
        let log = ChatLog::new(Arc::new(BrokenStore), RETENTION_CAP, events);

        let err = log.post(NewMessage::new("hello", "alice")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.details().unwrap().contains("disk on fire"));
    }
}
