//! # Chat Session
//!
//! Client-side view of the chat: the chosen username, the latest message
//! snapshot and the background task that keeps it fresh.
//!
//! Updates start on `join` and stop on `change_username` or `leave`. Only one
//! send may be in flight at a time; a second `send` while one is pending is
//! skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::client::api::ChatApi;
use crate::client::error::ClientError;
use crate::client::poller::Poller;
use crate::client::subscription::RealtimeSubscription;
use crate::shared::config::DEFAULT_POLL_INTERVAL;
use crate::shared::Message;

/// Number of messages kept locally, matching the server's retention cap
pub const LOCAL_CAPACITY: usize = 100;

/// How the session keeps its message list current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Refetch the full list every `interval`
    Polling { interval: Duration },
    /// Follow the server's event stream
    Realtime,
}

impl Default for UpdateStrategy {
    fn default() -> Self {
        Self::Polling {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

enum Updater {
    Polling(Poller),
    Realtime(RealtimeSubscription),
}

/// A user's session against one chat server
pub struct ChatSession {
    api: ChatApi,
    strategy: UpdateStrategy,
    username: Option<String>,
    messages: Arc<watch::Sender<Vec<Message>>>,
    updater: Option<Updater>,
    sending: Arc<AtomicBool>,
}

impl ChatSession {
    pub fn new(api: ChatApi, strategy: UpdateStrategy) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            api,
            strategy,
            username: None,
            messages: Arc::new(tx),
            updater: None,
            sending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the username and start receiving updates
    pub fn join(&mut self, username: &str) -> Result<(), ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClientError::EmptyUsername);
        }

        self.stop_updates();
        self.username = Some(username.to_string());
        self.updater = Some(match self.strategy {
            UpdateStrategy::Polling { interval } => {
                Updater::Polling(Poller::spawn(self.api.clone(), interval, self.messages.clone()))
            }
            UpdateStrategy::Realtime => Updater::Realtime(RealtimeSubscription::spawn(
                self.api.clone(),
                LOCAL_CAPACITY,
                self.messages.clone(),
            )),
        });

        tracing::info!("[Session] Joined as {}", username);
        Ok(())
    }

    /// Forget the username and stop updates until the next `join`
    pub fn change_username(&mut self) {
        self.stop_updates();
        self.username = None;
    }

    pub fn leave(&mut self) {
        self.change_username();
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_updating(&self) -> bool {
        match &self.updater {
            Some(Updater::Polling(p)) => p.is_running(),
            Some(Updater::Realtime(s)) => s.is_running(),
            None => false,
        }
    }

    /// Receiver for message snapshots
    pub fn messages(&self) -> watch::Receiver<Vec<Message>> {
        self.messages.subscribe()
    }

    /// Post `content` as the current user, then refresh the list
    ///
    /// Returns `Ok(None)` without contacting the server when the content is
    /// blank, no username is set or another send is still pending.
    pub async fn send(&self, content: &str) -> Result<Option<Message>, ClientError> {
        let content = content.trim();
        let Some(username) = self.username.as_deref() else {
            return Ok(None);
        };
        if content.is_empty() {
            return Ok(None);
        }
        let Some(_guard) = SendGuard::acquire(&self.sending) else {
            tracing::debug!("[Session] Send already in flight, skipping");
            return Ok(None);
        };

        let message = self.api.send_message(content, username).await?;
        if let Err(e) = self.refresh().await {
            tracing::warn!("[Session] Refresh after send failed: {}", e);
        }
        Ok(Some(message))
    }

    /// Fetch the full list once and publish it
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let latest = self.api.fetch_messages().await?;
        self.messages.send_replace(latest);
        Ok(())
    }

    fn stop_updates(&mut self) {
        // Dropping either updater cancels its task.
        self.updater = None;
    }
}

struct SendGuard {
    flag: Arc<AtomicBool>,
}

impl SendGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for SendGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::AppConfig;

    fn session() -> ChatSession {
        let config = AppConfig::builder()
            .server_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        ChatSession::new(ChatApi::new(config), UpdateStrategy::default())
    }

    #[test]
    fn test_default_strategy_polls_every_two_seconds() {
        assert_eq!(
            UpdateStrategy::default(),
            UpdateStrategy::Polling {
                interval: Duration::from_secs(2)
            }
        );
    }

    #[tokio::test]
    async fn test_join_rejects_blank_username() {
        let mut session = session();
        assert!(matches!(session.join("   "), Err(ClientError::EmptyUsername)));
        assert_eq!(session.username(), None);
        assert!(!session.is_updating());
    }

    #[tokio::test]
    async fn test_join_trims_and_change_username_stops_updates() {
        let mut session = session();
        session.join("  alice ").unwrap();
        assert_eq!(session.username(), Some("alice"));
        assert!(session.is_updating());

        session.change_username();
        assert_eq!(session.username(), None);
        assert!(!session.is_updating());
    }

    #[tokio::test]
    async fn test_send_without_username_is_skipped() {
        let session = session();
        assert!(session.send("hello").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_blank_content_is_skipped() {
        let mut session = session();
        session.join("alice").unwrap();
        assert!(session.send("   ").await.unwrap().is_none());
    }

    #[test]
    fn test_send_guard_is_exclusive() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = SendGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(SendGuard::acquire(&flag).is_none());
        drop(first);
        assert!(SendGuard::acquire(&flag).is_some());
    }
}
