//! # Poller
//!
//! Scheduled task that fetches the full message list at a fixed interval
//! and publishes it on a `watch` channel. The first fetch happens right
//! away.
//!
//! Failed fetches are logged and polling continues. The task stops when
//! `stop` is called or when the `Poller` is dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::api::ChatApi;
use crate::shared::Message;

/// Handle to a running polling task
#[derive(Debug)]
pub struct Poller {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling `api` every `interval`
    pub fn spawn(
        api: ChatApi,
        interval: Duration,
        messages: Arc<watch::Sender<Vec<Message>>>,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }

                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = api.fetch_messages() => match result {
                        Ok(latest) => {
                            messages.send_replace(latest);
                        }
                        Err(e) => tracing::warn!("[Poller] Error loading messages: {}", e),
                    },
                }
            }

            tracing::debug!("[Poller] Stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop polling and wait for the task to finish
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
