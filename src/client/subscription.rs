//! # Realtime Subscription
//!
//! Keeps a local message list up to date from the server's event stream
//! (`GET /api/messages/stream`) instead of polling. The list is seeded with
//! one full fetch each time the stream (re)connects, then every `ChatEvent`
//! is applied to it.
//!
//! The task reconnects after `RECONNECT_DELAY` when the stream ends or
//! fails, and stops when the `RealtimeSubscription` is dropped.

use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::api::ChatApi;
use crate::client::error::ClientError;
use crate::shared::{ChatEvent, Message};

/// Delay before reconnecting a dropped stream
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Handle to a running realtime subscription
#[derive(Debug)]
pub struct RealtimeSubscription {
    handle: JoinHandle<()>,
}

impl RealtimeSubscription {
    /// Start following the event stream of `api`
    ///
    /// `capacity` bounds the local list the same way the server bounds its
    /// log.
    pub fn spawn(api: ChatApi, capacity: usize, messages: Arc<watch::Sender<Vec<Message>>>) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                if let Err(e) = follow(&api, capacity, &messages).await {
                    tracing::warn!("[Realtime] Subscription error: {}", e);
                } else {
                    tracing::info!("[Realtime] Stream ended");
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn follow(
    api: &ChatApi,
    capacity: usize,
    messages: &watch::Sender<Vec<Message>>,
) -> Result<(), ClientError> {
    let response = api.open_stream().await?;

    // Seed after the stream is open so nothing posted in between is missed.
    let mut seeded = api.fetch_messages().await?;
    if seeded.len() > capacity {
        seeded.drain(..seeded.len() - capacity);
    }
    messages.send_replace(seeded);

    let mut parser = SseParser::default();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for data in parser.feed(&chunk) {
            match serde_json::from_str::<ChatEvent>(&data) {
                Ok(event) => messages.send_modify(|list| event.apply(list, capacity)),
                Err(e) => tracing::warn!("[Realtime] Ignoring undecodable event: {}", e),
            }
        }
    }

    Ok(())
}

/// Incremental Server-Sent Events parser
///
/// Only `data:` fields matter here; event names, ids and comments are
/// skipped. Multi-line data is joined with `\n`. Chunks are buffered as
/// bytes and a block is decoded only once its blank-line terminator has
/// arrived, so a character split across chunks survives intact.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    /// Feed a chunk and return the data of every event it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            let block = String::from_utf8_lossy(&block);
            let data: Vec<&str> = block
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|value| value.strip_prefix(' ').unwrap_or(value))
                .collect();

            if !data.is_empty() {
                events.push(data.join("\n"));
            }
        }
        events
    }
}
