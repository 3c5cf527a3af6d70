/**
 * Real-time Event Broadcasting
 *
 * Chat events are broadcast using `tokio::sync::broadcast`, a
 * multi-producer, multi-consumer channel. Every realtime subscriber gets a
 * copy of each event; a subscriber that falls too far behind skips ahead.
 */

use crate::shared::ChatEvent;
use tokio::sync::broadcast;

/// Channel capacity for chat events
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Sender half of the chat event channel
pub type RealtimeEventBroadcast = broadcast::Sender<ChatEvent>;

/// Create the chat event channel
pub fn event_channel() -> RealtimeEventBroadcast {
    let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    tx
}

/// Broadcast a chat event to all subscribers
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: ChatEvent) -> usize {
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] Event broadcast to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay
            tracing::debug!("[Realtime] No subscribers to receive event");
            0
        }
    }
}
