/**
 * Realtime Chat Events
 *
 * This module defines the events pushed to realtime subscribers. The server
 * broadcasts one event per created message and one per flush; the realtime
 * client applies them to its local copy of the message list.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::message::Message;

/// Event broadcast to all realtime subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to the log
    MessageCreated { message: Message },
    /// Every stored message was removed
    Flushed { time: DateTime<Utc> },
}

impl ChatEvent {
    pub fn created(message: Message) -> Self {
        Self::MessageCreated { message }
    }

    pub fn flushed() -> Self {
        Self::Flushed { time: Utc::now() }
    }

    /// SSE event name for this event
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageCreated { .. } => "message",
            Self::Flushed { .. } => "flush",
        }
    }

    /// Apply this event to a locally held message list
    ///
    /// `capacity` bounds the list the same way the server does, oldest
    /// messages first out. Duplicates (same id) are ignored.
    pub fn apply(self, messages: &mut Vec<Message>, capacity: usize) {
        match self {
            Self::MessageCreated { message } => {
                if messages.iter().any(|m| m.id == message.id) {
                    return;
                }
                messages.push(message);
                if messages.len() > capacity {
                    let excess = messages.len() - capacity;
                    messages.drain(..excess);
                }
            }
            Self::Flushed { .. } => messages.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::message::{MessageId, NewMessage};

    fn message(id: u64) -> Message {
        let valid = NewMessage::new(format!("m{id}"), "alice").validate().unwrap();
        Message::new(MessageId::new(id), valid, Utc::now())
    }

    #[test]
    fn test_event_tagging() {
        let json = serde_json::to_value(ChatEvent::created(message(7))).unwrap();
        assert_eq!(json["type"], "message_created");
        assert_eq!(json["message"]["id"], "7");

        let json = serde_json::to_value(ChatEvent::flushed()).unwrap();
        assert_eq!(json["type"], "flushed");
    }

    #[test]
    fn test_apply_bounds_list() {
        let mut messages = vec![message(1), message(2)];
        ChatEvent::created(message(3)).apply(&mut messages, 2);
        let ids: Vec<u64> = messages.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_apply_ignores_duplicates() {
        let mut messages = vec![message(1)];
        ChatEvent::created(message(1)).apply(&mut messages, 10);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_apply_flush_clears() {
        let mut messages = vec![message(1), message(2)];
        ChatEvent::flushed().apply(&mut messages, 10);
        assert!(messages.is_empty());
    }
}
