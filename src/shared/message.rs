/**
 * Message Data Structure
 *
 * This module defines the Message struct used for chat messages, the
 * request body accepted by `POST /api/messages`, and the generator that
 * hands out ordering ids.
 *
 * The Message struct is shared between server and client, so the same type
 * is serialized by the handlers and deserialized by the polling client.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::shared::error::SharedError;

/// Opaque ordering token for a message
///
/// Ids are creation times in milliseconds, bumped forward when needed so
/// that they stay unique and strictly increasing. On the wire they are
/// decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MessageId(u64);

impl MessageId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for MessageId {
    type Error = ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents a single chat message
///
/// # Fields
/// * `id` - Unique, increasing ordering token
/// * `content` - The trimmed message text
/// * `username` - The trimmed author name
/// * `created_at` - Creation time, serialized as `createdAt` (RFC3339)
///
/// # Example
/// ```rust
/// use chrono::Utc;
/// use radiochat::shared::{IdGenerator, Message, NewMessage};
///
/// let ids = IdGenerator::new();
/// let now = Utc::now();
/// let valid = NewMessage::new("  hello ", "alice").validate().unwrap();
/// let message = Message::new(ids.next(now), valid, now);
/// assert_eq!(message.content, "hello");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a stored message from validated input
    pub fn new(id: MessageId, valid: ValidMessage, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content: valid.content,
            username: valid.username,
            created_at,
        }
    }
}

/// Body of `POST /api/messages`
///
/// Both fields are optional so that a missing field is reported as a
/// validation error instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A `NewMessage` whose fields are trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub content: String,
    pub username: String,
}

impl NewMessage {
    pub fn new(content: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            username: Some(username.into()),
        }
    }

    /// Trim both fields and reject empty ones
    ///
    /// Content is checked before username.
    pub fn validate(self) -> Result<ValidMessage, SharedError> {
        let content = non_empty_trimmed(self.content)
            .ok_or_else(|| SharedError::validation("content", "Content required"))?;
        let username = non_empty_trimmed(self.username)
            .ok_or_else(|| SharedError::validation("username", "Username required"))?;

        Ok(ValidMessage { content, username })
    }
}

fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Hands out strictly increasing message ids
///
/// The id is the creation time in milliseconds unless that would not be
/// greater than the last id handed out, in which case it is `last + 1`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a message created at `now`
    pub fn next(&self, now: DateTime<Utc>) -> MessageId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let bump = |last: u64| millis.max(last.saturating_add(1));

        let previous = match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
        {
            Ok(previous) | Err(previous) => previous,
        };

        MessageId(bump(previous))
    }

    /// Make sure later ids are greater than `id`
    pub fn observe(&self, id: MessageId) {
        self.last.fetch_max(id.0, Ordering::SeqCst);
    }
}
