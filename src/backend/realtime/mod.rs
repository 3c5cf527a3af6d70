//! Real-time Update Module
//!
//! Pushes chat events to subscribed clients as they happen, as an
//! alternative to polling `/api/messages`.
//!
//! # Architecture
//!
//! - **`broadcast`** - Event channel and broadcast helper
//! - **`subscription`** - Server-Sent Events subscription handler
//!
//! # Event Types
//!
//! - `message` - A message was posted
//! - `flush` - The store was flushed through the cron endpoint

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

// Re-export commonly used types and functions
pub use broadcast::{broadcast_event, event_channel, RealtimeEventBroadcast};
pub use subscription::handle_realtime_subscription;
