//! Scheduled Maintenance Endpoints
//!
//! `GET /api/cron` and `GET /api/cron/{*task}` are meant to be hit by an
//! external scheduler. Every task currently flushes the message store. The
//! routes are guarded by the bearer secret from `CRON_SECRET`.

/// Flush handler
pub mod handlers;

pub use handlers::{handle_cron_flush, FlushResponse};
