/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - The chat log (store, id generator, event channel)
 * - The bearer secret guarding `/api/cron/{*task}`
 * - The shutdown signal ending realtime streams
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only what they
 * need, e.g. `State(chat_log): State<ChatLog>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;
use crate::backend::chat::log::ChatLog;
use crate::backend::server::shutdown::Shutdown;

/// Shared secret for the administrative flush endpoint
///
/// `None` when no secret is configured, in which case every flush request
/// is rejected.
#[derive(Clone, Default)]
pub struct CronSecret(Option<Arc<str>>);

impl CronSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self(
            secret
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(Arc::from),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Compare a presented token with the configured secret
    ///
    /// The comparison does not stop at the first differing byte.
    pub fn matches(&self, token: &str) -> bool {
        let Some(expected) = self.0.as_deref() else {
            return false;
        };
        let (a, b) = (expected.as_bytes(), token.as_bytes());
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl std::fmt::Debug for CronSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.is_configured() { "Some(<redacted>)" } else { "None" };
        f.debug_tuple("CronSecret").field(&format_args!("{shown}")).finish()
    }
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Chat log backed by the configured store
    pub chat_log: ChatLog,

    /// Bearer secret for `/api/cron/*`
    pub cron_secret: CronSecret,

    /// Ends realtime streams when the server shuts down
    pub shutdown: Shutdown,
}

impl FromRef<AppState> for ChatLog {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat_log.clone()
    }
}

impl FromRef<AppState> for Shutdown {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.shutdown.clone()
    }
}

impl FromRef<AppState> for CronSecret {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cron_secret.clone()
    }
}
