/**
 * Server Initialization
 *
 * The server initialization follows these steps:
 * 1. Create the realtime event channel
 * 2. Open the configured message store
 * 3. Restore the id floor from whatever the store already holds
 * 4. Create and configure the router
 */

use axum::Router;
use crate::backend::chat::log::{ChatLog, RETENTION_CAP};
use crate::backend::realtime::event_channel;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, ServerConfig};
use crate::backend::server::shutdown::Shutdown;
use crate::backend::server::state::{AppState, CronSecret};

/// Create and configure the Axum application
///
/// # Error Handling
///
/// - Unreachable store: falls back to the in-memory store
/// - Failed restore: logged, ids start from the current time
/// - Missing `CRON_SECRET`: logged, the flush endpoint rejects every request
///
/// Realtime streams end when `shutdown` is triggered.
pub async fn create_app(config: ServerConfig, shutdown: Shutdown) -> Router<()> {
    tracing::info!("Initializing radiochat server");

    let store = load_store(&config).await;
    let chat_log = ChatLog::new(store, RETENTION_CAP, event_channel());

    match chat_log.restore().await {
        Ok(count) => tracing::info!("Restored {} messages from {} store", count, chat_log.backend_name()),
        Err(e) => tracing::warn!("Failed to restore messages, starting fresh: {}", e),
    }

    let cron_secret = CronSecret::new(config.cron_secret.clone());
    if !cron_secret.is_configured() {
        tracing::warn!("CRON_SECRET not set. /api/cron/* will reject every request.");
    }

    let app = create_router(AppState {
        chat_log,
        cron_secret,
        shutdown,
    });

    tracing::info!("Router configured");
    app
}
