/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Messages
 * - `GET /api/messages` - Retained messages, oldest first
 * - `POST /api/messages` - Post a message
 * - `GET /api/messages/stream` - Realtime event stream (SSE)
 *
 * ## Administration
 * - `GET /api/cron` and `GET /api/cron/{*task}` - Flush the store (bearer secret)
 *
 * ## Health
 * - `GET /health` - Liveness and active backend
 */

use axum::{extract::State, routing::get, Json, Router};
use crate::backend::chat::handlers::{create_message, list_messages};
use crate::backend::chat::log::ChatLog;
use crate::backend::cron::handle_cron_flush;
use crate::backend::realtime::handle_realtime_subscription;
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/messages", get(list_messages).post(create_message))
        .route("/api/messages/stream", get(handle_realtime_subscription))
        .route("/api/cron", get(handle_cron_flush))
        .route("/api/cron/{*task}", get(handle_cron_flush))
        .route("/health", get(health))
}

async fn health(State(chat_log): State<ChatLog>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "backend": chat_log.backend_name(),
    }))
}
