use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::chat::log::ChatLog;
use crate::backend::error::BackendError;
use crate::backend::middleware::CronAuthorized;

/// Body returned by a successful flush
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlushResponse {
    pub success: bool,
    pub message: String,
    pub time: DateTime<Utc>,
}

/// Handle GET /api/cron/*
///
/// Requires `Authorization: Bearer <CRON_SECRET>`; a request without it is
/// rejected with 401 before the store is touched.
pub async fn handle_cron_flush(
    _authorized: CronAuthorized,
    State(chat_log): State<ChatLog>,
) -> Result<Json<FlushResponse>, BackendError> {
    chat_log.flush().await.map_err(|e| {
        let details = e.details().unwrap_or_else(|| e.to_string());
        BackendError::internal("Failed to clear cache", details)
    })?;

    tracing::info!("[Cron] Message store cleared");
    Ok(Json(FlushResponse {
        success: true,
        message: "Cache cleared".to_string(),
        time: Utc::now(),
    }))
}
