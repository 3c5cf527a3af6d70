/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Internal server error",
 *   "status": 500,
 *   "details": "redis error: connection refused"
 * }
 * ```
 *
 * `details` is only present for internal failures.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Server] {} ({})", message, self);
        } else {
            tracing::warn!("[Server] Rejected request: {} {}", status.as_u16(), message);
        }

        let mut body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        if let Some(details) = self.details() {
            body["details"] = serde_json::Value::String(details);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_response_shape() {
        let error: BackendError =
            crate::shared::SharedError::validation("content", "Content required").into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Content required");
        assert_eq!(json["status"], 400);
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_response_has_details() {
        let response = BackendError::internal("Failed to clear cache", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to clear cache");
        assert_eq!(json["details"], "boom");
    }
}
