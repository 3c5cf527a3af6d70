/**
 * Message Handlers
 *
 * `GET /api/messages` returns the retained messages, oldest first.
 * `POST /api/messages` validates `{content, username}`, appends the message
 * and returns it with `201 Created`.
 *
 * # Errors
 *
 * * `400 Bad Request` - `Content required` / `Username required`
 * * `500 Internal Server Error` - Malformed JSON or a store failure
 */

use crate::backend::chat::log::ChatLog;
use crate::backend::error::BackendError;
use crate::shared::{Message, NewMessage};
use axum::{body::Bytes, extract::State, http::StatusCode, Json};

/// Handle GET /api/messages
pub async fn list_messages(
    State(chat_log): State<ChatLog>,
) -> Result<Json<Vec<Message>>, BackendError> {
    let messages = chat_log.messages().await?;
    tracing::debug!("[Server] Returning {} messages", messages.len());
    Ok(Json(messages))
}

/// Handle POST /api/messages
///
/// The body is parsed by hand so that a malformed body surfaces as the
/// generic 500 error rather than axum's own rejection.
///
/// # Example Request
///
/// ```http
/// POST /api/messages HTTP/1.1
/// Content-Type: application/json
///
/// {"content":"Great track!","username":"alice"}
/// ```
pub async fn create_message(
    State(chat_log): State<ChatLog>,
    body: Bytes,
) -> Result<(StatusCode, Json<Message>), BackendError> {
    let new_message: NewMessage = serde_json::from_slice(&body)?;
    let message = chat_log.post(new_message).await?;

    tracing::info!("[Server] Message {} posted by {}", message.id, message.username);
    Ok((StatusCode::CREATED, Json(message)))
}
