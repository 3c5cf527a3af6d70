/**
 * Real-time Subscription Handler
 *
 * Server-Sent Events stream for `GET /api/messages/stream`. Each created
 * message is sent as a `message` event and each flush as a `flush` event;
 * the data of every event is the JSON-encoded `ChatEvent`.
 *
 * # Connection Management
 *
 * - Connections are kept alive using the SSE keep-alive mechanism
 * - Lagged receivers skip the missed events and keep streaming
 * - The stream ends when the server shuts down or the broadcast channel
 *   closes
 */

use crate::backend::chat::log::ChatLog;
use crate::backend::server::shutdown::Shutdown;
use crate::shared::ChatEvent;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{stream, Stream};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;

/// Handle realtime subscription (GET /api/messages/stream)
///
/// # Example Response
///
/// ```http
/// HTTP/1.1 200 OK
/// Content-Type: text/event-stream
///
/// event: message
/// id: 1704067200000
/// data: {"type":"message_created","message":{...}}
///
/// event: flush
/// data: {"type":"flushed","time":"..."}
/// ```
pub async fn handle_realtime_subscription(
    State(chat_log): State<ChatLog>,
    State(shutdown): State<Shutdown>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("[Realtime] Subscription opened");

    let rx = chat_log.subscribe();
    let stream = stream::unfold((rx, shutdown), |(mut rx, shutdown)| async move {
        loop {
            let received = tokio::select! {
                _ = shutdown.triggered() => {
                    tracing::info!("[Realtime] Server shutting down, ending stream");
                    return None;
                }
                received = rx.recv() => received,
            };

            match received {
                Ok(event) => match to_sse_event(&event) {
                    Some(sse_event) => return Some((Ok(sse_event), (rx, shutdown))),
                    None => continue,
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("[Realtime] Broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &ChatEvent) -> Option<Event> {
    let data = match serde_json::to_string(event) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
            return None;
        }
    };

    let sse_event = Event::default().event(event.name()).data(data);
    Some(match event {
        ChatEvent::MessageCreated { message } => sse_event.id(message.id.to_string()),
        ChatEvent::Flushed { .. } => sse_event,
    })
}
