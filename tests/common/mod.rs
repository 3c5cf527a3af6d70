//! Common test utilities and helpers
//!
//! Builds an in-process server over a `MemoryStore` so API tests need no
//! external services.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use radiochat::backend::chat::store::{MemoryStore, MessageStore};
use radiochat::backend::realtime::event_channel;
use radiochat::backend::routes::create_router;
use radiochat::backend::server::{AppState, CronSecret, Shutdown};
use radiochat::backend::{ChatLog, RETENTION_CAP};

pub const TEST_SECRET: &str = "test-cron-secret";

/// Chat log over a fresh memory store
pub fn memory_chat_log() -> ChatLog {
    let store: Arc<dyn MessageStore> = Arc::new(MemoryStore::new());
    ChatLog::new(store, RETENTION_CAP, event_channel())
}

/// Test server over `store`, guarded by `TEST_SECRET`
pub fn test_server_with_store(store: Arc<dyn MessageStore>) -> (TestServer, ChatLog) {
    serve(ChatLog::new(store, RETENTION_CAP, event_channel()), Some(TEST_SECRET))
}

/// Test server with the given cron secret
pub fn test_server_with_secret(secret: Option<&str>) -> (TestServer, ChatLog) {
    serve(memory_chat_log(), secret)
}

fn serve(chat_log: ChatLog, secret: Option<&str>) -> (TestServer, ChatLog) {
    let state = AppState {
        chat_log: chat_log.clone(),
        cron_secret: CronSecret::new(secret.map(str::to_string)),
        shutdown: Shutdown::new(),
    };
    let server = TestServer::new(create_router(state)).expect("failed to start test server");
    (server, chat_log)
}

/// Test server guarded by `TEST_SECRET`
pub fn test_server() -> (TestServer, ChatLog) {
    test_server_with_secret(Some(TEST_SECRET))
}

pub fn bearer(token: &str) -> axum::http::HeaderValue {
    axum::http::HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
}
