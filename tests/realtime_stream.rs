//! Realtime stream tests
//!
//! Serves the router on a real socket and follows `/api/messages/stream`
//! with the client's `RealtimeSubscription`.

#![cfg(feature = "ssr")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use radiochat::backend::routes::create_router;
use radiochat::backend::server::{AppState, CronSecret, Shutdown};
use radiochat::client::{ChatApi, RealtimeSubscription, LOCAL_CAPACITY};
use radiochat::shared::{AppConfig, Message};
use tokio::sync::watch;

use common::{memory_chat_log, TEST_SECRET};

struct RunningServer {
    url: String,
    shutdown: Shutdown,
    handle: tokio::task::JoinHandle<()>,
}

/// Serve the router with graceful shutdown wired to `Shutdown`, as the
/// server binary does
async fn start_server() -> RunningServer {
    let shutdown = Shutdown::new();
    let state = AppState {
        chat_log: memory_chat_log(),
        cron_secret: CronSecret::new(Some(TEST_SECRET.to_string())),
        shutdown: shutdown.clone(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let signal = shutdown.clone();
    let handle = tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .with_graceful_shutdown(async move { signal.triggered().await })
            .await
            .unwrap();
    });

    RunningServer {
        url: format!("http://{addr}"),
        shutdown,
        handle,
    }
}

async fn spawn_server() -> String {
    // Dropping the handle detaches the server task.
    start_server().await.url
}

async fn wait_for<F>(rx: &mut watch::Receiver<Vec<Message>>, mut done: F)
where
    F: FnMut(&[Message]) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if done(&rx.borrow_and_update()) {
                return;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("condition not reached within timeout");
}

#[tokio::test]
async fn test_subscription_follows_posts_and_flushes() {
    let url = spawn_server().await;
    let api = ChatApi::new(AppConfig::builder().server_url(url).build().unwrap());

    let (tx, mut rx) = watch::channel(Vec::new());
    let _subscription = RealtimeSubscription::spawn(api.clone(), LOCAL_CAPACITY, Arc::new(tx));

    // Seeded once the stream is open.
    rx.changed().await.unwrap();

    api.send_message("over the air", "eve").await.unwrap();
    wait_for(&mut rx, |m| m.iter().any(|m| m.content == "over the air")).await;

    api.flush(TEST_SECRET).await.unwrap();
    wait_for(&mut rx, |m| m.is_empty()).await;
}

#[tokio::test]
async fn test_stream_content_type() {
    let url = spawn_server().await;

    let response = reqwest::Client::new()
        .get(format!("{url}/api/messages/stream"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");
}

#[tokio::test]
async fn test_graceful_shutdown_ends_open_streams() {
    let server = start_server().await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/messages/stream", server.url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    server.shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server kept running with a stream open")
        .unwrap();
    drop(response);
}
