/**
 * Chat HTTP Client
 *
 * Thin reqwest wrapper around the server's JSON API. Non-2xx responses are
 * turned into `ClientError::Status` carrying the server's `error` message.
 */

use crate::client::error::ClientError;
use crate::shared::{AppConfig, Message, NewMessage};
use reqwest::{Client, Response};

/// Chat API client
#[derive(Debug, Clone)]
pub struct ChatApi {
    config: AppConfig,
    client: Client,
}

impl ChatApi {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// GET /api/messages
    pub async fn fetch_messages(&self) -> Result<Vec<Message>, ClientError> {
        let response = self
            .client
            .get(self.config.api_url("/api/messages"))
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// POST /api/messages
    pub async fn send_message(&self, content: &str, username: &str) -> Result<Message, ClientError> {
        let response = self
            .client
            .post(self.config.api_url("/api/messages"))
            .json(&NewMessage::new(content, username))
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// GET /api/cron/flush with the bearer secret
    pub async fn flush(&self, secret: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .get(self.config.api_url("/api/cron/flush"))
            .bearer_auth(secret)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// GET /api/messages/stream, returning the open event stream
    pub async fn open_stream(&self) -> Result<Response, ClientError> {
        let response = self
            .client
            .get(self.config.api_url("/api/messages/stream"))
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
