use thiserror::Error;

use crate::shared::ConfigError;

/// Errors raised by the chat client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure or undecodable response body
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `join` was called with an empty or whitespace-only username
    #[error("username required")]
    EmptyUsername,
}

impl ClientError {
    /// HTTP status returned by the server, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
