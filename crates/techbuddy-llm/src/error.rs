//! Error types for completion backend calls.

use std::time::Duration;

/// Failure of a single completion call. Always terminal for that turn.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode backend response: {0}")]
    Decode(String),
    #[error("backend returned no completion")]
    EmptyResponse,
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if err.is_timeout() {
            GatewayError::Transport(format!("timed out: {}", err))
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}
