//! Client error types

use busway_core::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not the JSON we expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_decode() => GatewayError::InvalidResponse(e.to_string()),
            ClientError::Http(e) => GatewayError::Transport(e.to_string()),
            ClientError::InvalidResponse(msg) => GatewayError::InvalidResponse(msg),
            ClientError::Serialization(e) => GatewayError::InvalidResponse(e.to_string()),
            ClientError::Config(e) => GatewayError::Transport(e.to_string()),
        }
    }
}
