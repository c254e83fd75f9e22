//! Error types
//!
//! Transport errors ([`ApiError`], [`ChannelError`]) stay inside the sync
//! layer. What reaches the store are the cloneable [`FetchError`] and
//! [`SaveError`], which only carry the message a view would show.

use thiserror::Error;

/// Message shown when a save fails without a usable error message.
pub const SAVE_FALLBACK_MESSAGE: &str = "Failed to save trip";

/// REST call failure
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Push channel failure
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("websocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("invalid frame: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("`deleted` event without a trip id")]
    MissingId,
}

impl From<tokio_tungstenite::tungstenite::Error> for ChannelError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ChannelError::WebSocket(Box::new(e))
    }
}

/// The initial load failed
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        Self::new(err.to_string())
    }
}

/// A create or update failed
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SaveError {
    message: String,
}

impl SaveError {
    /// Build from a message, falling back to [`SAVE_FALLBACK_MESSAGE`] when it is blank.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: SAVE_FALLBACK_MESSAGE.to_string(),
            };
        }
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ApiError> for SaveError {
    fn from(err: ApiError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_fallback() {
        assert_eq!(SaveError::new("").message(), SAVE_FALLBACK_MESSAGE);
        assert_eq!(SaveError::new("  ").message(), SAVE_FALLBACK_MESSAGE);
        assert_eq!(SaveError::new("conflict").to_string(), "conflict");
    }

    #[test]
    fn test_api_error_messages_carry_over() {
        let status = ApiError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".into(),
        };
        let fetch = FetchError::from(status);
        assert_eq!(
            fetch.message(),
            "server responded with 502 Bad Gateway: upstream down"
        );

        let decode = serde_json::from_str::<u8>("nope").unwrap_err();
        let save = SaveError::from(ApiError::Decode(decode));
        assert!(save.message().starts_with("invalid response body"));
    }

    #[test]
    fn test_channel_error_display() {
        assert_eq!(
            ChannelError::UnknownEvent("renamed".into()).to_string(),
            "unknown event `renamed`"
        );
        assert_eq!(
            ChannelError::MissingId.to_string(),
            "`deleted` event without a trip id"
        );
    }
}
