//! Error types for adder-feed.

use thiserror::Error;

/// Feed error types.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed feed message: {0}")]
    Malformed(String),

    #[error("Gave up reconnecting after {0} attempts")]
    ReconnectExhausted(u32),
}

/// Result type alias for feed operations.
pub type FeedResult<T> = std::result::Result<T, FeedError>;
