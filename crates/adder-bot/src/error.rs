//! Application error types.

use thiserror::Error;

/// Top-level application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] adder_feed::FeedError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] adder_gateway::GatewayError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] adder_persistence::PersistenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] adder_telemetry::TelemetryError),
}

/// Result type alias for application operations.
pub type AppResult<T> = std::result::Result<T, AppError>;
