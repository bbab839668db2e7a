//! Error types for adder-persistence.

use thiserror::Error;

/// Persistence error types.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for persistence operations.
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;
