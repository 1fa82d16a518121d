//! Engine error types

use thiserror::Error;

/// Failure raised by a table store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store query failed on '{table}': {message}")]
    Query { table: String, message: String },

    #[error("store call on '{table}' timed out after {seconds}s")]
    Timeout { table: String, seconds: u64 },

    #[error("store payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed number in field '{field}': '{value}'")]
    MalformedNumber { field: String, value: String },

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("table store failure: {0}")]
    Store(#[from] StoreError),

    #[error("market feed failure: {0}")]
    Feed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn malformed(field: &str, value: &str) -> Self {
        Self::MalformedNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// True when the failure came from the external store (including timeouts)
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
