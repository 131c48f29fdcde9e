//! Engine error types

use thiserror::Error;
use verity_store::{EmbeddingError, StoreError};

/// Errors that can occur while verifying an answer
#[derive(Error, Debug)]
pub enum EngineError {
    /// A required input was empty or whitespace only
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    /// Thresholds or weights are out of range
    #[error("Invalid scoring policy: {0}")]
    InvalidPolicy(String),

    /// Retrieval or counter-evidence settings are out of range
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The embedding model failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// True for errors caused by the caller's input rather than the service
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::EmptyInput(_) | EngineError::InvalidPolicy(_))
    }
}
