//! Generator error types

use std::time::Duration;
use thiserror::Error;

/// Errors from the external text-generation service
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Check if this error is transient enough to retry at the HTTP layer
    pub fn is_retryable(&self) -> bool {
        match self {
            GeneratorError::ApiError { status, .. } => *status >= 500 || *status == 429,
            GeneratorError::Network(_) => true,
            GeneratorError::Timeout(_) => true,
            GeneratorError::InvalidResponse(_) => false,
            GeneratorError::Json(_) => false,
        }
    }
}
