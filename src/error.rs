//! Engine error taxonomy
//!
//! Every failure crossing the engine boundary is one of these variants,
//! reported as a structured kind + message rather than a bare boolean.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generator::GeneratorError;

/// Errors surfaced by the task engine and its stores
#[derive(Debug, Error)]
pub enum EngineError {
    /// A requested persisted resource is absent. Read paths that can answer
    /// "no data" (today's task, the history listing) translate this into an
    /// explicit empty result instead of propagating it.
    #[error("{what} not found")]
    NotFound { what: String },

    /// The weekly batch yielded no task blocks
    #[error("weekly batch contains no tasks")]
    EmptyBatch,

    /// The external text generator failed or timed out; prior batch and
    /// history state are untouched and no retry is attempted here
    #[error("text generation failed: {0}")]
    ExternalService(#[from] GeneratorError),

    /// Reading or writing batch/history state failed. Distinct from
    /// NotFound: this means the data may exist but could not be used,
    /// so no state change happened.
    #[error("persistence failure at {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// completeToday with no entry for today's date
    #[error("no task entry exists for today")]
    NoEntryForToday,

    /// Rejected at configuration-load time
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn persistence(path: impl AsRef<Path>, source: impl std::fmt::Display) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            message: source.to_string(),
        }
    }

    /// Stable kind tag for structured boundary reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::EmptyBatch => "empty-batch",
            Self::ExternalService(_) => "external-service",
            Self::Persistence { .. } => "persistence",
            Self::NoEntryForToday => "no-entry",
            Self::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(EngineError::not_found("history file").kind(), "not-found");
        assert_eq!(EngineError::EmptyBatch.kind(), "empty-batch");
        assert_eq!(EngineError::NoEntryForToday.kind(), "no-entry");
        assert_eq!(
            EngineError::persistence("/tmp/history.json", "disk full").kind(),
            "persistence"
        );
    }

    #[test]
    fn test_persistence_message_includes_path() {
        let err = EngineError::persistence("/tmp/history.json", "disk full");
        let text = err.to_string();
        assert!(text.contains("/tmp/history.json"));
        assert!(text.contains("disk full"));
    }
}
