//! Error types for docsync core
//!
//! - [`SessionError`]: a session operation could not run
//! - [`StoreError`]: persistence failed or the save worker is unavailable
//! - [`ConfigError`]: configuration could not be loaded

use docsync_history::HistoryError;
use docsync_schema::{EditError, Kind, PathError, SchemaError};
use docsync_suggest::SuggestionError;

/// Errors from [`crate::DocumentSession`] operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Content could not be parsed or rendered
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Edit could not be applied
    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    /// Field path could not be parsed
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// Suggestion could not be delivered or found
    #[error("suggestion error: {0}")]
    Suggestion(#[from] SuggestionError),

    /// Version access failed
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    /// Save worker failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Operation not supported for this document kind
    #[error("{op} is not supported for {kind} documents")]
    Unsupported { op: &'static str, kind: Kind },
}

impl SessionError {
    /// Create kind mismatch error
    #[inline]
    #[must_use]
    pub fn kind_mismatch(expected: Kind, actual: Kind) -> Self {
        Self::Schema(SchemaError::KindMismatch { expected, actual })
    }
}

/// Persistence errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store refused the write
    #[error("save rejected for '{id}': {reason}")]
    Rejected { id: String, reason: String },

    /// Save queue is full
    #[error("save queue full")]
    QueueFull,

    /// Save worker has stopped
    #[error("save worker stopped")]
    WorkerStopped,
}

impl StoreError {
    /// Create rejected error
    #[inline]
    #[must_use]
    pub fn rejected(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Check if a later save may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::QueueFull)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML could not be parsed
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors while replaying an event script
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Script line is not a valid event
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    /// An event failed
    #[error("step {step}: {source}")]
    Step { step: usize, source: SessionError },

    /// Session setup or teardown failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Final content could not be encoded
    #[error("cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),
}
