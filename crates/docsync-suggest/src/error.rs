//! Suggestion errors

use crate::wire::SuggestionType;
use docsync_schema::EditError;

/// Errors while building or tracking suggestions
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    /// Malformed suggestion JSON
    #[error("malformed suggestion: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Change payload lacks a field its type requires
    #[error("{kind} suggestion is missing change.{field}")]
    MissingField {
        kind: SuggestionType,
        field: &'static str,
    },

    /// Change names a field other than the one its type edits
    #[error("{kind} suggestion targets '{actual}', expected '{expected}'")]
    FieldMismatch {
        kind: SuggestionType,
        expected: &'static str,
        actual: String,
    },

    /// Change value has the wrong shape
    #[error("invalid suggestion value: {0}")]
    InvalidValue(#[from] EditError),

    /// Suggestion addressed to another document
    #[error("suggestion for document '{actual}' delivered to '{expected}'")]
    WrongDocument { expected: String, actual: String },

    /// Id already delivered
    #[error("duplicate suggestion id: {0}")]
    DuplicateId(String),

    /// No suggestion with this id
    #[error("suggestion not found: {0}")]
    NotFound(String),
}
