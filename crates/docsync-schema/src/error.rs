//! Error types for the schema layer
//!
//! - [`SchemaError`]: content could not be parsed, validated or rendered
//! - [`EditError`]: a mutation could not be applied to a structure

use crate::kind::Kind;
use crate::path::FieldPath;

/// Errors while turning wire text into a canonical structure (or back)
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Malformed or truncated JSON
    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Id repeated inside one collection
    #[error("duplicate id '{id}' in {collection}")]
    DuplicateId {
        collection: &'static str,
        id: String,
    },

    /// Unknown document kind name
    #[error("unknown document kind: {0}")]
    UnknownKind(String),

    /// Payload declared for a different kind
    #[error("kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: Kind, actual: Kind },
}

impl SchemaError {
    /// Check if error is the transient kind produced mid-stream
    ///
    /// Truncated JSON is expected while generation is in progress.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Malformed(e) if e.is_eof() || e.is_syntax())
    }
}

/// Errors while mutating a canonical structure
///
/// Every mutator checks all lookups and values before writing, so an `Err`
/// always means the structure is untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// Referenced member does not exist
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// Path does not name an editable field
    #[error("unknown field: {0}")]
    UnknownField(FieldPath),

    /// Value has the wrong shape for the field
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl EditError {
    /// Create not-found error
    #[inline]
    #[must_use]
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            id: id.into(),
        }
    }

    /// Create invalid-value error
    #[inline]
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is a structural lookup failure
    #[inline]
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_json_is_transient() {
        let err: SchemaError = serde_json::from_str::<serde_json::Value>(r#"{"columns": [{"#)
            .unwrap_err()
            .into();
        assert!(err.is_transient());
    }

    #[test]
    fn duplicate_id_is_not_transient() {
        let err = SchemaError::DuplicateId {
            collection: "columns",
            id: "c1".to_string(),
        };
        assert!(!err.is_transient());
        assert!(err.to_string().contains("c1"));
    }

    #[test]
    fn edit_error_helpers() {
        assert!(EditError::not_found("column", "c9").is_lookup_failure());
        assert!(!EditError::invalid_value("target", "not a number").is_lookup_failure());
    }
}
