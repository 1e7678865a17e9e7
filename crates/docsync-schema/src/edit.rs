//! Field-level editing

use crate::error::EditError;
use crate::path::FieldPath;
use crate::value::FieldValue;

/// Content that supports addressed field edits
pub trait EditableContent {
    /// Write `value` into the field named by `path`
    ///
    /// # Errors
    /// Returns error if the path does not resolve or the value does not fit
    /// the field. The content is unchanged on error.
    fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), EditError>;
}
