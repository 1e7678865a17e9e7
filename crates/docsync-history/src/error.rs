//! History errors

/// Errors from direct version access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// No versions recorded yet
    #[error("history is empty")]
    Empty,

    /// Index past the last version
    #[error("version {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}
