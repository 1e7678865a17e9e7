//! Persistence seam
//!
//! [`DocumentStore`] is the external storage collaborator. [`InMemoryStore`]
//! keeps an ordered write log and can inject failures.

use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// How a save is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Written in issue order before any later save
    Immediate,
    /// Written after a quiet period; superseded by any later save
    Debounced,
}

impl SaveMode {
    /// Check if the save may be coalesced
    #[inline]
    #[must_use]
    pub fn is_debounced(self) -> bool {
        matches!(self, Self::Debounced)
    }
}

impl Display for SaveMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Immediate => "immediate",
            Self::Debounced => "debounced",
        })
    }
}

/// Storage for rendered document content
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Persist the full wire text of a document
    ///
    /// # Errors
    /// Returns error if the write is rejected
    async fn save(&self, id: &str, content: &str, mode: SaveMode) -> Result<(), StoreError>;
}

/// One accepted write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRecord {
    /// Document id
    pub id: String,
    /// Wire text written
    pub content: String,
    /// How the save was scheduled
    pub mode: SaveMode,
}

#[derive(Debug, Default)]
struct StoreState {
    log: Vec<SaveRecord>,
    latest: HashMap<String, String>,
    fail_next: usize,
}

/// In-memory store with an ordered write log
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` saves
    pub fn fail_next(&self, n: usize) {
        self.state.lock().fail_next = n;
    }

    /// Accepted writes in order
    #[must_use]
    pub fn writes(&self) -> Vec<SaveRecord> {
        self.state.lock().log.clone()
    }

    /// Number of accepted writes
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().log.len()
    }

    /// Last content written for a document
    #[must_use]
    pub fn latest(&self, id: &str) -> Option<String> {
        self.state.lock().latest.get(id).cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn save(&self, id: &str, content: &str, mode: SaveMode) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(StoreError::rejected(id, "injected failure"));
        }
        state.log.push(SaveRecord {
            id: id.to_string(),
            content: content.to_string(),
            mode,
        });
        state.latest.insert(id.to_string(), content.to_string());
        Ok(())
    }
}
