//! Recorded snapshots

use chrono::{DateTime, Utc};
use docsync_schema::ContentHash;
use serde::Serialize;

/// One full-content snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version<C> {
    /// Position in the history
    pub index: usize,
    /// Snapshot content
    pub content: C,
    /// Structural hash of `content`
    pub hash: ContentHash,
    /// When the snapshot was recorded
    pub recorded_at: DateTime<Utc>,
}

impl<C> Version<C> {
    /// Create version stamped now
    #[must_use]
    pub fn new(index: usize, content: C, hash: ContentHash) -> Self {
        Self {
            index,
            content,
            hash,
            recorded_at: Utc::now(),
        }
    }

    /// Lightweight description without content
    #[must_use]
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            index: self.index,
            hash: self.hash,
            recorded_at: self.recorded_at,
        }
    }
}

/// Version metadata for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    /// Position in the history
    pub index: usize,
    /// Structural hash
    pub hash: ContentHash,
    /// When the snapshot was recorded
    pub recorded_at: DateTime<Utc>,
}
