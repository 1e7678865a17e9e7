//! Version cursor state machine
//!
//! Two modes:
//! - **Live**: cursor on the last version; edits append new versions
//! - **Browsing**: cursor on an earlier version; the first edit truncates
//!   everything after the cursor ([`VersionHistory::branch`]) before
//!   appending

use crate::error::HistoryError;
use crate::version::{Version, VersionSummary};
use docsync_schema::ContentHash;
use serde::Serialize;
use tracing::{debug, info};

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards older versions
    Prev,
    /// Towards newer versions
    Next,
}

/// Editing mode derived from the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Cursor on the newest version
    Live,
    /// Cursor on an older version
    Browsing,
}

/// Result of [`VersionHistory::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// Appended at this index
    Appended(usize),
    /// Same hash as the last version; nothing appended
    Duplicate,
}

/// Ordered, append-only snapshots plus a cursor
///
/// # Invariants
/// - `cursor < versions.len()` whenever the history is non-empty
/// - `versions[i].index == i`
#[derive(Debug, Clone)]
pub struct VersionHistory<C> {
    versions: Vec<Version<C>>,
    cursor: usize,
    skip_duplicates: bool,
}

impl<C> Default for VersionHistory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> VersionHistory<C> {
    /// Create empty history that skips duplicate snapshots
    #[must_use]
    pub fn new() -> Self {
        Self {
            versions: Vec::new(),
            cursor: 0,
            skip_duplicates: true,
        }
    }

    /// Set duplicate suppression
    #[must_use]
    pub fn with_skip_duplicates(mut self, skip: bool) -> Self {
        self.skip_duplicates = skip;
        self
    }

    /// Rebuild history from stored snapshots, cursor on the newest
    #[must_use]
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = (C, ContentHash)>) -> Self {
        let versions: Vec<_> = snapshots
            .into_iter()
            .enumerate()
            .map(|(i, (content, hash))| Version::new(i, content, hash))
            .collect();
        let cursor = versions.len().saturating_sub(1);
        Self {
            versions,
            cursor,
            skip_duplicates: true,
        }
    }

    /// Append a snapshot
    ///
    /// In live mode the cursor follows the new version. While browsing the
    /// cursor stays where it is.
    pub fn record(&mut self, content: C, hash: ContentHash) -> Recorded {
        if self.skip_duplicates && self.versions.last().is_some_and(|v| v.hash == hash) {
            debug!(hash = %hash.short(), "duplicate snapshot skipped");
            return Recorded::Duplicate;
        }

        let live = self.is_current_version();
        let index = self.versions.len();
        self.versions.push(Version::new(index, content, hash));
        if live {
            self.cursor = index;
        }
        info!(index, hash = %hash.short(), live, "version recorded");
        Recorded::Appended(index)
    }

    /// Move to the previous version, returning whether the cursor moved
    pub fn prev(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "history prev");
        true
    }

    /// Move to the next version, returning whether the cursor moved
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "history next");
        true
    }

    /// Move one step in `direction`
    pub fn navigate(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Prev => self.prev(),
            Direction::Next => self.next(),
        }
    }

    /// Jump to an index
    ///
    /// # Errors
    /// Returns error if the index does not exist
    pub fn go_to(&mut self, index: usize) -> Result<&Version<C>, HistoryError> {
        if self.versions.is_empty() {
            return Err(HistoryError::Empty);
        }
        if index >= self.versions.len() {
            return Err(HistoryError::OutOfRange {
                index,
                len: self.versions.len(),
            });
        }
        self.cursor = index;
        Ok(&self.versions[index])
    }

    /// Drop versions after the cursor so the next record continues from it
    ///
    /// Returns how many versions were discarded. A no-op in live mode.
    pub fn branch(&mut self) -> usize {
        let keep = (self.cursor + 1).min(self.versions.len());
        let dropped = self.versions.len() - keep;
        if dropped > 0 {
            self.versions.truncate(keep);
            info!(cursor = self.cursor, dropped, "history branched");
        }
        dropped
    }

    /// Current mode
    #[must_use]
    pub fn mode(&self) -> HistoryMode {
        if self.is_current_version() {
            HistoryMode::Live
        } else {
            HistoryMode::Browsing
        }
    }

    /// True when the cursor is on the newest version (or history is empty)
    #[must_use]
    pub fn is_current_version(&self) -> bool {
        self.cursor + 1 >= self.versions.len()
    }

    /// Check if `prev` would move
    #[must_use]
    pub fn can_go_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Check if `next` would move
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        !self.is_current_version()
    }

    /// Version under the cursor
    #[must_use]
    pub fn current(&self) -> Option<&Version<C>> {
        self.versions.get(self.cursor)
    }

    /// Newest version
    #[must_use]
    pub fn latest(&self) -> Option<&Version<C>> {
        self.versions.last()
    }

    /// Version at an index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Version<C>> {
        self.versions.get(index)
    }

    /// Cursor position
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of versions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Metadata for every version, oldest first
    #[must_use]
    pub fn summaries(&self) -> Vec<VersionSummary> {
        self.versions.iter().map(Version::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn h(n: u8) -> ContentHash {
        ContentHash::compute(&[n])
    }

    fn history(n: u8) -> VersionHistory<u8> {
        let mut history = VersionHistory::new();
        for i in 0..n {
            history.record(i, h(i));
        }
        history
    }

    #[test]
    fn empty_history_is_live() {
        let mut history = VersionHistory::<u8>::new();
        assert_eq!(history.mode(), HistoryMode::Live);
        assert!(!history.prev());
        assert!(!history.next());
        assert!(history.current().is_none());
        assert_eq!(history.go_to(0).unwrap_err(), HistoryError::Empty);
    }

    #[test]
    fn record_follows_when_live() {
        let history = history(3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current().unwrap().content, 2);
        assert!(history.is_current_version());
    }

    #[test]
    fn record_stays_put_when_browsing() {
        let mut history = history(3);
        history.prev();
        assert_eq!(history.record(9, h(9)), Recorded::Appended(3));
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.mode(), HistoryMode::Browsing);
    }

    #[test]
    fn duplicates_skipped_unless_disabled() {
        let mut history = history(1);
        assert_eq!(history.record(0, h(0)), Recorded::Duplicate);
        assert_eq!(history.len(), 1);

        let mut history = history.with_skip_duplicates(false);
        assert_eq!(history.record(0, h(0)), Recorded::Appended(1));
    }

    #[test]
    fn clamped_at_boundaries() {
        let mut history = history(2);
        assert!(!history.next());
        assert!(history.prev());
        assert!(!history.prev());
        assert_eq!(history.cursor(), 0);
        assert!(history.can_go_next());
        assert!(!history.can_go_prev());
    }

    #[test]
    fn branch_truncates_after_cursor() {
        let mut history = history(4);
        history.navigate(Direction::Prev);
        history.navigate(Direction::Prev);
        assert_eq!(history.branch(), 2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.mode(), HistoryMode::Live);

        assert_eq!(history.record(7, h(7)), Recorded::Appended(2));
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.branch(), 0);
    }

    #[test]
    fn go_to_checks_range() {
        let mut history = history(3);
        assert_eq!(history.go_to(1).unwrap().content, 1);
        assert_eq!(
            history.go_to(5).unwrap_err(),
            HistoryError::OutOfRange { index: 5, len: 3 }
        );
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn from_snapshots_starts_live() {
        let history = VersionHistory::from_snapshots([(1u8, h(1)), (2, h(2))]);
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.summaries()[1].index, 1);
    }
}
