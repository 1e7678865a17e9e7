//! Reconciliation engine
//!
//! Owns the canonical content of one document and decides what it becomes
//! for every incoming event:
//! - external payloads (generation deltas) replace content when they parse,
//!   unless a local edit whose save is still outstanding has armed the guard
//! - local edits apply to a copy and swap in only when the whole mutation
//!   succeeds
//! - snapshot loads (history navigation) replace content unconditionally
//!
//! Collections are persistent vectors, so the copy taken for each edit
//! shares structure with the canonical one.

use crate::store::SaveMode;
use docsync_schema::{ContentHash, DocumentKind, EditError, SchemaError};
use std::fmt::{self, Debug, Formatter};
use tracing::{debug, info, warn};

/// Actor behind the last change to canonical content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Generation payload or snapshot load
    External,
    /// Human edit or accepted suggestion
    Local,
}

/// What happened to an external payload
#[derive(Debug)]
pub enum ExternalOutcome {
    /// Canonical content replaced
    Applied { revision: u64 },
    /// Payload matches canonical content (echo of our own save)
    Unchanged,
    /// Ignored for one cycle after a local edit
    Guarded,
    /// Incomplete JSON mid-stream; canonical unchanged
    Incomplete(SchemaError),
    /// Well-formed JSON that breaks an invariant; canonical unchanged
    Invalid(SchemaError),
}

impl ExternalOutcome {
    /// Check if canonical content was replaced
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// What happened to a local edit
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome<T> {
    /// Mutation applied; content must be saved with `mode`
    Applied {
        value: T,
        revision: u64,
        mode: SaveMode,
    },
    /// A lookup failed; nothing changed
    Dropped(EditError),
}

impl<T> EditOutcome<T> {
    /// Check if the mutation applied
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Value returned by the mutator
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Applied { value, .. } => Some(value),
            Self::Dropped(_) => None,
        }
    }
}

/// Canonical content plus reconciliation state
pub struct ReconciliationEngine<K: DocumentKind> {
    canonical: K::Content,
    hash: ContentHash,
    origin: Origin,
    has_loaded_once: bool,
    revision: u64,
    /// Revision of the local edit whose save has not completed yet
    guard: Option<u64>,
}

impl<K: DocumentKind> Debug for ReconciliationEngine<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("kind", &K::KIND)
            .field("hash", &self.hash.short())
            .field("origin", &self.origin)
            .field("has_loaded_once", &self.has_loaded_once)
            .field("revision", &self.revision)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<K: DocumentKind> Default for ReconciliationEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: DocumentKind> ReconciliationEngine<K> {
    /// Create engine over empty content
    #[must_use]
    pub fn new() -> Self {
        Self::with_content(K::Content::default())
    }

    /// Create engine over existing content
    #[must_use]
    pub fn with_content(content: K::Content) -> Self {
        Self {
            hash: K::hash(&content),
            has_loaded_once: K::has_content(&content),
            canonical: content,
            origin: Origin::External,
            revision: 0,
            guard: None,
        }
    }

    /// Reconcile an external payload
    ///
    /// The guard is single-shot: whatever this payload turns out to be, the
    /// guard is clear afterwards. It is also released early once the edit's
    /// save completes (see [`Self::release_guard`]).
    pub fn apply_external(&mut self, raw: &str) -> ExternalOutcome {
        if self.guard.take().is_some() {
            debug!(kind = %K::KIND, revision = self.revision, "external payload ignored after local edit");
            return ExternalOutcome::Guarded;
        }

        let content = match K::parse(raw) {
            Ok(content) => content,
            Err(e) if e.is_transient() => {
                debug!(kind = %K::KIND, error = %e, "incomplete payload");
                return ExternalOutcome::Incomplete(e);
            }
            Err(e) => {
                warn!(kind = %K::KIND, error = %e, "invalid payload");
                return ExternalOutcome::Invalid(e);
            }
        };

        if K::has_content(&content) {
            self.has_loaded_once = true;
        }

        let hash = K::hash(&content);
        if hash == self.hash {
            return ExternalOutcome::Unchanged;
        }

        self.replace(content, hash, Origin::External);
        ExternalOutcome::Applied {
            revision: self.revision,
        }
    }

    /// Apply a local mutation
    ///
    /// The mutator runs on a copy; canonical content changes only if it
    /// returns `Ok`. A successful edit arms the guard until its save
    /// completes.
    pub fn apply_local_edit<T>(
        &mut self,
        mode: SaveMode,
        mutator: impl FnOnce(&mut K::Content) -> Result<T, EditError>,
    ) -> EditOutcome<T> {
        let mut draft = self.canonical.clone();
        match mutator(&mut draft) {
            Ok(value) => {
                let hash = K::hash(&draft);
                self.replace(draft, hash, Origin::Local);
                self.guard = Some(self.revision);
                EditOutcome::Applied {
                    value,
                    revision: self.revision,
                    mode,
                }
            }
            Err(e) => {
                debug!(kind = %K::KIND, error = %e, "local edit dropped");
                EditOutcome::Dropped(e)
            }
        }
    }

    /// Replace content with a history snapshot
    ///
    /// Bypasses and clears the guard. Returns the new revision.
    pub fn load_snapshot(&mut self, content: K::Content) -> u64 {
        self.guard = None;
        if K::has_content(&content) {
            self.has_loaded_once = true;
        }
        let hash = K::hash(&content);
        self.replace(content, hash, Origin::External);
        info!(kind = %K::KIND, revision = self.revision, hash = %hash.short(), "snapshot loaded");
        self.revision
    }

    /// Disarm the guard once a save at `saved_revision` has completed
    ///
    /// A save covers every edit up to its revision, so any completion at or
    /// after the guarded edit releases it. Returns whether the guard was
    /// released.
    pub fn release_guard(&mut self, saved_revision: u64) -> bool {
        match self.guard {
            Some(edit) if edit <= saved_revision => {
                self.guard = None;
                debug!(kind = %K::KIND, edit, saved_revision, "guard released after save");
                true
            }
            _ => false,
        }
    }

    fn replace(&mut self, content: K::Content, hash: ContentHash, origin: Origin) {
        self.canonical = content;
        self.hash = hash;
        self.origin = origin;
        self.revision += 1;
    }

    /// Render canonical content as wire text
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn render(&self, pretty: bool) -> Result<String, SchemaError> {
        K::render(&self.canonical, pretty)
    }

    /// Canonical content
    #[inline]
    #[must_use]
    pub fn canonical(&self) -> &K::Content {
        &self.canonical
    }

    /// Hash of canonical content
    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Actor behind the last change
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// True once non-empty content has been observed
    #[inline]
    #[must_use]
    pub fn has_loaded_once(&self) -> bool {
        self.has_loaded_once
    }

    /// Monotonic change counter
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if the next external payload will be ignored
    #[inline]
    #[must_use]
    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }
}
