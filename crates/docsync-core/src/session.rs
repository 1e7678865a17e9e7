//! Document session
//!
//! Composes the reconciliation engine, suggestion board, version history and
//! save worker for one open document, and exposes the user-facing
//! operations. All methods take `&mut self`: events for a document are
//! applied one at a time in arrival order.

use crate::config::SyncConfig;
use crate::engine::{EditOutcome, ExternalOutcome, ReconciliationEngine};
use crate::error::{SessionError, StoreError};
use crate::scheduler::{SaveEvent, SaveRequest, SaveScheduler};
use crate::store::{DocumentStore, SaveMode};
use docsync_history::{Direction, Recorded, VersionHistory};
use docsync_metrics::{DocumentMetrics, Measure};
use docsync_schema::{
    ActionStatus, DocumentKind, EditError, EditableContent, FieldPath, FieldValue, IdpKind, Kind,
    KanbanKind, ScorecardKind,
};
use docsync_suggest::{is_applicable, reject, SuggestionBoard, SuggestionError, SuggestionWire};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Generation state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Generation in progress
    Streaming,
    /// No generation running
    #[default]
    Idle,
}

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// Content at `revision` is durable
    Saved { revision: u64, mode: SaveMode },
    /// Content at `revision` could not be saved; it stays visible
    SaveFailed { revision: u64, error: StoreError },
    /// A version was appended to history
    VersionRecorded { index: usize },
}

/// Result of accepting a suggestion
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptResult {
    /// Change applied and saved immediately
    Applied { revision: u64 },
    /// Advisory suggestion; left unresolved
    NotApplicable,
    /// Referenced perspective or KPI missing; resolved without change
    Dropped(EditError),
}

/// One open document
#[derive(Debug)]
pub struct DocumentSession<K: DocumentKind> {
    id: String,
    config: SyncConfig,
    engine: ReconciliationEngine<K>,
    suggestions: SuggestionBoard,
    history: VersionHistory<K::Content>,
    scheduler: SaveScheduler,
    events: mpsc::UnboundedReceiver<SaveEvent>,
    status: DocumentStatus,
    in_flight: BTreeMap<u64, K::Content>,
    debounced: Option<u64>,
    notices: Vec<SessionNotice>,
}

impl<K: DocumentKind> DocumentSession<K> {
    /// Open a session over empty content
    ///
    /// Spawns the save worker, so this must run inside a tokio runtime.
    #[must_use]
    pub fn new(id: impl Into<String>, store: Arc<dyn DocumentStore>, config: SyncConfig) -> Self {
        let id = id.into();
        let (scheduler, events) = SaveScheduler::spawn(store, &config);
        Self {
            suggestions: SuggestionBoard::new(id.clone()),
            history: VersionHistory::new().with_skip_duplicates(config.skip_duplicate_versions),
            engine: ReconciliationEngine::new(),
            id,
            config,
            scheduler,
            events,
            status: DocumentStatus::Idle,
            in_flight: BTreeMap::new(),
            debounced: None,
            notices: Vec::new(),
        }
    }

    // ---- ingest ----

    /// Reconcile a payload from generation or storage
    ///
    /// Saves completed so far are collected first, so an edit whose save has
    /// finished no longer guards against this payload. A final payload ends
    /// streaming and, when it applies (or matches what is already shown), is
    /// recorded as a version.
    ///
    /// # Errors
    /// Returns error if `kind` is not this session's kind
    pub fn deliver(
        &mut self,
        kind: Kind,
        raw: &str,
        is_final: bool,
    ) -> Result<ExternalOutcome, SessionError> {
        if kind != K::KIND {
            return Err(SessionError::kind_mismatch(K::KIND, kind));
        }
        self.process_events();
        self.status = if is_final {
            DocumentStatus::Idle
        } else {
            DocumentStatus::Streaming
        };

        let outcome = self.engine.apply_external(raw);
        if outcome.is_applied() {
            self.cancel_debounced();
        }
        if is_final && matches!(outcome, ExternalOutcome::Applied { .. } | ExternalOutcome::Unchanged) {
            self.record(self.engine.canonical().clone());
        }
        Ok(outcome)
    }

    /// Append a suggestion from the analysis collaborator
    ///
    /// # Errors
    /// Returns error for an inconsistent payload, a duplicate id or another
    /// document's suggestion
    pub fn deliver_suggestion(&mut self, suggestion: SuggestionWire) -> Result<(), SessionError> {
        self.suggestions.deliver_wire(suggestion)?;
        Ok(())
    }

    // ---- local edits ----

    /// Apply a local mutation and schedule its save
    ///
    /// While browsing history, a successful edit first discards the versions
    /// after the cursor.
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn edit<T>(
        &mut self,
        mode: SaveMode,
        mutator: impl FnOnce(&mut K::Content) -> Result<T, EditError>,
    ) -> Result<EditOutcome<T>, SessionError> {
        let outcome = self.engine.apply_local_edit(mode, mutator);
        if let EditOutcome::Applied { revision, mode, .. } = &outcome {
            self.history.branch();
            self.schedule_save(*revision, *mode)?;
        }
        Ok(outcome)
    }

    /// Write a single text or number field (debounced save)
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn edit_field(
        &mut self,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<EditOutcome<()>, SessionError> {
        self.edit(SaveMode::Debounced, |content| {
            EditableContent::set_field(content, path, value)
        })
    }

    /// Mark a suggestion resolved without changing content
    ///
    /// Returns `true` if this call changed its state.
    ///
    /// # Errors
    /// Returns error if no suggestion has this id
    pub fn reject_suggestion(&mut self, id: &str) -> Result<bool, SessionError> {
        let suggestion = self
            .suggestions
            .get(id)
            .ok_or_else(|| SuggestionError::NotFound(id.to_string()))?;
        reject(suggestion);
        Ok(self.suggestions.resolve(id)?)
    }

    // ---- history ----

    /// Move one version back or forward and show that snapshot
    ///
    /// Pending saves are flushed first so no edit is lost. Returns whether
    /// the cursor moved.
    ///
    /// # Errors
    /// Returns error if the save worker has stopped
    pub async fn go_to_version(&mut self, direction: Direction) -> Result<bool, SessionError> {
        self.flush().await?;
        if !self.history.navigate(direction) {
            return Ok(false);
        }
        if let Some(version) = self.history.current() {
            let content = version.content.clone();
            self.engine.load_snapshot(content);
        }
        Ok(true)
    }

    // ---- persistence ----

    /// Write any pending debounced save and collect completions
    ///
    /// # Errors
    /// Returns error if the save worker has stopped
    pub async fn flush(&mut self) -> Result<(), SessionError> {
        self.scheduler.flush().await?;
        self.process_events();
        Ok(())
    }

    /// Apply completed saves and return notices gathered since the last call
    pub fn drain_events(&mut self) -> Vec<SessionNotice> {
        self.process_events();
        std::mem::take(&mut self.notices)
    }

    /// Flush and stop the save worker
    ///
    /// # Errors
    /// Returns error if the save worker has stopped or panicked
    pub async fn close(mut self) -> Result<Vec<SessionNotice>, SessionError> {
        self.flush().await?;
        let notices = std::mem::take(&mut self.notices);
        self.scheduler.shutdown().await?;
        Ok(notices)
    }

    fn schedule_save(&mut self, revision: u64, mode: SaveMode) -> Result<(), SessionError> {
        let content = self.engine.render(self.config.pretty_json)?;
        self.in_flight.insert(revision, self.engine.canonical().clone());

        // any queued debounced save is superseded by this one
        if let Some(old) = self.debounced.take() {
            self.in_flight.remove(&old);
        }
        if mode.is_debounced() {
            self.debounced = Some(revision);
        }

        let request = SaveRequest {
            id: self.id.clone(),
            content,
            mode,
            revision,
        };
        if let Err(error) = self.scheduler.submit(request) {
            warn!(id = %self.id, revision, %error, "save not queued");
            self.in_flight.remove(&revision);
            if self.debounced == Some(revision) {
                self.debounced = None;
            }
            self.engine.release_guard(revision);
            self.notices.push(SessionNotice::SaveFailed { revision, error });
        }
        Ok(())
    }

    fn cancel_debounced(&mut self) {
        let Some(revision) = self.debounced.take() else {
            return;
        };
        self.in_flight.remove(&revision);
        debug!(id = %self.id, revision, "stale debounced save cancelled");
        if let Err(error) = self.scheduler.cancel_pending() {
            warn!(id = %self.id, revision, %error, "cancel not queued");
        }
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let revision = event.revision();
            if self.debounced == Some(revision) {
                self.debounced = None;
            }
            let snapshot = self.take_in_flight(revision);
            self.engine.release_guard(revision);
            match event {
                SaveEvent::Saved { revision, mode } => {
                    self.notices.push(SessionNotice::Saved { revision, mode });
                    if let Some(content) = snapshot {
                        self.record(content);
                    }
                }
                SaveEvent::SaveFailed { revision, error, .. } => {
                    warn!(id = %self.id, revision, %error, "save failed; content kept");
                    self.notices.push(SessionNotice::SaveFailed { revision, error });
                }
            }
        }
    }

    /// Remove the snapshot for `revision` along with older, superseded ones
    fn take_in_flight(&mut self, revision: u64) -> Option<K::Content> {
        let snapshot = self.in_flight.remove(&revision);
        self.in_flight = self.in_flight.split_off(&revision);
        snapshot
    }

    fn record(&mut self, content: K::Content) {
        let hash = K::hash(&content);
        if let Recorded::Appended(index) = self.history.record(content, hash) {
            self.notices.push(SessionNotice::VersionRecorded { index });
        }
    }

    // ---- views ----

    /// Canonical content serialized verbatim
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn copy_as_text(&self) -> Result<String, SessionError> {
        Ok(self.engine.render(self.config.pretty_json)?)
    }

    /// True until non-empty content has been observed
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.engine.has_loaded_once()
    }

    /// Document id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Generation state
    #[inline]
    #[must_use]
    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    /// Canonical content
    #[inline]
    #[must_use]
    pub fn canonical(&self) -> &K::Content {
        self.engine.canonical()
    }

    /// Reconciliation engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &ReconciliationEngine<K> {
        &self.engine
    }

    /// Version history
    #[inline]
    #[must_use]
    pub fn history(&self) -> &VersionHistory<K::Content> {
        &self.history
    }

    /// Delivered suggestions
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &SuggestionBoard {
        &self.suggestions
    }

    /// Session configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Check if saves are queued but not yet confirmed
    #[inline]
    #[must_use]
    pub fn has_pending_saves(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

impl<K: DocumentKind> DocumentSession<K>
where
    K::Content: Measure,
{
    /// Derived metrics for the canonical content
    #[must_use]
    pub fn metrics(&self) -> DocumentMetrics {
        self.engine.canonical().measure().into()
    }
}

impl DocumentSession<KanbanKind> {
    /// Append a "New Task" to a column (immediate save)
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn add_task(&mut self, column_id: &str) -> Result<EditOutcome<String>, SessionError> {
        self.edit(SaveMode::Immediate, |board| board.add_task(column_id))
    }

    /// Remove a task (immediate save)
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn delete_task(
        &mut self,
        column_id: &str,
        task_id: &str,
    ) -> Result<EditOutcome<()>, SessionError> {
        self.edit(SaveMode::Immediate, |board| {
            board.delete_task(column_id, task_id).map(drop)
        })
    }

    /// Move a task to the end of another column (immediate save)
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn move_task(
        &mut self,
        task_id: &str,
        from: &str,
        to: &str,
    ) -> Result<EditOutcome<()>, SessionError> {
        self.edit(SaveMode::Immediate, |board| board.move_task(task_id, from, to))
    }
}

impl DocumentSession<IdpKind> {
    /// Advance an action's status (immediate save)
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn toggle_status(
        &mut self,
        action_id: &str,
    ) -> Result<EditOutcome<ActionStatus>, SessionError> {
        self.edit(SaveMode::Immediate, |plan| plan.toggle_status(action_id))
    }

    /// Advance an action's status within a known goal (immediate save)
    ///
    /// # Errors
    /// Returns error only if the new content cannot be rendered
    pub fn toggle_status_in(
        &mut self,
        goal_id: &str,
        action_id: &str,
    ) -> Result<EditOutcome<ActionStatus>, SessionError> {
        self.edit(SaveMode::Immediate, |plan| {
            plan.toggle_status_in(goal_id, action_id)
        })
    }
}

impl DocumentSession<ScorecardKind> {
    /// Apply a suggestion's change (immediate save) and resolve it
    ///
    /// Advisory suggestions are left untouched. A suggestion whose target is
    /// missing is resolved without changing content.
    ///
    /// # Errors
    /// Returns error if no suggestion has this id
    pub fn accept_suggestion(&mut self, id: &str) -> Result<AcceptResult, SessionError> {
        let suggestion = self
            .suggestions
            .get(id)
            .cloned()
            .ok_or_else(|| SuggestionError::NotFound(id.to_string()))?;
        if !is_applicable(&suggestion) {
            debug!(id, kind = %suggestion.kind(), "advisory suggestion not applied");
            return Ok(AcceptResult::NotApplicable);
        }

        let outcome = self.edit(SaveMode::Immediate, |card| suggestion.change().apply(card))?;
        self.suggestions.resolve(id)?;
        Ok(match outcome {
            EditOutcome::Applied { revision, .. } => AcceptResult::Applied { revision },
            EditOutcome::Dropped(e) => AcceptResult::Dropped(e),
        })
    }
}
