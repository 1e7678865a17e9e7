//! Event script replay
//!
//! A script is JSON lines, one event per line:
//!
//! ```text
//! {"op":"deliver","kind":"kanban","content":"{\"columns\":[","isFinal":false}
//! {"op":"deliver","kind":"kanban","content":{"columns":[{"id":"c1","title":"To Do"}]},"isFinal":true}
//! {"op":"addTask","columnId":"c1"}
//! {"op":"goToVersion","direction":"prev"}
//! ```
//!
//! `content` may be a string (raw, possibly truncated text) or a JSON value.

use crate::config::SyncConfig;
use crate::engine::EditOutcome;
use crate::error::{ReplayError, SessionError};
use crate::session::{DocumentSession, DocumentStatus, SessionNotice};
use crate::store::DocumentStore;
use docsync_history::Direction;
use docsync_metrics::{DocumentMetrics, Measure};
use docsync_schema::{DocumentKind, FieldPath, FieldValue, IdpKind, Kind, KanbanKind, ScorecardKind};
use docsync_suggest::SuggestionWire;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// One scripted event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ScriptEvent {
    /// Payload from generation
    Deliver {
        kind: Kind,
        content: serde_json::Value,
        #[serde(rename = "isFinal", default)]
        is_final: bool,
    },
    /// Suggestion from analysis
    Suggestion { suggestion: SuggestionWire },
    /// Field edit
    EditField { path: String, value: FieldValue },
    /// IDP status toggle
    ToggleStatus {
        id: String,
        #[serde(rename = "goalId", default)]
        goal_id: Option<String>,
    },
    /// Kanban drag-and-drop
    MoveTask {
        #[serde(rename = "taskId")]
        task_id: String,
        from: String,
        to: String,
    },
    /// Kanban add
    AddTask {
        #[serde(rename = "columnId")]
        column_id: String,
    },
    /// Kanban delete
    DeleteTask {
        #[serde(rename = "columnId")]
        column_id: String,
        #[serde(rename = "taskId")]
        task_id: String,
    },
    /// Accept a suggestion
    AcceptSuggestion { id: String },
    /// Reject a suggestion
    RejectSuggestion { id: String },
    /// History navigation
    GoToVersion { direction: Direction },
    /// Force pending saves
    Flush,
    /// Let time pass (debounce windows)
    Wait { ms: u64 },
}

impl ScriptEvent {
    /// Operation name
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Self::Deliver { .. } => "deliver",
            Self::Suggestion { .. } => "suggestion",
            Self::EditField { .. } => "editField",
            Self::ToggleStatus { .. } => "toggleStatus",
            Self::MoveTask { .. } => "moveTask",
            Self::AddTask { .. } => "addTask",
            Self::DeleteTask { .. } => "deleteTask",
            Self::AcceptSuggestion { .. } => "acceptSuggestion",
            Self::RejectSuggestion { .. } => "rejectSuggestion",
            Self::GoToVersion { .. } => "goToVersion",
            Self::Flush => "flush",
            Self::Wait { .. } => "wait",
        }
    }
}

/// Parse a JSON-lines script, skipping blank lines
///
/// # Errors
/// Returns error naming the first bad line (1-based)
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, ReplayError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| ReplayError::Parse { line: i + 1, source })
        })
        .collect()
}

/// Final state after a replay
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Document id
    pub document_id: String,
    /// Document kind
    pub kind: Kind,
    /// Generation state
    pub status: DocumentStatus,
    /// Canonical content
    pub content: serde_json::Value,
    /// Derived metrics
    pub metrics: DocumentMetrics,
    /// Recorded versions
    pub versions: usize,
    /// History cursor
    pub cursor: usize,
    /// Suggestions with resolution flags
    pub suggestions: Vec<SuggestionWire>,
    /// Notices raised during the replay
    pub notices: Vec<String>,
}

/// Kinds that can be replayed
///
/// Implementations handle the kind-specific operations; everything else is
/// shared.
pub trait ReplayKind: DocumentKind + Sized {
    /// Apply a kind-specific event, returning whether content changed
    ///
    /// # Errors
    /// Returns [`SessionError::Unsupported`] for operations of other kinds
    fn apply_kind_op(
        session: &mut DocumentSession<Self>,
        event: &ScriptEvent,
    ) -> Result<bool, SessionError>;
}

fn unsupported(event: &ScriptEvent, kind: Kind) -> SessionError {
    SessionError::Unsupported {
        op: event.op(),
        kind,
    }
}

fn applied<T>(outcome: &EditOutcome<T>) -> bool {
    outcome.is_applied()
}

impl ReplayKind for KanbanKind {
    fn apply_kind_op(
        session: &mut DocumentSession<Self>,
        event: &ScriptEvent,
    ) -> Result<bool, SessionError> {
        match event {
            ScriptEvent::AddTask { column_id } => Ok(applied(&session.add_task(column_id)?)),
            ScriptEvent::DeleteTask { column_id, task_id } => {
                Ok(applied(&session.delete_task(column_id, task_id)?))
            }
            ScriptEvent::MoveTask { task_id, from, to } => {
                Ok(applied(&session.move_task(task_id, from, to)?))
            }
            other => Err(unsupported(other, Self::KIND)),
        }
    }
}

impl ReplayKind for ScorecardKind {
    fn apply_kind_op(
        session: &mut DocumentSession<Self>,
        event: &ScriptEvent,
    ) -> Result<bool, SessionError> {
        match event {
            ScriptEvent::AcceptSuggestion { id } => Ok(matches!(
                session.accept_suggestion(id)?,
                crate::session::AcceptResult::Applied { .. }
            )),
            other => Err(unsupported(other, Self::KIND)),
        }
    }
}

impl ReplayKind for IdpKind {
    fn apply_kind_op(
        session: &mut DocumentSession<Self>,
        event: &ScriptEvent,
    ) -> Result<bool, SessionError> {
        match event {
            ScriptEvent::ToggleStatus { id, goal_id: None } => {
                Ok(applied(&session.toggle_status(id)?))
            }
            ScriptEvent::ToggleStatus {
                id,
                goal_id: Some(goal_id),
            } => Ok(applied(&session.toggle_status_in(goal_id, id)?)),
            other => Err(unsupported(other, Self::KIND)),
        }
    }
}

async fn step<K>(session: &mut DocumentSession<K>, event: &ScriptEvent) -> Result<bool, SessionError>
where
    K: ReplayKind,
    K::Content: Measure,
{
    match event {
        ScriptEvent::Deliver {
            kind,
            content,
            is_final,
        } => {
            let raw = match content {
                serde_json::Value::String(text) => text.clone(),
                value => value.to_string(),
            };
            Ok(session.deliver(*kind, &raw, *is_final)?.is_applied())
        }
        ScriptEvent::Suggestion { suggestion } => {
            session.deliver_suggestion(suggestion.clone())?;
            Ok(true)
        }
        ScriptEvent::EditField { path, value } => {
            let path: FieldPath = path.parse()?;
            Ok(session.edit_field(&path, value.clone())?.is_applied())
        }
        ScriptEvent::RejectSuggestion { id } => session.reject_suggestion(id),
        ScriptEvent::GoToVersion { direction } => session.go_to_version(*direction).await,
        ScriptEvent::Flush => {
            session.flush().await?;
            Ok(true)
        }
        ScriptEvent::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            Ok(true)
        }
        kind_op => K::apply_kind_op(session, kind_op),
    }
}

/// Replay events through a fresh session and report the final state
///
/// # Errors
/// Returns error naming the first failing step (1-based)
pub async fn run_replay<K>(
    document_id: &str,
    store: Arc<dyn DocumentStore>,
    config: SyncConfig,
    events: &[ScriptEvent],
) -> Result<ReplayReport, ReplayError>
where
    K: ReplayKind,
    K::Content: Measure,
{
    let mut session = DocumentSession::<K>::new(document_id, store, config);
    let mut notices = Vec::new();

    for (i, event) in events.iter().enumerate() {
        let changed = step(&mut session, event)
            .await
            .map_err(|source| ReplayError::Step { step: i + 1, source })?;
        debug!(step = i + 1, op = event.op(), changed, "replayed");
        notices.extend(session.drain_events());
    }

    session.flush().await?;
    notices.extend(session.drain_events());

    let report = ReplayReport {
        document_id: session.id().to_string(),
        kind: K::KIND,
        status: session.status(),
        content: serde_json::to_value(session.canonical())?,
        metrics: session.metrics(),
        versions: session.history().len(),
        cursor: session.history().cursor(),
        suggestions: session.suggestions().to_wire(),
        notices: notices.iter().map(describe).collect(),
    };
    info!(
        steps = events.len(),
        versions = report.versions,
        "replay finished"
    );
    session.close().await?;
    Ok(report)
}

fn describe(notice: &SessionNotice) -> String {
    match notice {
        SessionNotice::Saved { revision, mode } => format!("saved revision {revision} ({mode})"),
        SessionNotice::SaveFailed { revision, error } => {
            format!("save failed for revision {revision}: {error}")
        }
        SessionNotice::VersionRecorded { index } => format!("version {index} recorded"),
    }
}
