//! Testing utilities for docsync workspace
//!
//! Shared fixtures, stores and session helpers.

#![allow(missing_docs)]

use async_trait::async_trait;
use docsync_core::{DocumentSession, DocumentStore, InMemoryStore, SaveMode, StoreError, SyncConfig};
use docsync_schema::DocumentKind;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const DOC_ID: &str = "doc-1";

pub fn board_json() -> String {
    json!({
        "columns": [
            {"id": "c1", "title": "To Do", "tasks": [
                {"id": "t1", "title": "Draft outline", "description": "First pass"}
            ]},
            {"id": "c2", "title": "In Progress", "tasks": []},
            {"id": "c3", "title": "Done", "tasks": []}
        ]
    })
    .to_string()
}

/// One perspective scoring 70: (90/100 * 50 + 50/100 * 50) / 100
pub fn scorecard_json() -> String {
    json!({
        "employeeName": "Ada",
        "period": "2026-Q3",
        "perspectives": [
            {"id": "financial", "name": "Financial", "kpis": [
                {"id": "k1", "name": "Revenue", "target": 100.0, "current": 90.0, "unit": "%", "weight": 50.0},
                {"id": "k2", "name": "Margin", "target": 100.0, "current": 50.0, "unit": "%", "weight": 50.0}
            ]}
        ]
    })
    .to_string()
}

pub fn plan_json() -> String {
    json!({
        "employeeName": "Ada",
        "period": "2026",
        "goals": [
            {"id": "g1", "goal": "Lift margin", "rationale": "Below target", "actions": [
                {"id": "a1", "activity": "Pricing course", "type": "training",
                 "timeline": "Q1", "status": "not-started", "linkedKPI": "k2"},
                {"id": "a2", "activity": "Shadow finance lead", "type": "mentoring",
                 "timeline": "Q2", "status": "in-progress"}
            ]}
        ]
    })
    .to_string()
}

/// Suggestion payload for `doc-1`
pub fn suggestion_json(id: &str, kind: &str, change: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "documentId": DOC_ID,
        "type": kind,
        "description": format!("{kind} suggestion"),
        "rationale": "test",
        "change": change,
    })
}

pub fn fast_config() -> SyncConfig {
    SyncConfig::default().with_debounce_window(Duration::from_millis(100))
}

/// Session over `doc-1` with a fresh in-memory store
pub fn session<K: DocumentKind>() -> (DocumentSession<K>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let session = DocumentSession::new(DOC_ID, store.clone(), fast_config());
    (session, store)
}

/// Session already holding `raw` as its final generated content
pub fn loaded_session<K: DocumentKind>(raw: &str) -> (DocumentSession<K>, Arc<InMemoryStore>) {
    let (mut session, store) = session::<K>();
    session.deliver(K::KIND, raw, true).unwrap();
    (session, store)
}


/// Store that takes `delay` per write and records completion order
#[derive(Debug)]
pub struct SlowStore {
    inner: InMemoryStore,
    delay: Duration,
    completed: Mutex<Vec<SaveMode>>,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryStore::new(),
            delay,
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn completed(&self) -> Vec<SaveMode> {
        self.completed.lock().clone()
    }
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn save(&self, id: &str, content: &str, mode: SaveMode) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.save(id, content, mode).await?;
        self.completed.lock().push(mode);
        Ok(())
    }
}
