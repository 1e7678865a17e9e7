//! Scripted replays through the public entry point

use docsync_core::replay::{parse_script, run_replay};
use docsync_core::{InMemoryStore, ReplayError, SaveMode, SessionError, SyncConfig};
use docsync_metrics::DocumentMetrics;
use docsync_schema::{IdpKind, KanbanKind, ScorecardKind};
use docsync_test_utils::{board_json, plan_json, scorecard_json, suggestion_json, DOC_ID};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn script(events: &[serde_json::Value]) -> String {
    events
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn deliver(kind: &str, raw: &str, is_final: bool) -> serde_json::Value {
    json!({"op": "deliver", "kind": kind, "content": raw, "isFinal": is_final})
}

fn config() -> SyncConfig {
    SyncConfig::default().with_debounce_window(Duration::from_millis(50))
}

#[tokio::test(start_paused = true)]
async fn kanban_script_records_versions_and_saves() {
    let text = script(&[
        deliver("kanban", &board_json(), true),
        json!({"op": "addTask", "columnId": "c2"}),
        json!({"op": "editField", "path": "columns.c1.title", "value": "Backlog"}),
        json!({"op": "wait", "ms": 200}),
        json!({"op": "moveTask", "taskId": "t1", "from": "c1", "to": "c3"}),
        json!({"op": "flush"}),
    ]);
    let events = parse_script(&text).unwrap();
    let store = Arc::new(InMemoryStore::new());

    let report = run_replay::<KanbanKind>(DOC_ID, store.clone(), config(), &events)
        .await
        .unwrap();

    assert_eq!(report.versions, 4);
    assert_eq!(report.cursor, 3);
    assert_eq!(report.content["columns"][0]["title"], "Backlog");
    assert_eq!(report.content["columns"][2]["tasks"][0]["id"], "t1");

    let modes: Vec<_> = store.writes().iter().map(|w| w.mode).collect();
    assert_eq!(
        modes,
        vec![SaveMode::Immediate, SaveMode::Debounced, SaveMode::Immediate]
    );
    assert!(report.notices.iter().any(|n| n.starts_with("saved revision")));
}

#[tokio::test(start_paused = true)]
async fn scorecard_script_reports_metrics_and_suggestions() {
    let suggestion = suggestion_json(
        "s1",
        "add-kpi",
        json!({"perspectiveId": "financial",
               "newKpi": {"name": "NPS", "target": 50, "current": 50, "unit": "pts", "weight": 0}}),
    );
    let text = script(&[
        deliver("scorecard", &scorecard_json(), true),
        json!({"op": "suggestion", "suggestion": suggestion}),
        json!({"op": "acceptSuggestion", "id": "s1"}),
    ]);
    let events = parse_script(&text).unwrap();

    let report = run_replay::<ScorecardKind>(
        DOC_ID,
        Arc::new(InMemoryStore::new()),
        config(),
        &events,
    )
    .await
    .unwrap();

    // zero-weight KPI leaves the score at 70
    let DocumentMetrics::Scorecard(metrics) = &report.metrics else {
        panic!("wrong metrics kind");
    };
    assert!((metrics.overall - 70.0).abs() < 1e-9);
    assert_eq!(
        report.content["perspectives"][0]["kpis"]
            .as_array()
            .map(Vec::len),
        Some(3)
    );
    assert!(report.suggestions[0].is_resolved);
}

#[tokio::test(start_paused = true)]
async fn history_navigation_in_script() {
    let text = script(&[
        deliver("idp", &plan_json(), true),
        json!({"op": "toggleStatus", "id": "a1"}),
        json!({"op": "goToVersion", "direction": "prev"}),
    ]);
    let events = parse_script(&text).unwrap();

    let report = run_replay::<IdpKind>(DOC_ID, Arc::new(InMemoryStore::new()), config(), &events)
        .await
        .unwrap();

    assert_eq!(report.versions, 2);
    assert_eq!(report.cursor, 0);
    assert_eq!(report.content["goals"][0]["actions"][0]["status"], "not-started");
}

#[tokio::test(start_paused = true)]
async fn wrong_kind_op_names_the_step() {
    let text = script(&[
        deliver("idp", &plan_json(), true),
        json!({"op": "addTask", "columnId": "c1"}),
    ]);
    let events = parse_script(&text).unwrap();

    let err = run_replay::<IdpKind>(DOC_ID, Arc::new(InMemoryStore::new()), config(), &events)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReplayError::Step {
            step: 2,
            source: SessionError::Unsupported { op: "addTask", .. }
        }
    ));
}
