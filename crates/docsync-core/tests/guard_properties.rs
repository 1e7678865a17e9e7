//! Guard behaviour under arbitrary interleavings of edits, payloads and
//! save completions

use docsync_core::{EditOutcome, ExternalOutcome, ReconciliationEngine, SaveMode};
use docsync_schema::{KanbanBoard, KanbanKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Edit,
    Payload,
    SaveCompleted,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Edit), Just(Step::Payload), Just(Step::SaveCompleted)]
}

fn payload(n: usize) -> String {
    format!(r#"{{"columns":[{{"id":"c1","title":"generated {n}","tasks":[]}}]}}"#)
}

proptest! {
    #[test]
    fn guard_blocks_at_most_one_payload_per_unsaved_edit(
        steps in prop::collection::vec(step(), 1..40),
    ) {
        let mut engine = ReconciliationEngine::<KanbanKind>::new();
        prop_assert!(engine.apply_external(&payload(0)).is_applied());

        let mut armed = false;
        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::Edit => {
                    let outcome = engine
                        .apply_local_edit(SaveMode::Immediate, |b: &mut KanbanBoard| b.add_task("c1"));
                    let applied = matches!(outcome, EditOutcome::Applied { .. });
                    prop_assert!(applied);
                    armed = true;
                }
                Step::Payload => {
                    let before = engine.canonical().clone();
                    let outcome = engine.apply_external(&payload(i + 1));
                    if armed {
                        prop_assert!(matches!(outcome, ExternalOutcome::Guarded));
                        prop_assert_eq!(engine.canonical(), &before);
                    } else {
                        prop_assert!(outcome.is_applied());
                    }
                    armed = false;
                }
                Step::SaveCompleted => {
                    let revision = engine.revision();
                    engine.release_guard(revision);
                    armed = false;
                }
            }
            prop_assert_eq!(engine.is_guarded(), armed);
        }
    }
}
