//! docsync document schema
//!
//! Typed shapes for AI-generated documents, with id-addressed field edits and
//! structural hashing.
//!
//! # Core Concepts
//!
//! - [`DocumentKind`]: sealed trait tying a [`Kind`] to its content type
//! - [`KanbanBoard`], [`Scorecard`], [`DevelopmentPlan`]: canonical content
//! - [`FieldPath`] / [`FieldValue`]: addressed single-field edits
//! - [`ContentHash`]: 32-byte Blake3 hash over canonical JSON
//!
//! # Example
//!
//! ```rust
//! use docsync_schema::{DocumentKind, KanbanKind};
//!
//! let mut board = KanbanKind::parse(r#"{"columns":[{"id":"c1","title":"To Do"}]}"#)?;
//! let task_id = board.add_task("c1")?;
//! assert_eq!(board.column("c1").unwrap().task(&task_id).unwrap().title, "New Task");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod edit;
mod error;
mod hash;
mod id;
mod kind;
mod number;
mod path;
mod value;

pub mod idp;
pub mod kanban;
pub mod scorecard;

pub use edit::EditableContent;
pub use error::{EditError, SchemaError};
pub use hash::{ContentHash, HashError};
pub use id::{fresh_id, unique_id};
pub use idp::{Action, ActionStatus, DevelopmentPlan, Goal};
pub use kanban::{Column, KanbanBoard, Task};
pub use kind::{Canonical, DocumentKind, IdpKind, Kind, KanbanKind, ScorecardKind};
pub use path::{FieldPath, PathError};
pub use scorecard::{Kpi, KpiField, NewKpi, Perspective, Scorecard};
pub use value::FieldValue;

/// Sealed trait support
#[doc(hidden)]
pub mod __private {
    pub use super::kind::private::Sealed;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn edit_then_hash_changes() {
        let mut card = ScorecardKind::parse(
            r#"{"perspectives":[{"id":"financial","name":"Financial","kpis":[]}]}"#,
        )
        .unwrap();
        let before = ScorecardKind::hash(&card);

        card.set_field(
            &"perspectives.financial.name".parse().unwrap(),
            FieldValue::from("Money"),
        )
        .unwrap();

        assert_ne!(ScorecardKind::hash(&card), before);
        assert!(ScorecardKind::has_content(&card));
    }

    #[test]
    fn canonical_round_trip_through_text() {
        let canonical = Canonical::parse(Kind::Idp, r#"{"goals":[]}"#).unwrap();
        assert_eq!(canonical.kind(), Kind::Idp);
        assert!(!canonical.has_content());
        let text = canonical.render(false).unwrap();
        assert_eq!(Canonical::parse(Kind::Idp, &text).unwrap(), canonical);
    }
}
