//! docsync suggestion engine
//!
//! AI-proposed scorecard mutations. Suggestions arrive as loose JSON
//! ([`SuggestionWire`]), are checked into a tagged [`SuggestionChange`], and
//! are applied all-or-nothing through [`accept`].
//!
//! ```rust
//! use docsync_schema::{DocumentKind, ScorecardKind};
//! use docsync_suggest::{accept, AcceptOutcome, Suggestion};
//!
//! let card = ScorecardKind::parse(r#"{"perspectives":[{"id":"customer","name":"Customer"}]}"#)?;
//! let suggestion = Suggestion::from_json(
//!     r#"{"id":"s1","documentId":"d1","type":"add-kpi",
//!         "change":{"perspectiveId":"customer","newKpi":{"name":"NPS","target":50,"current":30,"unit":"pts","weight":100}}}"#,
//! )?;
//! let AcceptOutcome::Applied(next) = accept(&suggestion, &card) else { unreachable!() };
//! assert_eq!(next.kpi_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod apply;
mod board;
mod error;
mod suggestion;
mod wire;

pub use apply::{accept, is_applicable, reject, AcceptOutcome};
pub use board::SuggestionBoard;
pub use error::SuggestionError;
pub use suggestion::{Suggestion, SuggestionChange};
pub use wire::{ChangeWire, SuggestionType, SuggestionWire};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
