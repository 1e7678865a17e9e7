//! docsync version history
//!
//! Full-content snapshots with a cursor for undo/redo style navigation.
//! See [`VersionHistory`] for the live/browsing state machine.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod history;
mod version;

pub use error::HistoryError;
pub use history::{Direction, HistoryMode, Recorded, VersionHistory};
pub use version::{Version, VersionSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
