//! docsync core
//!
//! Reconciles three sources of mutation (streamed generation, human edits
//! and accepted suggestions) against one canonical document, and schedules
//! persistence without losing or reordering writes.
//!
//! # Core Concepts
//!
//! - [`ReconciliationEngine`]: canonical content, single-shot guard, echo
//!   detection
//! - [`SaveScheduler`]: tokio worker for immediate and debounced saves
//! - [`DocumentSession`]: engine + suggestions + history + saves for one
//!   document
//! - [`DocumentStore`]: async persistence seam
//!
//! # Example
//!
//! ```rust,no_run
//! use docsync_core::{DocumentSession, InMemoryStore, SyncConfig};
//! use docsync_schema::{KanbanKind, Kind};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), docsync_core::SessionError> {
//! let store = Arc::new(InMemoryStore::new());
//! let mut session = DocumentSession::<KanbanKind>::new("doc-1", store, SyncConfig::default());
//!
//! session.deliver(Kind::Kanban, r#"{"columns":[{"id":"c1","title":"To Do"}]}"#, true)?;
//! session.add_task("c1")?;
//! session.flush().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod engine;
mod error;
mod scheduler;
mod session;
mod store;

pub mod replay;

pub use config::SyncConfig;
pub use engine::{EditOutcome, ExternalOutcome, Origin, ReconciliationEngine};
pub use error::{ConfigError, ReplayError, SessionError, StoreError};
pub use scheduler::{SaveEvent, SaveRequest, SaveScheduler};
pub use session::{AcceptResult, DocumentSession, DocumentStatus, SessionNotice};
pub use store::{DocumentStore, InMemoryStore, SaveMode, SaveRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
