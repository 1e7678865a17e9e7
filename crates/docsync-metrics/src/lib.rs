//! docsync derived metrics
//!
//! Pure views computed from a document snapshot. Nothing here mutates its
//! input, and every function is total over parsed content.
//!
//! - [`ScorecardMetrics`]: weighted perspective and overall scores
//! - [`KanbanMetrics`]: tasks per column
//! - [`IdpMetrics`]: completed / total actions
//! - [`Measure`]: uniform entry point used by the document session

#![warn(unreachable_pub)]

pub mod idp;
pub mod kanban;
pub mod scorecard;

use docsync_schema::{Canonical, DevelopmentPlan, KanbanBoard, Scorecard};
use serde::Serialize;

pub use idp::{GoalProgress, IdpMetrics, StatusHistogram};
pub use kanban::{ColumnCount, KanbanMetrics};
pub use scorecard::{
    kpi_achievement, overall_score, performance_gaps, perspective_score, KpiMetrics, KpiStatus,
    PerformanceGap, PerspectiveMetrics, ScorecardMetrics,
};

/// Metrics for a document of any kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentMetrics {
    /// Kanban board counts
    Kanban(KanbanMetrics),
    /// Scorecard scores
    Scorecard(ScorecardMetrics),
    /// Development plan progress
    Idp(IdpMetrics),
}

impl From<KanbanMetrics> for DocumentMetrics {
    fn from(m: KanbanMetrics) -> Self {
        Self::Kanban(m)
    }
}

impl From<ScorecardMetrics> for DocumentMetrics {
    fn from(m: ScorecardMetrics) -> Self {
        Self::Scorecard(m)
    }
}

impl From<IdpMetrics> for DocumentMetrics {
    fn from(m: IdpMetrics) -> Self {
        Self::Idp(m)
    }
}

/// Content with a derived metrics view
pub trait Measure {
    /// Kind-specific snapshot
    type Metrics: Into<DocumentMetrics>;

    /// Compute snapshot
    fn measure(&self) -> Self::Metrics;
}

impl Measure for KanbanBoard {
    type Metrics = KanbanMetrics;

    fn measure(&self) -> KanbanMetrics {
        KanbanMetrics::of(self)
    }
}

impl Measure for Scorecard {
    type Metrics = ScorecardMetrics;

    fn measure(&self) -> ScorecardMetrics {
        ScorecardMetrics::of(self)
    }
}

impl Measure for DevelopmentPlan {
    type Metrics = IdpMetrics;

    fn measure(&self) -> IdpMetrics {
        IdpMetrics::of(self)
    }
}

impl Measure for Canonical {
    type Metrics = DocumentMetrics;

    fn measure(&self) -> DocumentMetrics {
        match self {
            Canonical::Kanban(c) => c.measure().into(),
            Canonical::Scorecard(c) => c.measure().into(),
            Canonical::Idp(c) => c.measure().into(),
        }
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_schema::Kind;

    #[test]
    fn canonical_dispatch_tags_kind() {
        let canonical = Canonical::parse(Kind::Kanban, r#"{"columns":[]}"#).unwrap();
        let metrics = canonical.measure();
        assert!(matches!(metrics, DocumentMetrics::Kanban(_)));

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["kind"], "kanban");
        assert_eq!(json["totalTasks"], 0);
    }
}
