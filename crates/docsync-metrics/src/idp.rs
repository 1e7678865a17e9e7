//! Completion progress for development plans

use docsync_schema::{Action, ActionStatus, DevelopmentPlan};
use serde::Serialize;

/// Actions per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistogram {
    /// `not-started`
    pub not_started: usize,
    /// `in-progress`
    pub in_progress: usize,
    /// `completed`
    pub completed: usize,
}

impl StatusHistogram {
    fn count<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        actions.into_iter().fold(Self::default(), |mut h, a| {
            match a.status {
                ActionStatus::NotStarted => h.not_started += 1,
                ActionStatus::InProgress => h.in_progress += 1,
                ActionStatus::Completed => h.completed += 1,
            }
            h
        })
    }

    /// Total actions
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_started + self.in_progress + self.completed
    }

    /// Completed share as a percentage, 0 when there are no actions
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress(self.completed, self.total())
    }
}

/// Completed share as a percentage, 0 for an empty set
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Progress for one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    /// Goal id
    pub id: String,
    /// Completed actions
    pub completed: usize,
    /// All actions
    pub total: usize,
    /// Completed share as a percentage
    pub progress: f64,
}

/// Snapshot of plan metrics
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpMetrics {
    /// Completed actions across goals
    pub completed_actions: usize,
    /// All actions across goals
    pub total_actions: usize,
    /// Completed share as a percentage
    pub progress: f64,
    /// Actions per status
    pub by_status: StatusHistogram,
    /// Per-goal progress in display order
    pub goals: Vec<GoalProgress>,
}

impl IdpMetrics {
    /// Compute snapshot
    #[must_use]
    pub fn of(plan: &DevelopmentPlan) -> Self {
        let by_status = StatusHistogram::count(plan.goals.iter().flat_map(|g| g.actions.iter()));
        let goals = plan
            .goals
            .iter()
            .map(|g| {
                let h = StatusHistogram::count(&g.actions);
                GoalProgress {
                    id: g.id.clone(),
                    completed: h.completed,
                    total: h.total(),
                    progress: h.progress(),
                }
            })
            .collect();
        Self {
            completed_actions: by_status.completed,
            total_actions: by_status.total(),
            progress: by_status.progress(),
            by_status,
            goals,
        }
    }
}
