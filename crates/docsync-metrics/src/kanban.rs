//! Task counts for kanban boards

use docsync_schema::KanbanBoard;
use serde::Serialize;

/// Task count for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCount {
    /// Column id
    pub id: String,
    /// Column heading
    pub title: String,
    /// Tasks in the column
    pub tasks: usize,
}

/// Snapshot of board metrics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanMetrics {
    /// Tasks across all columns
    pub total_tasks: usize,
    /// Per-column counts in display order
    pub columns: Vec<ColumnCount>,
}

impl KanbanMetrics {
    /// Compute snapshot
    #[must_use]
    pub fn of(board: &KanbanBoard) -> Self {
        let columns: Vec<ColumnCount> = board
            .columns
            .iter()
            .map(|c| ColumnCount {
                id: c.id.clone(),
                title: c.title.clone(),
                tasks: c.tasks.len(),
            })
            .collect();
        Self {
            total_tasks: columns.iter().map(|c| c.tasks).sum(),
            columns,
        }
    }

    /// Count for one column
    #[must_use]
    pub fn column(&self, id: &str) -> Option<usize> {
        self.columns.iter().find(|c| c.id == id).map(|c| c.tasks)
    }
}
