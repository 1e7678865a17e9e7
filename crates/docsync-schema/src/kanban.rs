//! Kanban board content

use crate::edit::EditableContent;
use crate::error::{EditError, SchemaError};
use crate::id::{ensure_unique, unique_id};
use crate::path::FieldPath;
use crate::value::FieldValue;
use im::Vector;
use serde::{Deserialize, Serialize};

/// Title given to tasks created from the board
pub const NEW_TASK_TITLE: &str = "New Task";

/// Ordered columns of tasks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KanbanBoard {
    /// Columns in display order
    #[serde(default)]
    pub columns: Vector<Column>,
}

/// A board column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Unique within the board
    pub id: String,
    /// Column heading
    #[serde(default)]
    pub title: String,
    /// Tasks in display order
    #[serde(default)]
    pub tasks: Vector<Task>,
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within its column
    pub id: String,
    /// Card title
    #[serde(default)]
    pub title: String,
    /// Optional body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    /// Create empty column
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vector::new(),
        }
    }

    /// Find task by id
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, EditError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| EditError::not_found("task", id))
    }
}

impl KanbanBoard {
    /// Find column by id
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn column_mut(&mut self, id: &str) -> Result<&mut Column, EditError> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EditError::not_found("column", id))
    }

    /// Total tasks across columns
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Append a default task to a column, returning its id
    ///
    /// # Errors
    /// Returns error if the column does not exist
    pub fn add_task(&mut self, column_id: &str) -> Result<String, EditError> {
        let column = self.column_mut(column_id)?;
        let id = unique_id("task", column.tasks.iter().map(|t| t.id.as_str()));
        column.tasks.push_back(Task {
            id: id.clone(),
            title: NEW_TASK_TITLE.to_string(),
            description: Some(String::new()),
        });
        Ok(id)
    }

    /// Remove a task from a column
    ///
    /// # Errors
    /// Returns error if the column or task does not exist
    pub fn delete_task(&mut self, column_id: &str, task_id: &str) -> Result<Task, EditError> {
        let column = self.column_mut(column_id)?;
        let index = column
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| EditError::not_found("task", task_id))?;
        Ok(column.tasks.remove(index))
    }

    /// Move a task to the end of another column
    ///
    /// Moving within the same column sends the task to the bottom.
    ///
    /// # Errors
    /// Returns error if either column or the task does not exist, or if the
    /// target column already holds a task with the same id
    pub fn move_task(&mut self, task_id: &str, from: &str, to: &str) -> Result<(), EditError> {
        let target = self
            .column(to)
            .ok_or_else(|| EditError::not_found("column", to))?;
        if from != to && target.task(task_id).is_some() {
            return Err(EditError::invalid_value(
                format!("columns.{to}.tasks"),
                format!("task '{task_id}' already present"),
            ));
        }

        let source = self.column_mut(from)?;
        let index = source
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| EditError::not_found("task", task_id))?;
        let task = source.tasks.remove(index);

        self.column_mut(to)?.tasks.push_back(task);
        Ok(())
    }

    /// Check id uniqueness for columns and per-column tasks
    ///
    /// # Errors
    /// Returns error naming the first duplicate
    pub fn validate(&self) -> Result<(), SchemaError> {
        ensure_unique("columns", self.columns.iter().map(|c| c.id.as_str()))?;
        for column in &self.columns {
            ensure_unique("tasks", column.tasks.iter().map(|t| t.id.as_str()))?;
        }
        Ok(())
    }
}

impl EditableContent for KanbanBoard {
    fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), EditError> {
        let field = path.to_string();
        match path.as_strs().as_slice() {
            ["columns", column_id, "title"] => {
                let text = value.into_text(&field)?;
                self.column_mut(column_id)?.title = text;
            }
            ["columns", column_id, "tasks", task_id, "title"] => {
                let text = value.into_text(&field)?;
                self.column_mut(column_id)?.task_mut(task_id)?.title = text;
            }
            ["columns", column_id, "tasks", task_id, "description"] => {
                let text = value.into_text(&field)?;
                self.column_mut(column_id)?.task_mut(task_id)?.description = Some(text);
            }
            _ => return Err(EditError::UnknownField(path.clone())),
        }
        Ok(())
    }
}
