//! Individual development plan content

use crate::edit::EditableContent;
use crate::error::{EditError, SchemaError};
use crate::id::ensure_unique;
use crate::path::FieldPath;
use crate::value::FieldValue;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Development plan for one employee and period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentPlan {
    /// Employee the plan belongs to
    #[serde(default)]
    pub employee_name: String,
    /// Plan period label
    #[serde(default)]
    pub period: String,
    /// Goals in display order
    #[serde(default)]
    pub goals: Vector<Goal>,
}

/// Development goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique within the plan
    pub id: String,
    /// Goal statement
    #[serde(default)]
    pub goal: String,
    /// Why the goal matters
    #[serde(default)]
    pub rationale: String,
    /// Actions in display order
    #[serde(default)]
    pub actions: Vector<Action>,
}

/// Concrete step towards a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Unique within its goal
    pub id: String,
    /// What to do
    #[serde(default)]
    pub activity: String,
    /// Action category (Training, Coaching, Project, Reading, Mentoring)
    #[serde(rename = "type", default)]
    pub action_type: String,
    /// Free-form timeline
    #[serde(default)]
    pub timeline: String,
    /// Progress state
    #[serde(default)]
    pub status: ActionStatus,
    /// Scorecard KPI this action supports
    #[serde(rename = "linkedKPI", default, skip_serializing_if = "Option::is_none")]
    pub linked_kpi: Option<String>,
}

/// Action progress, cycling not-started → in-progress → completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    /// Not begun
    #[default]
    NotStarted,
    /// Under way
    InProgress,
    /// Done
    Completed,
}

impl ActionStatus {
    /// All states in cycle order
    pub const ALL: [ActionStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    /// Next state in the cycle
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::NotStarted,
        }
    }

    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl Display for ActionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| EditError::invalid_value("status", format!("unknown status '{s}'")))
    }
}

impl Goal {
    /// Find action by id
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    fn action_mut(&mut self, id: &str) -> Result<&mut Action, EditError> {
        self.actions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| EditError::not_found("action", id))
    }
}

impl DevelopmentPlan {
    /// Find goal by id
    #[must_use]
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    fn goal_mut(&mut self, id: &str) -> Result<&mut Goal, EditError> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| EditError::not_found("goal", id))
    }

    /// Find action by id, searching goals in order
    #[must_use]
    pub fn find_action(&self, action_id: &str) -> Option<(&Goal, &Action)> {
        self.goals
            .iter()
            .find_map(|g| g.action(action_id).map(|a| (g, a)))
    }

    /// Advance the first action with this id to its next status
    ///
    /// Action ids are only unique per goal; use [`Self::toggle_status_in`]
    /// when the goal is known.
    ///
    /// # Errors
    /// Returns error if no goal holds the action
    pub fn toggle_status(&mut self, action_id: &str) -> Result<ActionStatus, EditError> {
        let goal_id = self
            .find_action(action_id)
            .map(|(g, _)| g.id.clone())
            .ok_or_else(|| EditError::not_found("action", action_id))?;
        self.toggle_status_in(&goal_id, action_id)
    }

    /// Advance an action inside a known goal to its next status
    ///
    /// # Errors
    /// Returns error if the goal or action does not exist
    pub fn toggle_status_in(
        &mut self,
        goal_id: &str,
        action_id: &str,
    ) -> Result<ActionStatus, EditError> {
        let action = self.goal_mut(goal_id)?.action_mut(action_id)?;
        action.status = action.status.next();
        Ok(action.status)
    }

    /// Total actions across goals
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.goals.iter().map(|g| g.actions.len()).sum()
    }

    /// Check id uniqueness for goals and per-goal actions
    ///
    /// # Errors
    /// Returns error naming the first duplicate
    pub fn validate(&self) -> Result<(), SchemaError> {
        ensure_unique("goals", self.goals.iter().map(|g| g.id.as_str()))?;
        for goal in &self.goals {
            ensure_unique("actions", goal.actions.iter().map(|a| a.id.as_str()))?;
        }
        Ok(())
    }
}

impl EditableContent for DevelopmentPlan {
    fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), EditError> {
        let field = path.to_string();
        match path.as_strs().as_slice() {
            ["employeeName"] => self.employee_name = value.into_text(&field)?,
            ["period"] => self.period = value.into_text(&field)?,
            ["goals", goal_id, name @ ("goal" | "rationale")] => {
                let text = value.into_text(&field)?;
                let goal = self.goal_mut(goal_id)?;
                if *name == "goal" {
                    goal.goal = text;
                } else {
                    goal.rationale = text;
                }
            }
            ["goals", goal_id, "actions", action_id, name] => {
                let text = value.into_text(&field)?;
                // parse before lookup so a bad status never half-applies
                let status = match *name {
                    "status" => Some(text.parse::<ActionStatus>()?),
                    "activity" | "type" | "timeline" | "linkedKPI" => None,
                    _ => return Err(EditError::UnknownField(path.clone())),
                };
                let action = self.goal_mut(goal_id)?.action_mut(action_id)?;
                match (*name, status) {
                    (_, Some(status)) => action.status = status,
                    ("activity", _) => action.activity = text,
                    ("type", _) => action.action_type = text,
                    ("timeline", _) => action.timeline = text,
                    _ => action.linked_kpi = (!text.is_empty()).then_some(text),
                }
            }
            _ => return Err(EditError::UnknownField(path.clone())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{DocumentKind, IdpKind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const RAW: &str = r#"{
        "employeeName": "Ada",
        "period": "2025",
        "goals": [
            {"id": "g1", "goal": "Lead", "rationale": "Growth", "actions": [
                {"id": "a1", "activity": "Course", "type": "Training", "timeline": "Q1", "status": "not-started", "linkedKPI": "k1"},
                {"id": "a2", "activity": "Shadow", "type": "Mentoring", "timeline": "Q2", "status": "completed"}
            ]},
            {"id": "g2", "goal": "Ship", "rationale": "Impact", "actions": [
                {"id": "a1", "activity": "Build", "type": "Project", "timeline": "Q3", "status": "in-progress"}
            ]}
        ]
    }"#;

    fn plan() -> DevelopmentPlan {
        IdpKind::parse(RAW).unwrap()
    }

    #[test]
    fn parses_wire_names() {
        let plan = plan();
        let a1 = plan.goal("g1").unwrap().action("a1").unwrap();
        assert_eq!(a1.action_type, "Training");
        assert_eq!(a1.linked_kpi.as_deref(), Some("k1"));
        assert_eq!(plan.goal("g1").unwrap().action("a2").unwrap().linked_kpi, None);
        let text = IdpKind::render(&plan, false).unwrap();
        assert!(text.contains("\"linkedKPI\":\"k1\""));
        assert!(text.contains("\"type\":\"Training\""));
        assert!(text.contains("\"status\":\"not-started\""));
    }

    #[test]
    fn missing_status_defaults_to_not_started() {
        let plan = IdpKind::parse(r#"{"goals":[{"id":"g","actions":[{"id":"a"}]}]}"#).unwrap();
        assert_eq!(plan.goals[0].actions[0].status, ActionStatus::NotStarted);
    }

    #[test]
    fn toggle_status_hits_first_goal() {
        let mut plan = plan();
        assert_eq!(plan.toggle_status("a1").unwrap(), ActionStatus::InProgress);
        assert_eq!(
            plan.goal("g2").unwrap().action("a1").unwrap().status,
            ActionStatus::InProgress
        );
        assert_eq!(
            plan.toggle_status_in("g2", "a1").unwrap(),
            ActionStatus::Completed
        );
    }

    #[test]
    fn toggle_status_unknown_action() {
        let mut plan = plan();
        let before = plan.clone();
        assert!(plan.toggle_status("zz").unwrap_err().is_lookup_failure());
        assert_eq!(plan, before);
    }

    #[test]
    fn set_field_by_path() {
        let mut plan = plan();
        plan.set_field(&"goals.g1.rationale".parse().unwrap(), "Promotion".into())
            .unwrap();
        plan.set_field(&"goals.g1.actions.a2.status".parse().unwrap(), "in-progress".into())
            .unwrap();
        plan.set_field(&"goals.g1.actions.a1.linkedKPI".parse().unwrap(), "".into())
            .unwrap();
        let g1 = plan.goal("g1").unwrap();
        assert_eq!(g1.rationale, "Promotion");
        assert_eq!(g1.action("a2").unwrap().status, ActionStatus::InProgress);
        assert_eq!(g1.action("a1").unwrap().linked_kpi, None);
    }

    #[test]
    fn bad_status_leaves_plan_untouched() {
        let mut plan = plan();
        let before = plan.clone();
        assert!(plan
            .set_field(&"goals.g1.actions.a1.status".parse().unwrap(), "done".into())
            .is_err());
        assert_eq!(plan, before);
    }

    #[test]
    fn status_cycle_names() {
        for status in ActionStatus::ALL {
            assert_eq!(status.as_str().parse::<ActionStatus>().unwrap(), status);
        }
    }

    proptest! {
        #[test]
        fn toggle_has_period_three(start in 0usize..3, toggles in 0usize..30) {
            let mut plan = plan();
            let initial = ActionStatus::ALL[start];
            plan.goals[0].actions[0].status = initial;

            for _ in 0..toggles {
                plan.toggle_status_in("g1", "a1").unwrap();
            }

            let expected = ActionStatus::ALL[(start + toggles) % 3];
            prop_assert_eq!(plan.goal("g1").unwrap().action("a1").unwrap().status, expected);
        }
    }
}
