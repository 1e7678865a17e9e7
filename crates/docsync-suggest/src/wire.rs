//! Suggestion wire format
//!
//! Mirrors the JSON the analysis collaborator delivers. Every change field is
//! optional here; [`crate::Suggestion`] checks them against the type.

use docsync_schema::{FieldValue, NewKpi};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Suggestion category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionType {
    /// Add a KPI to a perspective
    AddKpi,
    /// Change a KPI's target
    AdjustTarget,
    /// Change a KPI's weight
    AdjustWeight,
    /// Advice to rebalance weights (not machine-applicable)
    RebalanceWeights,
    /// Free-form advice (not machine-applicable)
    General,
}

impl SuggestionType {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddKpi => "add-kpi",
            Self::AdjustTarget => "adjust-target",
            Self::AdjustWeight => "adjust-weight",
            Self::RebalanceWeights => "rebalance-weights",
            Self::General => "general",
        }
    }
}

impl Display for SuggestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loose change payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_kpi: Option<NewKpi>,
}

/// Suggestion as delivered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionWire {
    pub id: String,
    pub document_id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub change: ChangeWire,
    #[serde(default)]
    pub is_resolved: bool,
}

impl SuggestionWire {
    /// Parse one suggestion from JSON text
    ///
    /// # Errors
    /// Returns error for malformed JSON
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
