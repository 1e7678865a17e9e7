//! Typed suggestions
//!
//! [`Suggestion`] is the checked form of [`SuggestionWire`]: each
//! [`SuggestionChange`] variant carries exactly the fields its type needs, so
//! an accepted suggestion either applies in full or not at all.

use crate::error::SuggestionError;
use crate::wire::{ChangeWire, SuggestionType, SuggestionWire};
use docsync_schema::{EditError, KpiField, NewKpi, Scorecard};

/// Machine-applicable payload of a suggestion
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionChange {
    /// Append a KPI to a perspective
    AddKpi {
        perspective_id: String,
        new_kpi: NewKpi,
    },
    /// Set a KPI's target
    AdjustTarget {
        perspective_id: String,
        kpi_id: String,
        value: f64,
    },
    /// Set a KPI's weight
    AdjustWeight {
        perspective_id: String,
        kpi_id: String,
        value: f64,
    },
    /// Advisory only
    RebalanceWeights,
    /// Advisory only
    General,
}

impl SuggestionChange {
    /// Suggestion category
    #[must_use]
    pub const fn kind(&self) -> SuggestionType {
        match self {
            Self::AddKpi { .. } => SuggestionType::AddKpi,
            Self::AdjustTarget { .. } => SuggestionType::AdjustTarget,
            Self::AdjustWeight { .. } => SuggestionType::AdjustWeight,
            Self::RebalanceWeights => SuggestionType::RebalanceWeights,
            Self::General => SuggestionType::General,
        }
    }

    /// Check if the change can be applied automatically
    #[inline]
    #[must_use]
    pub const fn is_applicable(&self) -> bool {
        !matches!(self, Self::RebalanceWeights | Self::General)
    }

    /// Apply the change in place
    ///
    /// Advisory variants leave the scorecard untouched.
    ///
    /// # Errors
    /// Returns error if the perspective or KPI does not exist; the scorecard
    /// is then unchanged
    pub fn apply(&self, scorecard: &mut Scorecard) -> Result<(), EditError> {
        match self {
            Self::AddKpi {
                perspective_id,
                new_kpi,
            } => scorecard.push_kpi(perspective_id, new_kpi.clone()).map(drop),
            Self::AdjustTarget {
                perspective_id,
                kpi_id,
                value,
            } => scorecard.set_kpi_field(perspective_id, kpi_id, KpiField::Target, (*value).into()),
            Self::AdjustWeight {
                perspective_id,
                kpi_id,
                value,
            } => scorecard.set_kpi_field(perspective_id, kpi_id, KpiField::Weight, (*value).into()),
            Self::RebalanceWeights | Self::General => Ok(()),
        }
    }

    fn to_wire(&self) -> ChangeWire {
        match self {
            Self::AddKpi {
                perspective_id,
                new_kpi,
            } => ChangeWire {
                perspective_id: Some(perspective_id.clone()),
                new_kpi: Some(new_kpi.clone()),
                ..ChangeWire::default()
            },
            Self::AdjustTarget {
                perspective_id,
                kpi_id,
                value,
            }
            | Self::AdjustWeight {
                perspective_id,
                kpi_id,
                value,
            } => ChangeWire {
                perspective_id: Some(perspective_id.clone()),
                kpi_id: Some(kpi_id.clone()),
                field: target_field(self.kind()).map(|f| f.as_str().to_string()),
                value: Some((*value).into()),
                new_kpi: None,
            },
            Self::RebalanceWeights | Self::General => ChangeWire::default(),
        }
    }
}

/// KPI field an adjust-type suggestion edits
fn target_field(kind: SuggestionType) -> Option<KpiField> {
    match kind {
        SuggestionType::AdjustTarget => Some(KpiField::Target),
        SuggestionType::AdjustWeight => Some(KpiField::Weight),
        _ => None,
    }
}

fn require<T>(
    kind: SuggestionType,
    field: &'static str,
    value: Option<T>,
) -> Result<T, SuggestionError> {
    value.ok_or(SuggestionError::MissingField { kind, field })
}

/// Checked, immutable suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    id: String,
    document_id: String,
    description: String,
    rationale: String,
    change: SuggestionChange,
}

impl Suggestion {
    /// Create suggestion from parts
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        change: SuggestionChange,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            description: String::new(),
            rationale: String::new(),
            change,
        }
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set rationale
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// Parse and check one suggestion from JSON text
    ///
    /// # Errors
    /// Returns error for malformed JSON or a change inconsistent with its type
    pub fn from_json(raw: &str) -> Result<Self, SuggestionError> {
        SuggestionWire::from_json(raw)?.try_into()
    }

    /// Suggestion id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Target document id
    #[inline]
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Short description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Why the change is proposed
    #[inline]
    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Typed change
    #[inline]
    #[must_use]
    pub fn change(&self) -> &SuggestionChange {
        &self.change
    }

    /// Category
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SuggestionType {
        self.change.kind()
    }

    /// Wire form with the given resolution flag
    #[must_use]
    pub fn to_wire(&self, is_resolved: bool) -> SuggestionWire {
        SuggestionWire {
            id: self.id.clone(),
            document_id: self.document_id.clone(),
            kind: self.kind(),
            description: self.description.clone(),
            rationale: self.rationale.clone(),
            change: self.change.to_wire(),
            is_resolved,
        }
    }
}

impl TryFrom<SuggestionWire> for Suggestion {
    type Error = SuggestionError;

    fn try_from(wire: SuggestionWire) -> Result<Self, Self::Error> {
        let kind = wire.kind;
        let c = wire.change;
        let change = match kind {
            SuggestionType::AddKpi => SuggestionChange::AddKpi {
                perspective_id: require(kind, "perspectiveId", c.perspective_id)?,
                new_kpi: require(kind, "newKpi", c.new_kpi)?,
            },
            SuggestionType::AdjustTarget | SuggestionType::AdjustWeight => {
                let expected = target_field(kind).map_or("", KpiField::as_str);
                let field = require(kind, "field", c.field)?;
                if field != expected {
                    return Err(SuggestionError::FieldMismatch {
                        kind,
                        expected,
                        actual: field,
                    });
                }
                let perspective_id = require(kind, "perspectiveId", c.perspective_id)?;
                let kpi_id = require(kind, "kpiId", c.kpi_id)?;
                let value = require(kind, "value", c.value)?.to_number(expected)?;
                if kind == SuggestionType::AdjustTarget {
                    SuggestionChange::AdjustTarget {
                        perspective_id,
                        kpi_id,
                        value,
                    }
                } else {
                    SuggestionChange::AdjustWeight {
                        perspective_id,
                        kpi_id,
                        value,
                    }
                }
            }
            SuggestionType::RebalanceWeights => SuggestionChange::RebalanceWeights,
            SuggestionType::General => SuggestionChange::General,
        };

        Ok(Self {
            id: wire.id,
            document_id: wire.document_id,
            description: wire.description,
            rationale: wire.rationale,
            change,
        })
    }
}
