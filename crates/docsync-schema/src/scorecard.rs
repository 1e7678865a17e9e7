//! Balanced scorecard content

use crate::edit::EditableContent;
use crate::error::{EditError, SchemaError};
use crate::id::{ensure_unique, unique_id};
use crate::path::FieldPath;
use crate::value::FieldValue;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Scorecard for one employee and period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    /// Employee the scorecard belongs to
    #[serde(default)]
    pub employee_name: String,
    /// Review period label
    #[serde(default)]
    pub period: String,
    /// Perspectives in display order
    #[serde(default)]
    pub perspectives: Vector<Perspective>,
}

/// Performance dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perspective {
    /// Unique within the scorecard (typically `financial`, `customer`,
    /// `internal`, `learning`)
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Indicators in display order
    #[serde(default)]
    pub kpis: Vector<Kpi>,
}

/// Measurable indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    /// Unique within its perspective
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Goal value
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub target: f64,
    /// Measured value
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub current: f64,
    /// Unit label (`%`, `$`, `count`, ...)
    #[serde(default)]
    pub unit: String,
    /// Percentage weight within the perspective
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub weight: f64,
}

/// KPI payload without an id, as proposed by a suggestion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewKpi {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Goal value
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub target: f64,
    /// Measured value
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub current: f64,
    /// Unit label
    #[serde(default)]
    pub unit: String,
    /// Percentage weight
    #[serde(default, serialize_with = "crate::number::serialize")]
    pub weight: f64,
}

impl NewKpi {
    fn into_kpi(self, id: String) -> Kpi {
        Kpi {
            id,
            name: self.name,
            target: self.target,
            current: self.current,
            unit: self.unit,
            weight: self.weight,
        }
    }
}

/// Editable KPI fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KpiField {
    /// `name`
    Name,
    /// `target`
    Target,
    /// `current`
    Current,
    /// `unit`
    Unit,
    /// `weight`
    Weight,
}

impl KpiField {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Target => "target",
            Self::Current => "current",
            Self::Unit => "unit",
            Self::Weight => "weight",
        }
    }

    /// Check if field holds a number
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Target | Self::Current | Self::Weight)
    }
}

impl Display for KpiField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KpiField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "target" => Ok(Self::Target),
            "current" => Ok(Self::Current),
            "unit" => Ok(Self::Unit),
            "weight" => Ok(Self::Weight),
            other => Err(EditError::UnknownField(FieldPath::single(other))),
        }
    }
}

impl Kpi {
    /// Write one field, checking the value first
    ///
    /// # Errors
    /// Returns error if the value does not fit the field
    pub fn set(&mut self, field: KpiField, value: FieldValue) -> Result<(), EditError> {
        let name = field.as_str();
        match field {
            KpiField::Name => self.name = value.into_text(name)?,
            KpiField::Unit => self.unit = value.into_text(name)?,
            KpiField::Target => self.target = value.to_number(name)?,
            KpiField::Current => self.current = value.to_number(name)?,
            KpiField::Weight => self.weight = value.to_number(name)?,
        }
        Ok(())
    }
}

impl Perspective {
    /// Find KPI by id
    #[must_use]
    pub fn kpi(&self, id: &str) -> Option<&Kpi> {
        self.kpis.iter().find(|k| k.id == id)
    }

    /// Sum of KPI weights
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.kpis.iter().map(|k| k.weight).sum()
    }

    fn kpi_mut(&mut self, id: &str) -> Result<&mut Kpi, EditError> {
        self.kpis
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| EditError::not_found("kpi", id))
    }
}

impl Scorecard {
    /// Find perspective by id
    #[must_use]
    pub fn perspective(&self, id: &str) -> Option<&Perspective> {
        self.perspectives.iter().find(|p| p.id == id)
    }

    fn perspective_mut(&mut self, id: &str) -> Result<&mut Perspective, EditError> {
        self.perspectives
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| EditError::not_found("perspective", id))
    }

    /// Total KPIs across perspectives
    #[must_use]
    pub fn kpi_count(&self) -> usize {
        self.perspectives.iter().map(|p| p.kpis.len()).sum()
    }

    /// Append a KPI to a perspective under a fresh id, returning the id
    ///
    /// # Errors
    /// Returns error if the perspective does not exist
    pub fn push_kpi(&mut self, perspective_id: &str, kpi: NewKpi) -> Result<String, EditError> {
        let perspective = self.perspective_mut(perspective_id)?;
        let id = unique_id("kpi", perspective.kpis.iter().map(|k| k.id.as_str()));
        perspective.kpis.push_back(kpi.into_kpi(id.clone()));
        Ok(id)
    }

    /// Set one field on a KPI
    ///
    /// # Errors
    /// Returns error if the perspective or KPI does not exist, or the value
    /// does not fit the field
    pub fn set_kpi_field(
        &mut self,
        perspective_id: &str,
        kpi_id: &str,
        field: KpiField,
        value: FieldValue,
    ) -> Result<(), EditError> {
        self.perspective_mut(perspective_id)?
            .kpi_mut(kpi_id)?
            .set(field, value)
    }

    /// Check id uniqueness for perspectives and per-perspective KPIs
    ///
    /// Weight sums are not checked here; see the metrics layer.
    ///
    /// # Errors
    /// Returns error naming the first duplicate
    pub fn validate(&self) -> Result<(), SchemaError> {
        ensure_unique("perspectives", self.perspectives.iter().map(|p| p.id.as_str()))?;
        for perspective in &self.perspectives {
            ensure_unique("kpis", perspective.kpis.iter().map(|k| k.id.as_str()))?;
        }
        Ok(())
    }
}

impl EditableContent for Scorecard {
    fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), EditError> {
        let field = path.to_string();
        match path.as_strs().as_slice() {
            ["employeeName"] => self.employee_name = value.into_text(&field)?,
            ["period"] => self.period = value.into_text(&field)?,
            ["perspectives", perspective_id, "name"] => {
                let text = value.into_text(&field)?;
                self.perspective_mut(perspective_id)?.name = text;
            }
            ["perspectives", perspective_id, "kpis", kpi_id, name] => {
                let kpi_field = name
                    .parse::<KpiField>()
                    .map_err(|_| EditError::UnknownField(path.clone()))?;
                self.set_kpi_field(perspective_id, kpi_id, kpi_field, value)?;
            }
            _ => return Err(EditError::UnknownField(path.clone())),
        }
        Ok(())
    }
}
