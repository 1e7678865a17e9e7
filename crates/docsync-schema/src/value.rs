//! Values carried by field edits

use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// A value written into a single field
///
/// Text inputs deliver strings and numeric inputs deliver numbers, but a
/// numeric field also accepts a string holding a number (the shape AI
/// suggestions frequently use).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl FieldValue {
    /// Interpret as a finite number
    ///
    /// # Errors
    /// Returns error if the value is non-numeric text or not finite
    pub fn to_number(&self, field: &str) -> Result<f64, EditError> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                EditError::invalid_value(field, format!("'{s}' is not a number"))
            })?,
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(EditError::invalid_value(field, "number must be finite"))
        }
    }

    /// Interpret as text
    ///
    /// # Errors
    /// Returns error for numeric values
    pub fn into_text(self, field: &str) -> Result<String, EditError> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Number(_) => Err(EditError::invalid_value(field, "expected text")),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_accepted() {
        assert_eq!(FieldValue::from(" 42.5 ").to_number("target"), Ok(42.5));
        assert_eq!(FieldValue::from(7.0).to_number("target"), Ok(7.0));
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        assert!(matches!(
            FieldValue::from("lots").to_number("target"),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(FieldValue::from(f64::NAN).to_number("weight").is_err());
    }

    #[test]
    fn numbers_are_not_text() {
        assert!(FieldValue::from(1.0).into_text("title").is_err());
        assert_eq!(FieldValue::from("x").into_text("title"), Ok("x".to_string()));
    }

    #[test]
    fn untagged_wire_shape() {
        let n: FieldValue = serde_json::from_str("120").unwrap();
        let s: FieldValue = serde_json::from_str(r#""120""#).unwrap();
        assert_eq!(n, FieldValue::Number(120.0));
        assert_eq!(s, FieldValue::Text("120".to_string()));
    }
}
