//! Document kinds and the sealed [`DocumentKind`] trait
//!
//! Each kind (kanban, scorecard, idp) names its content type and the rules
//! for parsing, validating, rendering and hashing it.

use crate::edit::EditableContent;
use crate::error::SchemaError;
use crate::hash::ContentHash;
use crate::idp::DevelopmentPlan;
use crate::kanban::KanbanBoard;
use crate::scorecard::Scorecard;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// Document kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Kanban board
    Kanban,
    /// Balanced scorecard
    Scorecard,
    /// Individual development plan
    Idp,
}

impl Kind {
    /// All kinds
    pub const ALL: [Kind; 3] = [Kind::Kanban, Kind::Scorecard, Kind::Idp];

    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Scorecard => "scorecard",
            Self::Idp => "idp",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind(s.to_string()))
    }
}

/// Trait for document kinds
///
/// This trait is **sealed** - only the three kinds defined in this crate
/// implement it.
///
/// # Contract
/// - `parse` accepts exactly the JSON shape `render` produces
/// - `hash` depends on structure only, never on whitespace or key spacing
/// - `has_content` is true once the top-level collection is non-empty
pub trait DocumentKind: Send + Sync + 'static + Debug + private::Sealed {
    /// Canonical content for this kind
    type Content: Send
        + Sync
        + 'static
        + Debug
        + Clone
        + PartialEq
        + Default
        + Serialize
        + DeserializeOwned
        + EditableContent;

    /// Kind tag
    const KIND: Kind;

    /// True once the top-level collection has at least one member
    fn has_content(content: &Self::Content) -> bool;

    /// Validate structural invariants (id uniqueness per collection)
    ///
    /// # Errors
    /// Returns error if an invariant is violated
    fn validate(content: &Self::Content) -> Result<(), SchemaError>;

    /// Parse wire text into validated content
    ///
    /// # Errors
    /// Returns error for malformed JSON or invariant violations
    fn parse(raw: &str) -> Result<Self::Content, SchemaError> {
        let content: Self::Content = serde_json::from_str(raw)?;
        Self::validate(&content)?;
        Ok(content)
    }

    /// Render content to wire text
    ///
    /// # Errors
    /// Returns error if serialization fails
    fn render(content: &Self::Content, pretty: bool) -> Result<String, SchemaError> {
        let text = if pretty {
            serde_json::to_string_pretty(content)?
        } else {
            serde_json::to_string(content)?
        };
        Ok(text)
    }

    /// Structural hash of content
    fn hash(content: &Self::Content) -> ContentHash {
        ContentHash::of_json(content).unwrap_or_default()
    }
}

#[doc(hidden)]
pub mod private {
    /// Sealed trait marker
    pub trait Sealed {}
}

/// Kanban board kind
#[derive(Debug, Clone, Copy)]
pub struct KanbanKind;

/// Balanced scorecard kind
#[derive(Debug, Clone, Copy)]
pub struct ScorecardKind;

/// Individual development plan kind
#[derive(Debug, Clone, Copy)]
pub struct IdpKind;

impl private::Sealed for KanbanKind {}
impl private::Sealed for ScorecardKind {}
impl private::Sealed for IdpKind {}

impl DocumentKind for KanbanKind {
    type Content = KanbanBoard;
    const KIND: Kind = Kind::Kanban;

    fn has_content(content: &Self::Content) -> bool {
        !content.columns.is_empty()
    }

    fn validate(content: &Self::Content) -> Result<(), SchemaError> {
        content.validate()
    }
}

impl DocumentKind for ScorecardKind {
    type Content = Scorecard;
    const KIND: Kind = Kind::Scorecard;

    fn has_content(content: &Self::Content) -> bool {
        !content.perspectives.is_empty()
    }

    fn validate(content: &Self::Content) -> Result<(), SchemaError> {
        content.validate()
    }
}

impl DocumentKind for IdpKind {
    type Content = DevelopmentPlan;
    const KIND: Kind = Kind::Idp;

    fn has_content(content: &Self::Content) -> bool {
        !content.goals.is_empty()
    }

    fn validate(content: &Self::Content) -> Result<(), SchemaError> {
        content.validate()
    }
}

/// Canonical structure of any kind
///
/// Used where the kind is only known at runtime (CLI, ingest routing).
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical {
    /// Kanban board
    Kanban(KanbanBoard),
    /// Balanced scorecard
    Scorecard(Scorecard),
    /// Individual development plan
    Idp(DevelopmentPlan),
}

impl Canonical {
    /// Parse wire text for a runtime kind
    ///
    /// # Errors
    /// Returns error for malformed JSON or invariant violations
    pub fn parse(kind: Kind, raw: &str) -> Result<Self, SchemaError> {
        Ok(match kind {
            Kind::Kanban => Self::Kanban(KanbanKind::parse(raw)?),
            Kind::Scorecard => Self::Scorecard(ScorecardKind::parse(raw)?),
            Kind::Idp => Self::Idp(IdpKind::parse(raw)?),
        })
    }

    /// Kind tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Kanban(_) => Kind::Kanban,
            Self::Scorecard(_) => Kind::Scorecard,
            Self::Idp(_) => Kind::Idp,
        }
    }

    /// True once the top-level collection is non-empty
    #[must_use]
    pub fn has_content(&self) -> bool {
        match self {
            Self::Kanban(c) => KanbanKind::has_content(c),
            Self::Scorecard(c) => ScorecardKind::has_content(c),
            Self::Idp(c) => IdpKind::has_content(c),
        }
    }

    /// Render to wire text
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn render(&self, pretty: bool) -> Result<String, SchemaError> {
        match self {
            Self::Kanban(c) => KanbanKind::render(c, pretty),
            Self::Scorecard(c) => ScorecardKind::render(c, pretty),
            Self::Idp(c) => IdpKind::render(c, pretty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
        assert!(matches!(
            "sheet".parse::<Kind>(),
            Err(SchemaError::UnknownKind(_))
        ));
        assert_eq!(serde_json::to_string(&Kind::Idp).unwrap(), r#""idp""#);
    }

    #[test]
    fn truncated_payload_fails_parse() {
        let result = KanbanKind::parse(r#"{"columns":[{"id":"c1","title":"To"#);
        assert!(result.unwrap_err().is_transient());
    }

    #[test]
    fn hash_ignores_formatting() {
        let compact = ScorecardKind::parse(r#"{"employeeName":"Ada","period":"Q1","perspectives":[]}"#)
            .unwrap();
        let pretty = ScorecardKind::parse(
            "{\n  \"employeeName\": \"Ada\",\n  \"period\": \"Q1\",\n  \"perspectives\": []\n}",
        )
        .unwrap();
        assert_eq!(ScorecardKind::hash(&compact), ScorecardKind::hash(&pretty));
    }

    #[test]
    fn canonical_dispatches_by_kind() {
        let canonical = Canonical::parse(Kind::Idp, r#"{"goals":[]}"#).unwrap();
        assert_eq!(canonical.kind(), Kind::Idp);
        assert!(!canonical.has_content());
    }

    #[test]
    fn render_pretty_uses_two_space_indent() {
        let board = KanbanKind::parse(r#"{"columns":[]}"#).unwrap();
        assert_eq!(KanbanKind::render(&board, true).unwrap(), "{\n  \"columns\": []\n}");
        assert_eq!(KanbanKind::render(&board, false).unwrap(), r#"{"columns":[]}"#);
    }
}
