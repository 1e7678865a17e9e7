//! Accepting and rejecting suggestions against a scorecard

use crate::suggestion::Suggestion;
use docsync_schema::{EditError, Scorecard};
use tracing::debug;

/// Result of accepting a suggestion
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    /// The change applied; carries the new scorecard
    Applied(Scorecard),
    /// Advisory suggestion; nothing to apply
    NotApplicable,
    /// A referenced perspective or KPI is missing; nothing applied
    Dropped(EditError),
}

impl AcceptOutcome {
    /// Check if the change applied
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Check if a suggestion can be applied automatically
#[inline]
#[must_use]
pub fn is_applicable(suggestion: &Suggestion) -> bool {
    suggestion.change().is_applicable()
}

/// Apply a suggestion to a copy of `canonical`
///
/// The input is never modified. Either the whole change lands in the
/// returned scorecard or the outcome carries no scorecard at all.
#[must_use]
pub fn accept(suggestion: &Suggestion, canonical: &Scorecard) -> AcceptOutcome {
    if !is_applicable(suggestion) {
        debug!(id = suggestion.id(), kind = %suggestion.kind(), "suggestion not applicable");
        return AcceptOutcome::NotApplicable;
    }

    let mut next = canonical.clone();
    match suggestion.change().apply(&mut next) {
        Ok(()) => AcceptOutcome::Applied(next),
        Err(e) => {
            debug!(id = suggestion.id(), error = %e, "suggestion dropped");
            AcceptOutcome::Dropped(e)
        }
    }
}

/// Acknowledge a suggestion without changing content
///
/// Resolution state lives in [`crate::SuggestionBoard`]; this exists so the
/// accept and reject paths read the same at call sites.
#[inline]
pub fn reject(suggestion: &Suggestion) {
    debug!(id = suggestion.id(), "suggestion rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::SuggestionChange;
    use docsync_schema::{DocumentKind, NewKpi, ScorecardKind};
    use pretty_assertions::assert_eq;

    fn card() -> Scorecard {
        ScorecardKind::parse(
            r#"{"perspectives":[
                {"id":"financial","name":"Financial","kpis":[
                    {"id":"k1","name":"Revenue","target":100,"current":90,"unit":"%","weight":50}
                ]},
                {"id":"customer","name":"Customer","kpis":[]}
            ]}"#,
        )
        .unwrap()
    }

    fn add_kpi(perspective_id: &str) -> Suggestion {
        Suggestion::new(
            "s1",
            "d1",
            SuggestionChange::AddKpi {
                perspective_id: perspective_id.into(),
                new_kpi: NewKpi {
                    name: "NPS".into(),
                    target: 50.0,
                    current: 30.0,
                    unit: "pts".into(),
                    weight: 20.0,
                },
            },
        )
    }

    #[test]
    fn add_kpi_grows_only_its_perspective() {
        let before = card();
        let AcceptOutcome::Applied(after) = accept(&add_kpi("customer"), &before) else {
            panic!("expected applied");
        };
        assert_eq!(after.perspective("customer").unwrap().kpis.len(), 1);
        assert_eq!(after.perspective("financial"), before.perspective("financial"));
        assert_eq!(before.perspective("customer").unwrap().kpis.len(), 0);
    }

    #[test]
    fn add_kpi_unknown_perspective_is_dropped() {
        let before = card();
        let outcome = accept(&add_kpi("nope"), &before);
        assert!(matches!(outcome, AcceptOutcome::Dropped(ref e) if e.is_lookup_failure()));
        assert_eq!(before, card());
    }

    #[test]
    fn adjust_weight_sets_field() {
        let s = Suggestion::new(
            "s2",
            "d1",
            SuggestionChange::AdjustWeight {
                perspective_id: "financial".into(),
                kpi_id: "k1".into(),
                value: 35.0,
            },
        );
        let AcceptOutcome::Applied(after) = accept(&s, &card()) else {
            panic!("expected applied");
        };
        assert_eq!(after.perspective("financial").unwrap().kpi("k1").unwrap().weight, 35.0);
    }

    #[test]
    fn adjust_missing_kpi_is_dropped() {
        let s = Suggestion::new(
            "s2",
            "d1",
            SuggestionChange::AdjustTarget {
                perspective_id: "financial".into(),
                kpi_id: "k9".into(),
                value: 1.0,
            },
        );
        assert!(matches!(accept(&s, &card()), AcceptOutcome::Dropped(_)));
    }

    #[test]
    fn general_is_not_applicable() {
        let s = Suggestion::new("s3", "d1", SuggestionChange::General);
        assert!(!is_applicable(&s));
        assert_eq!(accept(&s, &card()), AcceptOutcome::NotApplicable);
    }
}
