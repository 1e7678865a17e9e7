//! Append-only suggestion list with resolution state

use crate::error::SuggestionError;
use crate::suggestion::Suggestion;
use crate::wire::SuggestionWire;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Suggestions delivered for one document
///
/// Delivered suggestions are never removed or rewritten; only their
/// resolution flag changes. Resolution is editor-local and never persisted.
#[derive(Debug, Clone, Default)]
pub struct SuggestionBoard {
    document_id: String,
    items: Vec<Suggestion>,
    resolved: HashSet<String>,
}

impl SuggestionBoard {
    /// Create empty board for a document
    #[must_use]
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            items: Vec::new(),
            resolved: HashSet::new(),
        }
    }

    /// Document this board belongs to
    #[inline]
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Append a checked suggestion
    ///
    /// # Errors
    /// Returns error if the id was already delivered or the suggestion
    /// targets another document
    pub fn deliver(&mut self, suggestion: Suggestion) -> Result<(), SuggestionError> {
        if suggestion.document_id() != self.document_id {
            warn!(
                id = suggestion.id(),
                document = suggestion.document_id(),
                "suggestion for another document"
            );
            return Err(SuggestionError::WrongDocument {
                expected: self.document_id.clone(),
                actual: suggestion.document_id().to_string(),
            });
        }
        if self.get(suggestion.id()).is_some() {
            return Err(SuggestionError::DuplicateId(suggestion.id().to_string()));
        }
        debug!(id = suggestion.id(), kind = %suggestion.kind(), "suggestion delivered");
        self.items.push(suggestion);
        Ok(())
    }

    /// Check and append a wire suggestion, honouring its `isResolved` flag
    ///
    /// # Errors
    /// Returns error if the payload is inconsistent or cannot be delivered
    pub fn deliver_wire(&mut self, wire: SuggestionWire) -> Result<(), SuggestionError> {
        let resolved = wire.is_resolved;
        let suggestion = Suggestion::try_from(wire)?;
        let id = suggestion.id().to_string();
        self.deliver(suggestion)?;
        if resolved {
            self.resolved.insert(id);
        }
        Ok(())
    }

    /// Find suggestion by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Suggestion> {
        self.items.iter().find(|s| s.id() == id)
    }

    /// Mark a suggestion resolved
    ///
    /// Returns `true` if this call changed its state. Resolving twice is a
    /// no-op.
    ///
    /// # Errors
    /// Returns error if no suggestion has this id
    pub fn resolve(&mut self, id: &str) -> Result<bool, SuggestionError> {
        if self.get(id).is_none() {
            return Err(SuggestionError::NotFound(id.to_string()));
        }
        Ok(self.resolved.insert(id.to_string()))
    }

    /// Check if a suggestion is resolved
    #[must_use]
    pub fn is_resolved(&self, id: &str) -> bool {
        self.resolved.contains(id)
    }

    /// Unresolved suggestions in delivery order
    pub fn active(&self) -> impl Iterator<Item = &Suggestion> {
        self.items.iter().filter(|s| !self.resolved.contains(s.id()))
    }

    /// All suggestions in delivery order
    #[must_use]
    pub fn all(&self) -> &[Suggestion] {
        &self.items
    }

    /// Number of delivered suggestions
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was delivered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wire forms with current resolution flags
    #[must_use]
    pub fn to_wire(&self) -> Vec<SuggestionWire> {
        self.items
            .iter()
            .map(|s| s.to_wire(self.is_resolved(s.id())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::SuggestionChange;

    fn general(id: &str, doc: &str) -> Suggestion {
        Suggestion::new(id, doc, SuggestionChange::General)
    }

    #[test]
    fn deliver_keeps_order_and_rejects_duplicates() {
        let mut board = SuggestionBoard::new("d1");
        board.deliver(general("a", "d1")).unwrap();
        board.deliver(general("b", "d1")).unwrap();
        assert!(matches!(
            board.deliver(general("a", "d1")),
            Err(SuggestionError::DuplicateId(_))
        ));
        let ids: Vec<_> = board.active().map(Suggestion::id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn deliver_rejects_other_document() {
        let mut board = SuggestionBoard::new("d1");
        assert!(matches!(
            board.deliver(general("a", "d2")),
            Err(SuggestionError::WrongDocument { .. })
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut board = SuggestionBoard::new("d1");
        board.deliver(general("a", "d1")).unwrap();
        assert!(board.resolve("a").unwrap());
        assert!(!board.resolve("a").unwrap());
        assert!(board.is_resolved("a"));
        assert_eq!(board.active().count(), 0);
        assert_eq!(board.len(), 1);
        assert!(matches!(board.resolve("zz"), Err(SuggestionError::NotFound(_))));
    }

    #[test]
    fn wire_delivery_honours_resolved_flag() {
        let mut board = SuggestionBoard::new("d1");
        let wire = SuggestionWire::from_json(
            r#"{"id":"s1","documentId":"d1","type":"general","isResolved":true}"#,
        )
        .unwrap();
        board.deliver_wire(wire).unwrap();
        assert!(board.is_resolved("s1"));
        assert!(board.to_wire()[0].is_resolved);
    }
}
