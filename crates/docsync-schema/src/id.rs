//! Id generation and uniqueness checks

use crate::error::SchemaError;
use std::collections::HashSet;
use uuid::Uuid;

/// Fresh id with a readable prefix, e.g. `task-3f2a…`
#[must_use]
pub fn fresh_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Fresh id guaranteed not to collide with `taken`
#[must_use]
pub fn unique_id<'a>(prefix: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    loop {
        let id = fresh_id(prefix);
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}

/// Ensure every id in one collection is unique
///
/// # Errors
/// Returns [`SchemaError::DuplicateId`] naming the first repeated id
pub(crate) fn ensure_unique<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SchemaError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
