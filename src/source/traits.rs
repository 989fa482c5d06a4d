//! The entity source contract.
//!
//! A source adapts one entity type's persistence layer to the binder:
//! descriptor lookup, keyed fetch-for-edit, filtered fetch, and blank
//! creation. Implementations typically wrap an ORM table or repository.

use thiserror::Error;

use crate::descriptor::EntityDescriptor;
use crate::entity::EntityRecord;
use crate::filter::KeyFilter;
use crate::value::Value;

/// Errors that can occur inside an entity source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The underlying backend failed.
    #[error("entity backend error: {message}")]
    Backend {
        /// Backend error text.
        message: String,
    },
}

impl SourceError {
    /// Creates a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Access to one entity type on behalf of the binder.
///
/// "Not found" is never an error on this trait: keyed and filtered
/// lookups return `Ok(None)` on a miss, and the binder degrades to
/// creating a blank record.
pub trait EntitySource: Send + Sync {
    /// The binding metadata for this entity type.
    fn descriptor(&self) -> &EntityDescriptor;

    /// Fetches the record identified by the unique key value, loaded for
    /// a subsequent edit. `Ok(None)` when no record matches.
    fn find_by_key_for_edit(&self, key: &Value) -> Result<Option<EntityRecord>, SourceError>;

    /// Fetches the first record matching an equality filter.
    /// `Ok(None)` when no record matches.
    fn find(&self, filter: &KeyFilter) -> Result<Option<EntityRecord>, SourceError>;

    /// Creates a blank record. With `init_defaults`, each bindable field
    /// is set to its kind's zero value; otherwise all fields are unset.
    fn create_blank(&self, init_defaults: bool) -> Result<EntityRecord, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: the trait must stay object-safe.
    fn _assert_entity_source_object_safe(_: &dyn EntitySource) {}

    #[test]
    fn test_source_error_display() {
        let err = SourceError::backend("connection refused");
        assert!(err.to_string().contains("connection refused"));
    }
}
