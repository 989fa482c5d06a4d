//! Equality filters for composite-key lookups.
//!
//! A [`KeyFilter`] is the logical AND of per-field equality terms, built
//! one term per primary-key field from coerced query-string values.

use crate::entity::EntityRecord;
use crate::value::Value;

/// An equality filter over entity fields, combined with logical AND.
///
/// # Examples
///
/// ```
/// use entbind::{EntityRecord, KeyFilter, Value};
///
/// let filter = KeyFilter::new()
///     .and("OrderId", Value::Int(7))
///     .and("LineNo", Value::Int(2));
///
/// let mut record = EntityRecord::new("OrderLine");
/// record.set("OrderId", Value::Int(7));
/// record.set("LineNo", Value::Int(2));
/// assert!(filter.matches(&record));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyFilter {
    terms: Vec<(String, Value)>,
}

impl KeyFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality term.
    #[must_use]
    pub fn and(mut self, field: impl Into<String>, value: Value) -> Self {
        self.terms.push((field.into(), value));
        self
    }

    /// The filter's terms, in the order they were added.
    #[must_use]
    pub fn terms(&self) -> &[(String, Value)] {
        &self.terms
    }

    /// Returns true if the filter has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if every term matches the record exactly.
    ///
    /// An empty filter matches nothing: a keyless lookup must not pick an
    /// arbitrary record.
    #[must_use]
    pub fn matches(&self, record: &EntityRecord) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        self.terms
            .iter()
            .all(|(field, value)| record.get(field) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order_id: i64, line_no: i64) -> EntityRecord {
        let mut record = EntityRecord::new("OrderLine");
        record.set("OrderId", Value::Int(order_id));
        record.set("LineNo", Value::Int(line_no));
        record
    }

    #[test]
    fn test_all_terms_must_match() {
        let filter = KeyFilter::new()
            .and("OrderId", Value::Int(7))
            .and("LineNo", Value::Int(2));

        assert!(filter.matches(&line(7, 2)));
        assert!(!filter.matches(&line(7, 3)));
        assert!(!filter.matches(&line(8, 2)));
    }

    #[test]
    fn test_missing_field_does_not_match() {
        let filter = KeyFilter::new().and("OrderId", Value::Int(7));
        let record = EntityRecord::new("OrderLine");
        assert!(!filter.matches(&record));
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = KeyFilter::new();
        assert!(filter.is_empty());
        assert!(!filter.matches(&line(1, 1)));
    }

    #[test]
    fn test_value_equality_is_typed() {
        // Int(7) is not String("7").
        let filter = KeyFilter::new().and("OrderId", Value::String("7".to_string()));
        assert!(!filter.matches(&line(7, 1)));
    }
}
