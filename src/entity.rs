//! Entity records: the instances the binder resolves and fills.
//!
//! A record is a dynamic field map because the binder works against any
//! registered entity type; the entity layer owns the mapping to and from
//! its concrete domain structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One entity instance, either loaded for edit or freshly created.
///
/// # Examples
///
/// ```
/// use entbind::{EntityRecord, Value};
///
/// let mut order = EntityRecord::new("Order");
/// order.set("OrderNo", Value::String("12345".to_string()));
///
/// assert_eq!(order.entity_type(), "Order");
/// assert!(order.is_set("OrderNo"));
/// assert!(order.get("Amount").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    entity_type: String,
    values: BTreeMap<String, Value>,
}

impl EntityRecord {
    /// Creates an empty record of the given entity type.
    #[must_use]
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            values: BTreeMap::new(),
        }
    }

    /// The entity type name this record belongs to.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the value set for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Sets a field value, replacing any previous one.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Returns true if the field has been set on this record.
    #[must_use]
    pub fn is_set(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Iterates the set fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of set fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
