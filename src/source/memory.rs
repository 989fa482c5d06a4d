//! In-memory entity source.
//!
//! A thread-safe record list behind the [`EntitySource`] trait, intended
//! for tests and embedded callers. Keyed lookups match the descriptor's
//! unique field, falling back to a lone primary key.

use std::sync::RwLock;

use crate::descriptor::EntityDescriptor;
use crate::entity::EntityRecord;
use crate::filter::KeyFilter;
use crate::source::traits::{EntitySource, SourceError};
use crate::value::Value;

fn lock_err(context: &'static str) -> SourceError {
    SourceError::backend(format!("poisoned lock: {context}"))
}

/// Thread-safe in-memory source for one entity type.
pub struct InMemoryEntitySource {
    descriptor: EntityDescriptor,
    records: RwLock<Vec<EntityRecord>>,
}

impl InMemoryEntitySource {
    /// Creates an empty source for the described entity type.
    #[must_use]
    pub fn new(descriptor: EntityDescriptor) -> Self {
        Self {
            descriptor,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Adds a record. The record's entity type must match the descriptor.
    pub fn insert(&self, record: EntityRecord) -> Result<(), SourceError> {
        if record.entity_type() != self.descriptor.name() {
            return Err(SourceError::backend(format!(
                "entity type mismatch: source holds {}, record is {}",
                self.descriptor.name(),
                record.entity_type()
            )));
        }
        let mut records = self.records.write().map_err(|_| lock_err("insert"))?;
        records.push(record);
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, SourceError> {
        let records = self.records.read().map_err(|_| lock_err("len"))?;
        Ok(records.len())
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> Result<bool, SourceError> {
        Ok(self.len()? == 0)
    }

    /// The field keyed lookups match against: the unique field when
    /// declared, otherwise a lone primary key.
    fn key_field_name(&self) -> Option<&str> {
        self.descriptor.unique_key().or_else(|| {
            match self.descriptor.primary_keys() {
                [only] => Some(only.as_str()),
                _ => None,
            }
        })
    }
}

impl EntitySource for InMemoryEntitySource {
    fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    fn find_by_key_for_edit(&self, key: &Value) -> Result<Option<EntityRecord>, SourceError> {
        let Some(field) = self.key_field_name() else {
            return Ok(None);
        };
        let records = self.records.read().map_err(|_| lock_err("find_by_key"))?;
        Ok(records
            .iter()
            .find(|record| record.get(field) == Some(key))
            .cloned())
    }

    fn find(&self, filter: &KeyFilter) -> Result<Option<EntityRecord>, SourceError> {
        let records = self.records.read().map_err(|_| lock_err("find"))?;
        Ok(records.iter().find(|record| filter.matches(record)).cloned())
    }

    fn create_blank(&self, init_defaults: bool) -> Result<EntityRecord, SourceError> {
        let mut record = EntityRecord::new(self.descriptor.name());
        if init_defaults {
            for field in self.descriptor.fields() {
                if field.kind.is_bindable() {
                    record.set(field.name.clone(), field.kind.default_value());
                }
            }
        }
        Ok(record)
    }
}
