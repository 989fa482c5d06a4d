//! Entity descriptors: the binding-relevant metadata for an entity type.
//!
//! A descriptor names the type, its bindable fields, its primary key(s),
//! and the optional designated unique field. It is supplied by the entity
//! layer and read-only to the binder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{FieldDescriptor, FieldKind};

/// Errors raised while building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The entity type name was empty.
    #[error("entity type name cannot be empty")]
    EmptyName,

    /// A field name occurred more than once.
    #[error("duplicate field: {name}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// A key referenced a field the descriptor does not declare.
    #[error("key references unknown field: {name}")]
    UnknownField {
        /// The missing field name.
        name: String,
    },

    /// A key referenced a complex field.
    #[error("key field {name} has a non-scalar kind")]
    ComplexKey {
        /// The offending field name.
        name: String,
    },
}

/// Binding metadata for one entity type.
///
/// # Examples
///
/// ```
/// use entbind::{EntityDescriptor, FieldKind};
///
/// let descriptor = EntityDescriptor::builder("Order")
///     .field("OrderNo", FieldKind::String)
///     .field("Amount", FieldKind::Float)
///     .unique_key("OrderNo")
///     .build()
///     .unwrap();
///
/// assert_eq!(descriptor.name(), "Order");
/// assert!(descriptor.unique_key_field().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    primary_keys: Vec<String>,
    unique_key: Option<String>,
}

impl EntityDescriptor {
    /// Starts building a descriptor for the named entity type.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
            primary_keys: Vec::new(),
            unique_key: None,
        }
    }

    /// The entity type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Primary-key field names.
    #[must_use]
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// Primary-key fields, resolved against the field list.
    pub fn primary_key_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.primary_keys.iter().filter_map(|name| self.field(name))
    }

    /// The designated unique field name, if any.
    #[must_use]
    pub fn unique_key(&self) -> Option<&str> {
        self.unique_key.as_deref()
    }

    /// The designated unique field, resolved against the field list.
    #[must_use]
    pub fn unique_key_field(&self) -> Option<&FieldDescriptor> {
        self.unique_key.as_deref().and_then(|name| self.field(name))
    }
}

/// Fluent, validating builder for [`EntityDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    primary_keys: Vec<String>,
    unique_key: Option<String>,
}

impl DescriptorBuilder {
    /// Declares a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    /// Adds a primary-key field by name. May be called repeatedly for
    /// composite keys.
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_keys.push(name.into());
        self
    }

    /// Designates the single unique identifying field.
    #[must_use]
    pub fn unique_key(mut self, name: impl Into<String>) -> Self {
        self.unique_key = Some(name.into());
        self
    }

    /// Validates and builds the descriptor.
    pub fn build(self) -> Result<EntityDescriptor, DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName);
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(DescriptorError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }

        let key_names = self
            .primary_keys
            .iter()
            .chain(self.unique_key.iter());
        for name in key_names {
            match self.fields.iter().find(|f| &f.name == name) {
                None => {
                    return Err(DescriptorError::UnknownField { name: name.clone() });
                }
                Some(field) if !field.kind.is_bindable() => {
                    return Err(DescriptorError::ComplexKey { name: name.clone() });
                }
                Some(_) => {}
            }
        }

        Ok(EntityDescriptor {
            name: self.name,
            fields: self.fields,
            primary_keys: self.primary_keys,
            unique_key: self.unique_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_builder() -> DescriptorBuilder {
        EntityDescriptor::builder("Order")
            .field("OrderNo", FieldKind::String)
            .field("Amount", FieldKind::Float)
            .field("Lines", FieldKind::Complex)
    }

    #[test]
    fn test_build_with_unique_key() {
        let descriptor = order_builder().unique_key("OrderNo").build().unwrap();
        assert_eq!(descriptor.name(), "Order");
        assert_eq!(descriptor.unique_key(), Some("OrderNo"));
        assert_eq!(
            descriptor.unique_key_field().unwrap().kind,
            FieldKind::String
        );
        assert!(descriptor.primary_keys().is_empty());
    }

    #[test]
    fn test_build_with_composite_keys() {
        let descriptor = EntityDescriptor::builder("OrderLine")
            .field("OrderId", FieldKind::Int)
            .field("LineNo", FieldKind::Int)
            .field("Sku", FieldKind::String)
            .primary_key("OrderId")
            .primary_key("LineNo")
            .build()
            .unwrap();
        assert_eq!(descriptor.primary_keys(), ["OrderId", "LineNo"]);
        assert_eq!(descriptor.primary_key_fields().count(), 2);
        assert!(descriptor.unique_key().is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = EntityDescriptor::builder("  ").build();
        assert_eq!(result.unwrap_err(), DescriptorError::EmptyName);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = EntityDescriptor::builder("Order")
            .field("OrderNo", FieldKind::String)
            .field("OrderNo", FieldKind::Int)
            .build();
        assert!(matches!(
            result,
            Err(DescriptorError::DuplicateField { name }) if name == "OrderNo"
        ));
    }

    #[test]
    fn test_unknown_key_field_rejected() {
        let result = order_builder().unique_key("Missing").build();
        assert!(matches!(
            result,
            Err(DescriptorError::UnknownField { name }) if name == "Missing"
        ));
    }

    #[test]
    fn test_complex_key_rejected() {
        let result = order_builder().primary_key("Lines").build();
        assert!(matches!(
            result,
            Err(DescriptorError::ComplexKey { name }) if name == "Lines"
        ));
    }

    #[test]
    fn test_field_lookup() {
        let descriptor = order_builder().build().unwrap();
        assert_eq!(descriptor.field("Amount").unwrap().kind, FieldKind::Float);
        assert!(descriptor.field("Nope").is_none());
    }
}
