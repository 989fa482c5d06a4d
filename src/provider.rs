//! The binder provider: registry and capability gate.
//!
//! Hosts register an [`EntitySource`] per managed entity type, then ask
//! the provider for a binder whenever a binding target comes up. Types
//! with no registered source yield no binder, so the host's default
//! binding chain applies to them untouched.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::binder::{BinderOptions, EntityBinder};
use crate::error::{BindError, BindResult};
use crate::source::EntitySource;

/// What the host is trying to bind: the target entity type's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTarget {
    type_name: String,
}

impl BindingTarget {
    /// Creates a binding target for an entity type name.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    /// The target entity type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl From<&str> for BindingTarget {
    fn from(type_name: &str) -> Self {
        Self::new(type_name)
    }
}

/// Hands out entity binders for registered entity types.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use entbind::{
///     BindingTarget, EntityBinderProvider, EntityDescriptor, FieldKind,
///     InMemoryEntitySource,
/// };
///
/// let descriptor = EntityDescriptor::builder("Order")
///     .field("OrderNo", FieldKind::String)
///     .unique_key("OrderNo")
///     .build()
///     .unwrap();
///
/// let mut provider = EntityBinderProvider::new();
/// provider.register(Arc::new(InMemoryEntitySource::new(descriptor)));
///
/// assert!(provider
///     .get_binder(&BindingTarget::new("Order"))
///     .unwrap()
///     .is_some());
/// assert!(provider
///     .get_binder(&BindingTarget::new("Unknown"))
///     .unwrap()
///     .is_none());
/// ```
#[derive(Default)]
pub struct EntityBinderProvider {
    sources: HashMap<String, Arc<dyn EntitySource>>,
    options: BinderOptions,
}

impl EntityBinderProvider {
    /// Creates a provider with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with explicit binder options.
    #[must_use]
    pub fn with_options(options: BinderOptions) -> Self {
        Self {
            sources: HashMap::new(),
            options,
        }
    }

    /// Registers an entity source, making its type a managed entity.
    /// Re-registering a type replaces the previous source.
    pub fn register(&mut self, source: Arc<dyn EntitySource>) {
        let name = source.descriptor().name().to_string();
        info!(entity = %name, "registered entity model binder");
        self.sources.insert(name, source);
    }

    /// Returns true if the type has a registered source.
    #[must_use]
    pub fn is_managed(&self, type_name: &str) -> bool {
        self.sources.contains_key(type_name)
    }

    /// Names of all registered entity types.
    pub fn managed_types(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Returns a binder for the target type, or `None` when the type is
    /// not a managed entity (the host default chain applies).
    ///
    /// An empty target type name is rejected with
    /// [`BindError::InvalidArgument`].
    pub fn get_binder(&self, target: &BindingTarget) -> BindResult<Option<EntityBinder>> {
        if target.type_name().trim().is_empty() {
            return Err(BindError::invalid_argument(
                "binding target type name cannot be empty",
            ));
        }

        Ok(self
            .sources
            .get(target.type_name())
            .map(|source| EntityBinder::new(Arc::clone(source), self.options.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EntityDescriptor;
    use crate::field::FieldKind;
    use crate::source::InMemoryEntitySource;

    fn order_provider() -> EntityBinderProvider {
        let descriptor = EntityDescriptor::builder("Order")
            .field("OrderNo", FieldKind::String)
            .unique_key("OrderNo")
            .build()
            .unwrap();
        let mut provider = EntityBinderProvider::new();
        provider.register(Arc::new(InMemoryEntitySource::new(descriptor)));
        provider
    }

    #[test]
    fn test_registered_type_yields_binder() {
        let provider = order_provider();
        assert!(provider.is_managed("Order"));
        let binder = provider.get_binder(&BindingTarget::new("Order")).unwrap();
        assert!(binder.is_some());
    }

    #[test]
    fn test_unregistered_type_yields_none() {
        let provider = order_provider();
        assert!(!provider.is_managed("Customer"));
        let binder = provider
            .get_binder(&BindingTarget::new("Customer"))
            .unwrap();
        assert!(binder.is_none());
    }

    #[test]
    fn test_empty_target_is_invalid_argument() {
        let provider = order_provider();
        let err = provider.get_binder(&BindingTarget::new("  ")).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_managed_types_lists_registrations() {
        let provider = order_provider();
        let types: Vec<&str> = provider.managed_types().collect();
        assert_eq!(types, ["Order"]);
    }

    #[test]
    fn test_target_from_str() {
        let target: BindingTarget = "Order".into();
        assert_eq!(target.type_name(), "Order");
    }
}
