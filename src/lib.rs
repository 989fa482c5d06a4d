//! # Entbind - entity-aware model binding for web request pipelines
//!
//! Entbind decides how an inbound request materializes a strongly-typed
//! domain entity: fetch an existing record for edit when the request
//! carries its key, or create a blank one when it does not. It then
//! resolves per-field values from a precedence-ordered set of sources,
//! preferring a JSON body payload over standard form and query values.
//!
//! ## Core Concepts
//!
//! - **EntityDescriptor**: binding metadata for a type - fields, primary
//!   keys, and the optional designated unique field
//! - **EntitySource**: the capability seam to the entity layer - keyed
//!   fetch-for-edit, filtered fetch, and blank creation
//! - **EntityBinder**: the load-or-create resolution policy plus field
//!   binding
//! - **BodyOverlay**: a parsed JSON request body used as the
//!   highest-priority field value source
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use entbind::{
//!     BindRequest, BindingTarget, EntityBinderProvider, EntityDescriptor,
//!     FieldKind, InMemoryEntitySource,
//! };
//!
//! let descriptor = EntityDescriptor::builder("Order")
//!     .field("OrderNo", FieldKind::String)
//!     .field("Amount", FieldKind::Float)
//!     .unique_key("OrderNo")
//!     .build()?;
//!
//! let mut provider = EntityBinderProvider::new();
//! provider.register(Arc::new(InMemoryEntitySource::new(descriptor)));
//!
//! let binder = provider.get_binder(&BindingTarget::new("Order"))?.unwrap();
//! let request = BindRequest::builder()
//!     .route("OrderNo", "12345")
//!     .form("Amount", "99.5")
//!     .build();
//! let outcome = binder.bind(&request)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod value;

// Request surface and binding pipeline
pub mod binder;
pub mod overlay;
pub mod provider;
pub mod request;
pub mod source;

// Re-export primary types at crate root for convenience
pub use binder::{
    BindContext, BindOutcome, BindReport, BinderOptions, BodyPolicy, EntityBinder, Resolution,
    ResolutionKind,
};
pub use descriptor::{DescriptorBuilder, DescriptorError, EntityDescriptor};
pub use entity::EntityRecord;
pub use error::{BindError, BindResult, BodyError, CoerceError, FieldError};
pub use field::{FieldDescriptor, FieldKind};
pub use filter::KeyFilter;
pub use overlay::BodyOverlay;
pub use provider::{BindingTarget, EntityBinderProvider};
pub use request::{BindRequest, BindRequestBuilder};
pub use source::{EntitySource, InMemoryEntitySource, SourceError};
pub use value::Value;
