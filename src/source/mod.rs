//! Entity source abstraction for the binder.
//!
//! The trait is the capability seam: an entity type is "bindable as a
//! managed entity" exactly when a source for it is registered with the
//! provider. An in-memory implementation backs tests and embedded use.

mod memory;
mod traits;

pub use memory::InMemoryEntitySource;
pub use traits::{EntitySource, SourceError};
