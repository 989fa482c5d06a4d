//! Error types for entbind.
//!
//! Errors are strongly typed with thiserror and layered per concern, so
//! hosts can pattern-match specific conditions: per-field coercion
//! failures feed the host's validation surface, everything else fails the
//! bind call itself.

use thiserror::Error;

use crate::source::SourceError;

/// A raw value could not be coerced to a field's kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// The submitted value was empty for a kind that has no empty form.
    #[error("empty value for a non-string field")]
    Empty,

    /// The submitted value did not parse as the field's kind.
    #[error("cannot parse {value:?} as {kind}")]
    Parse {
        /// Target kind name.
        kind: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// The field's kind is never bound from request values.
    #[error("fields of kind {kind} are not bindable")]
    Unsupported {
        /// The non-bindable kind name.
        kind: &'static str,
    },
}

/// A JSON request body could not be turned into a payload overlay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The body bytes were not valid UTF-8.
    #[error("request body is not valid UTF-8")]
    InvalidUtf8,

    /// The body was not well-formed JSON.
    #[error("malformed JSON body: {message}")]
    Malformed {
        /// Decoder error text.
        message: String,
    },

    /// The body parsed, but the top level was not a JSON object.
    #[error("JSON body must be an object, got {found}")]
    NotAnObject {
        /// JSON type name of the top-level value.
        found: &'static str,
    },
}

/// A per-field binding failure, reported alongside the bound record.
///
/// Field errors never abort a bind; they are collected for the host's
/// standard per-field error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {field}: {source}")]
pub struct FieldError {
    /// Wire name of the failing field.
    pub field: String,
    /// What went wrong.
    #[source]
    pub source: CoerceError,
}

/// Top-level error type for bind operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// A caller-supplied argument was invalid (e.g. an empty binding target).
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// A primary-key value from the query string failed coercion.
    #[error("primary key field {field}: {source}")]
    KeyCoercion {
        /// Wire name of the key field.
        field: String,
        /// The coercion failure.
        #[source]
        source: CoerceError,
    },

    /// The JSON body payload could not be read.
    #[error("body payload error: {0}")]
    Body(#[from] BodyError),

    /// The entity source failed.
    #[error("entity source error: {0}")]
    Source(#[from] SourceError),
}

impl BindError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns true if this is an invalid-argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns true if this is a key-coercion error.
    #[must_use]
    pub const fn is_key_coercion(&self) -> bool {
        matches!(self, Self::KeyCoercion { .. })
    }

    /// Returns true if this is a body payload error.
    #[must_use]
    pub const fn is_body(&self) -> bool {
        matches!(self, Self::Body(_))
    }

    /// Returns true if this is an entity source error.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

/// Result type alias for bind operations.
pub type BindResult<T> = Result<T, BindError>;
