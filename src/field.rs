//! Field shapes and string/JSON coercion.
//!
//! `FieldKind` replaces the host framework's runtime type codes with an
//! explicit tagged enumeration. It owns the coercion policy: how a raw
//! request string or a JSON payload value becomes a typed [`Value`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoerceError;
use crate::value::Value;

/// The shape of a bindable entity field.
///
/// `Complex` marks navigation/extension properties; those are never bound
/// directly from request values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Text field.
    String,
    /// UTC timestamp field.
    DateTime,
    /// Boolean field.
    Bool,
    /// Signed integer field.
    Int,
    /// Floating-point field.
    Float,
    /// UUID field.
    Uuid,
    /// Non-scalar field (navigation or extension property), never bound.
    Complex,
}

impl FieldKind {
    /// Returns true if fields of this kind participate in value binding.
    #[must_use]
    pub const fn is_bindable(&self) -> bool {
        !matches!(self, Self::Complex)
    }

    /// Returns a human-readable kind name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Uuid => "uuid",
            Self::Complex => "complex",
        }
    }

    /// Returns the kind's zero value, used when a blank record is created
    /// with defaults. `DateTime` and `Complex` have no zero and stay null.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Uuid => Value::Uuid(Uuid::nil()),
            Self::DateTime | Self::Complex => Value::Null,
        }
    }

    /// Coerces a raw request string to this kind.
    ///
    /// String fields take the raw value verbatim. For every other kind the
    /// value is trimmed first, and an empty value is an error rather than a
    /// silent zero.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        if matches!(self, Self::String) {
            return Ok(Value::String(raw.to_string()));
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoerceError::Empty);
        }

        match self {
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Bool => parse_bool(trimmed)
                .map(Value::Bool)
                .ok_or_else(|| self.parse_error(raw)),
            Self::Int => trimmed
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.parse_error(raw)),
            Self::Float => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.parse_error(raw)),
            Self::DateTime => parse_datetime(trimmed)
                .map(Value::DateTime)
                .ok_or_else(|| self.parse_error(raw)),
            Self::Uuid => Uuid::parse_str(trimmed)
                .map(Value::Uuid)
                .map_err(|_| self.parse_error(raw)),
            Self::Complex => Err(CoerceError::Unsupported { kind: self.name() }),
        }
    }

    /// Converts a JSON payload value to this kind.
    ///
    /// Scalars convert directly; strings go through the same parsers as
    /// form values, so `"2024-05-01"` works for a `DateTime` field whether
    /// it arrives in a form or a JSON body.
    pub fn value_from_json(&self, json: &serde_json::Value) -> Result<Value, CoerceError> {
        use serde_json::Value as Json;

        if json.is_null() {
            return Err(CoerceError::Empty);
        }

        match self {
            Self::String => match json {
                Json::String(s) => Ok(Value::String(s.clone())),
                Json::Number(n) => Ok(Value::String(n.to_string())),
                Json::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err(self.json_error(json)),
            },
            Self::Bool => match json {
                Json::Bool(b) => Ok(Value::Bool(*b)),
                Json::String(s) => parse_bool(s.trim())
                    .map(Value::Bool)
                    .ok_or_else(|| self.json_error(json)),
                _ => Err(self.json_error(json)),
            },
            Self::Int => match json {
                Json::Number(n) => n
                    .as_i64()
                    .map(Value::Int)
                    .ok_or_else(|| self.json_error(json)),
                Json::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| self.json_error(json)),
                _ => Err(self.json_error(json)),
            },
            Self::Float => match json {
                Json::Number(n) => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| self.json_error(json)),
                Json::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| self.json_error(json)),
                _ => Err(self.json_error(json)),
            },
            Self::DateTime => match json {
                Json::String(s) => parse_datetime(s.trim())
                    .map(Value::DateTime)
                    .ok_or_else(|| self.json_error(json)),
                _ => Err(self.json_error(json)),
            },
            Self::Uuid => match json {
                Json::String(s) => Uuid::parse_str(s.trim())
                    .map(Value::Uuid)
                    .map_err(|_| self.json_error(json)),
                _ => Err(self.json_error(json)),
            },
            Self::Complex => Err(CoerceError::Unsupported { kind: self.name() }),
        }
    }

    fn parse_error(&self, raw: &str) -> CoerceError {
        CoerceError::Parse {
            kind: self.name(),
            value: raw.to_string(),
        }
    }

    fn json_error(&self, json: &serde_json::Value) -> CoerceError {
        CoerceError::Parse {
            kind: self.name(),
            value: json.to_string(),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A bindable field: wire name plus kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Wire name, as submitted in forms, query strings, and JSON payloads.
    pub name: String,
    /// The field's shape.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Parses the boolean spellings HTML forms actually submit.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Parses the timestamp formats form posts and JSON payloads commonly use.
///
/// RFC 3339 first, then the naive date-time and date-only spellings,
/// interpreted as UTC.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}
