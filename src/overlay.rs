//! Body payload overlays.
//!
//! When a request carries a JSON body, the whole body is parsed once into
//! a string-keyed map and consulted before form/query values during field
//! binding. No schema validation is performed on the payload.

use crate::error::BodyError;

/// A parsed JSON request body, used as the highest-priority field source.
///
/// # Examples
///
/// ```
/// use entbind::BodyOverlay;
///
/// let overlay = BodyOverlay::from_body(br#"{"Amount": 12.5, "Note": null}"#).unwrap();
/// assert!(overlay.value("Amount").is_some());
/// // Null entries read as absent.
/// assert!(overlay.value("Note").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOverlay {
    entries: serde_json::Map<String, serde_json::Value>,
}

impl BodyOverlay {
    /// Parses body bytes into an overlay.
    ///
    /// Fails on invalid UTF-8, malformed JSON, or a top-level value that
    /// is not an object.
    pub fn from_body(body: &[u8]) -> Result<Self, BodyError> {
        let text = std::str::from_utf8(body).map_err(|_| BodyError::InvalidUtf8)?;
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| BodyError::Malformed {
                message: e.to_string(),
            })?;
        match json {
            serde_json::Value::Object(entries) => Ok(Self { entries }),
            other => Err(BodyError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Returns the payload value for a field's wire name.
    ///
    /// Missing entries and explicit nulls both read as `None`, so a null
    /// in the payload never overrides a form or query value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
        self.entries.get(name).filter(|v| !v.is_null())
    }

    /// Number of entries in the payload, nulls included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the payload object was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    use serde_json::Value as Json;
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_body() {
        let overlay = BodyOverlay::from_body(br#"{"Name": "Widget", "Price": 10}"#).unwrap();
        assert_eq!(overlay.len(), 2);
        assert_eq!(
            overlay.value("Name"),
            Some(&serde_json::json!("Widget"))
        );
    }

    #[test]
    fn test_null_entries_read_as_absent() {
        let overlay = BodyOverlay::from_body(br#"{"Name": null}"#).unwrap();
        assert_eq!(overlay.len(), 1);
        assert!(overlay.value("Name").is_none());
    }

    #[test]
    fn test_missing_entry_is_none() {
        let overlay = BodyOverlay::from_body(b"{}").unwrap();
        assert!(overlay.is_empty());
        assert!(overlay.value("Anything").is_none());
    }

    #[test]
    fn test_malformed_body() {
        let err = BodyOverlay::from_body(b"{not json").unwrap_err();
        assert!(matches!(err, BodyError::Malformed { .. }));
    }

    #[test]
    fn test_invalid_utf8_body() {
        let err = BodyOverlay::from_body(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(err, BodyError::InvalidUtf8);
    }

    #[test]
    fn test_non_object_body() {
        let err = BodyOverlay::from_body(b"[1, 2, 3]").unwrap_err();
        assert_eq!(err, BodyError::NotAnObject { found: "array" });

        let err = BodyOverlay::from_body(b"42").unwrap_err();
        assert_eq!(err, BodyError::NotAnObject { found: "number" });
    }
}
