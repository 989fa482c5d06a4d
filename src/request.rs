//! The inbound request as the binder sees it.
//!
//! The host framework parses the wire request; the binder consumes an
//! already-decoded view: route values, multi-value query and form maps,
//! the content type, and the raw body bytes (read eagerly by the host).

use indexmap::IndexMap;

/// A decoded request handed to the binder by the host.
///
/// # Examples
///
/// ```
/// use entbind::BindRequest;
///
/// let request = BindRequest::builder()
///     .route("OrderNo", "12345")
///     .form("Amount", "10.5")
///     .build();
///
/// assert_eq!(request.route_value("OrderNo"), Some("12345"));
/// assert_eq!(request.form_first("Amount"), Some("10.5"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BindRequest {
    route: IndexMap<String, String>,
    query: IndexMap<String, Vec<String>>,
    form: IndexMap<String, Vec<String>>,
    content_type: Option<String>,
    body: Option<Vec<u8>>,
}

impl BindRequest {
    /// Starts building a request.
    #[must_use]
    pub fn builder() -> BindRequestBuilder {
        BindRequestBuilder::default()
    }

    /// Returns a route value by name.
    #[must_use]
    pub fn route_value(&self, name: &str) -> Option<&str> {
        self.route.get(name).map(String::as_str)
    }

    /// Returns all query-string values submitted under a name.
    #[must_use]
    pub fn query_values(&self, name: &str) -> &[String] {
        self.query.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first query-string value submitted under a name.
    #[must_use]
    pub fn query_first(&self, name: &str) -> Option<&str> {
        self.query_values(name).first().map(String::as_str)
    }

    /// Returns all form values submitted under a name.
    #[must_use]
    pub fn form_values(&self, name: &str) -> &[String] {
        self.form.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first form value submitted under a name.
    #[must_use]
    pub fn form_first(&self, name: &str) -> Option<&str> {
        self.form_values(name).first().map(String::as_str)
    }

    /// The request content type, if one was sent.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The raw body bytes, if a body was sent.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Returns true when the content type indicates a JSON payload.
    ///
    /// The wire contract is a substring test: any content type containing
    /// `json` qualifies (`application/json`, `text/json`,
    /// `application/problem+json`, ...).
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
    }

    /// Returns true when a non-empty body is present.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Fluent builder for [`BindRequest`].
#[derive(Debug, Clone, Default)]
pub struct BindRequestBuilder {
    request: BindRequest,
}

impl BindRequestBuilder {
    /// Sets a route value.
    #[must_use]
    pub fn route(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.route.insert(name.into(), value.into());
        self
    }

    /// Appends a query-string value. Repeat the name for multi-values.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request
            .query
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Appends a form value. Repeat the name for multi-values.
    #[must_use]
    pub fn form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request
            .form
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.request.content_type = Some(content_type.into());
        self
    }

    /// Sets the raw body bytes.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Finishes the request.
    #[must_use]
    pub fn build(self) -> BindRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_values() {
        let request = BindRequest::builder().route("OrderNo", "12345").build();
        assert_eq!(request.route_value("OrderNo"), Some("12345"));
        assert_eq!(request.route_value("Missing"), None);
    }

    #[test]
    fn test_multi_value_form() {
        let request = BindRequest::builder()
            .form("Tags", "3")
            .form("Tags", "2")
            .form("Tags", "5")
            .build();
        assert_eq!(request.form_values("Tags"), ["3", "2", "5"]);
        assert_eq!(request.form_first("Tags"), Some("3"));
    }

    #[test]
    fn test_multi_value_query() {
        let request = BindRequest::builder()
            .query("Id", "1")
            .query("Id", "2")
            .build();
        assert_eq!(request.query_values("Id"), ["1", "2"]);
    }

    #[test]
    fn test_absent_names_yield_empty() {
        let request = BindRequest::builder().build();
        assert!(request.form_values("X").is_empty());
        assert!(request.query_values("X").is_empty());
        assert_eq!(request.form_first("X"), None);
    }

    #[test]
    fn test_is_json_substring_match() {
        let json = BindRequest::builder()
            .content_type("application/json; charset=utf-8")
            .build();
        assert!(json.is_json());

        let vendor = BindRequest::builder()
            .content_type("application/problem+JSON")
            .build();
        assert!(vendor.is_json());

        let form = BindRequest::builder()
            .content_type("application/x-www-form-urlencoded")
            .build();
        assert!(!form.is_json());

        let none = BindRequest::builder().build();
        assert!(!none.is_json());
    }

    #[test]
    fn test_has_body() {
        let empty = BindRequest::builder().body(Vec::new()).build();
        assert!(!empty.has_body());

        let with_body = BindRequest::builder().body(b"{}".to_vec()).build();
        assert!(with_body.has_body());

        let no_body = BindRequest::builder().build();
        assert!(!no_body.has_body());
    }
}
