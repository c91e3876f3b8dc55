//! Outgoing request description

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::Serialize;

use crate::errors::{Result, ShopwireError};

/// One logical request, owned by a single in-flight call.
///
/// `url` is either absolute or a path resolved against the configured base
/// URL by the transport. Header names are case-insensitive.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach session cookies to the call
    pub with_credentials: bool,
    retried: bool,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            with_credentials: true,
            retried: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a header from string parts.
    ///
    /// # Errors
    /// Returns `ShopwireError::InvalidInput` if the name or value is not a
    /// legal HTTP header.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ShopwireError::InvalidInput(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ShopwireError::InvalidInput(format!("invalid header value: {e}")))?;
        Ok(self.header(name, value))
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns `ShopwireError::InvalidInput` if the body cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ShopwireError::InvalidInput(format!("failed to serialize body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without session cookies.
    pub fn without_credentials(mut self) -> Self {
        self.with_credentials = false;
        self
    }

    /// Whether this request has already been replayed after a session refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Flag the request as replayed. Returns `false` if it already was.
    #[doc(hidden)]
    pub fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }

    /// The URL with any query string or fragment removed.
    pub fn path(&self) -> &str {
        self.url.split(|c| c == '?' || c == '#').next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use http::header::CONTENT_TYPE;

    use super::*;

    #[test]
    fn header_names_are_case_insensitive() {
        let config = RequestConfig::get("/orders").try_header("x-shop-id", "7").unwrap();

        assert_eq!(config.headers.get("X-Shop-Id").unwrap(), "7");
        assert!(config.headers.contains_key("X-SHOP-ID"));
    }

    #[test]
    fn invalid_header_is_rejected() {
        let result = RequestConfig::get("/orders").try_header("bad header", "1");
        assert!(matches!(result, Err(ShopwireError::InvalidInput(_))));
    }

    #[test]
    fn retried_flag_flips_once() {
        let mut config = RequestConfig::post("/orders");
        assert!(!config.is_retried());
        assert!(config.mark_retried());
        assert!(config.is_retried());
        assert!(!config.mark_retried());
    }

    #[test]
    fn path_strips_query_and_fragment() {
        assert_eq!(RequestConfig::get("/auth/refresh?x=1").path(), "/auth/refresh");
        assert_eq!(RequestConfig::get("/a#frag").path(), "/a");
    }

    #[test]
    fn builder_collects_query_body_and_headers() {
        let config = RequestConfig::put("/products/3")
            .query("page", 2)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&serde_json::json!({ "name": "Lamp" }))
            .unwrap()
            .without_credentials();

        assert_eq!(config.method, Method::PUT);
        assert_eq!(config.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(config.body.unwrap()["name"], "Lamp");
        assert!(!config.with_credentials);
    }
}
