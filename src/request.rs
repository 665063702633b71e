//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use serde::de::DeserializeOwned;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: http::Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: http::Method,
        path: String,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self { method, path, headers, body, params: HashMap::new() }
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/getTweets/{id}`, `req.param("id")` on `/getTweets/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(body: &'static [u8]) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        Request::new(http::Method::POST, "/registerUser".into(), headers, Bytes::from_static(body))
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(b"{}");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn decodes_json_body() {
        let payload: Payload = request(br#"{"name":"Ada"}"#).json().unwrap();
        assert_eq!(payload.name, "Ada");
        assert!(request(b"not json").json::<Payload>().is_err());
    }

    #[test]
    fn params_are_attached_after_routing() {
        let params = HashMap::from([("id".to_owned(), "7".to_owned())]);
        let req = request(b"").with_params(params);
        assert_eq!(req.param("id"), Some("7"));
        assert_eq!(req.param("other"), None);
    }
}
