//! HTTP response as returned by a transport

use std::time::Duration;

use crate::request::Headers;

/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body as string
    pub body: String,
    /// Time spent waiting for the response
    pub duration: Duration,
}

impl HttpResponse {
    /// Creates a response with a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
            duration: Duration::ZERO,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns a response header value, ignoring name case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Parses the body as JSON, `None` if it is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// The OAuth2 `error` code of a JSON error body.
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        self.json()?
            .get("error")?
            .as_str()
            .map(ToString::to_string)
    }
}
