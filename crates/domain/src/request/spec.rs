//! Outgoing HTTP request

use std::time::Duration;

use super::{CONTENT_TYPE, FORM_CONTENT_TYPE, FormData, Header, Headers, HttpMethod};

/// An HTTP request as seen by interceptors and transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<String>,
    /// Per-request timeout handed to the transport
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request with a form body.
    #[must_use]
    pub fn post_form(url: impl Into<String>, form: &FormData) -> Self {
        let mut request = Self::new(HttpMethod::Post, url);
        request.headers.insert(CONTENT_TYPE, FORM_CONTENT_TYPE);
        request.body = Some(form.encode());
        request
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.set(header);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
