//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It sends every enabled
//! header, hands the body over untouched and returns the response whatever
//! its status.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, Url};
use warden_application::ports::{HttpClient, HttpClientError};
use warden_domain::{Headers, HttpMethod, HttpRequest, HttpResponse};

/// Timeout applied when the request does not carry one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    default_timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds unless the request sets one
    /// - Follow redirects: up to 10
    /// - User-Agent: "warden/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("warden/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self::with_client(client))
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the timeout used for requests without one.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout: Duration) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }
        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }
        if error.is_body() || error.is_decode() {
            return HttpClientError::Body(error.to_string());
        }
        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let url = Url::parse(&request.url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(timeout);

        // Disabled headers are declarations only.
        for header in request.headers.enabled() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers.append(name.as_str(), value.to_str().unwrap_or("<binary>"));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HttpClientError::Body(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
            duration: start.elapsed(),
        })
    }
}
