//! HTTP Client port

use std::future::Future;

use warden_domain::{HttpRequest, HttpResponse};

/// Errors raised by a transport before any response is received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within its timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// Implementations return every response that was received, whatever its
/// status; classifying non-2xx responses is the pipeline's job. Headers that
/// are declared but disabled must not be sent.
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send;
}
