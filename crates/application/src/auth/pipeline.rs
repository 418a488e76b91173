//! HTTP pipeline with the interceptor installed.

use std::sync::Arc;

use warden_domain::{HttpRequest, HttpResponse, Rejection};

use super::OAuthInterceptor;
use crate::error::TransportError;
use crate::ports::HttpClient;

/// Transport wrapped by the request and failed-response hooks.
///
/// Any non-2xx response is returned as [`TransportError::Rejected`] after the
/// failed-response hook has run. Network failures skip the hook.
#[derive(Debug)]
pub struct InterceptedClient<H> {
    http: Arc<H>,
    interceptor: OAuthInterceptor,
}

impl<H> Clone for InterceptedClient<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<H: HttpClient> InterceptedClient<H> {
    /// Installs `interceptor` in front of `http`.
    pub fn new(http: H, interceptor: OAuthInterceptor) -> Self {
        Self {
            http: Arc::new(http),
            interceptor,
        }
    }

    /// The installed interceptor.
    #[must_use]
    pub const fn interceptor(&self) -> &OAuthInterceptor {
        &self.interceptor
    }

    /// Sends a request through the hooks.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if no response was received and
    /// [`TransportError::Rejected`] for a non-2xx response.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.interceptor.on_request(&mut request).await;

        let url = request.url.clone();
        let method = request.method;
        let response = self
            .http
            .send(request)
            .await
            .inspect_err(|error| tracing::debug!(%url, %error, "request failed before a response"))?;

        tracing::debug!(
            %method,
            %url,
            status = response.status,
            elapsed_ms = response.duration.as_millis(),
            "response received"
        );

        if response.is_success() {
            return Ok(response);
        }

        let rejection = Rejection::new(url, response);
        self.interceptor.on_rejection(&rejection).await;
        Err(TransportError::Rejected(rejection))
    }
}
