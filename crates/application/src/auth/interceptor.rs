//! Request and failed-response hooks.
//!
//! The outgoing hook attaches the stored credentials to requests aimed at the
//! active authorization server. The failed-response hook decides, from the
//! status and the OAuth2 error code, whether the stored token is dead.

use warden_domain::request::AUTHORIZATION;
use warden_domain::{HttpRequest, OAuthEvent, Rejection};

use super::{AuthEvents, OAuthContext, TokenStore};

/// Error codes of a 400 response that invalidate the stored token.
const FATAL_GRANT_ERRORS: [&str; 2] = ["invalid_request", "invalid_grant"];

/// Error code of a 401 response that reports an unusable access token.
const INVALID_TOKEN: &str = "invalid_token";

/// Reaction to a rejected response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionAction {
    /// Clear the stored token, then emit `oauth:error`.
    ClearAndNotify,
    /// Emit `oauth:error` and keep the token.
    Notify,
    /// Do nothing.
    Ignore,
}

/// Decides how to react to a rejected response.
#[must_use]
pub fn classify(rejection: &Rejection) -> RejectionAction {
    let code = rejection.error_code();
    let code = code.as_deref();

    match rejection.status() {
        400 if code.is_some_and(|c| FATAL_GRANT_ERRORS.contains(&c)) => {
            RejectionAction::ClearAndNotify
        }
        401 if code == Some(INVALID_TOKEN)
            || rejection
                .www_authenticate()
                .is_some_and(|value| value.starts_with("Bearer")) =>
        {
            RejectionAction::Notify
        }
        _ => RejectionAction::Ignore,
    }
}

/// Interceptor installed on the HTTP pipeline.
#[derive(Debug, Clone)]
pub struct OAuthInterceptor {
    context: OAuthContext,
    tokens: TokenStore,
    events: AuthEvents,
}

impl OAuthInterceptor {
    /// Creates an interceptor over shared handles.
    #[must_use]
    pub const fn new(context: OAuthContext, tokens: TokenStore, events: AuthEvents) -> Self {
        Self {
            context,
            tokens,
            events,
        }
    }

    /// Attaches the `Authorization` header when the request targets the
    /// active server and does not declare one itself.
    pub async fn on_request(&self, request: &mut HttpRequest) {
        if request.headers.contains(AUTHORIZATION) {
            return;
        }
        let Ok(server) = self.context.active_server().await else {
            return;
        };
        if !server.covers(&request.url) {
            return;
        }
        if let Some(value) = self.tokens.authorization_header().await {
            tracing::debug!(url = %request.url, "attaching authorization header");
            request.headers.insert(AUTHORIZATION, value);
        }
    }

    /// Reacts to a rejected response. The caller still propagates the
    /// rejection whatever the outcome.
    pub async fn on_rejection(&self, rejection: &Rejection) -> RejectionAction {
        let action = classify(rejection);
        match action {
            RejectionAction::ClearAndNotify => {
                tracing::info!(
                    url = rejection.url(),
                    status = rejection.status(),
                    "credentials rejected, clearing stored token"
                );
                if let Err(error) = self.tokens.remove_token().await {
                    tracing::warn!(%error, "failed to clear stored token");
                }
                self.events.emit(OAuthEvent::Error(rejection.clone()));
            }
            RejectionAction::Notify => {
                tracing::info!(
                    url = rejection.url(),
                    status = rejection.status(),
                    "access token rejected"
                );
                self.events.emit(OAuthEvent::Error(rejection.clone()));
            }
            RejectionAction::Ignore => {}
        }
        action
    }
}
