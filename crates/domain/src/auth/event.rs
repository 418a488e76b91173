//! Notifications raised by the authentication layer

use crate::response::Rejection;

/// Name under which authentication failures are published.
pub const OAUTH_ERROR_EVENT: &str = "oauth:error";

/// Event published to authentication listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthEvent {
    /// The authorization server or a protected resource rejected the
    /// credentials. Carries the rejected response.
    Error(Rejection),
}

impl OAuthEvent {
    /// Event name, as used by listeners that dispatch on strings.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Error(_) => OAUTH_ERROR_EVENT,
        }
    }

    /// The rejection carried by the event.
    #[must_use]
    pub const fn rejection(&self) -> &Rejection {
        match self {
            Self::Error(rejection) => rejection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::HttpResponse;

    #[test]
    fn test_error_event_name() {
        let rejection = Rejection::new("https://api.test/me", HttpResponse::new(401, ""));
        let event = OAuthEvent::Error(rejection);
        assert_eq!(event.name(), "oauth:error");
        assert_eq!(event.rejection().status(), 401);
    }
}
