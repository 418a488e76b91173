//! Non-2xx responses surfaced as errors

use std::fmt;

use super::HttpResponse;

/// A response whose status is not 2xx.
///
/// Interceptors inspect it; callers always receive it back as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    url: String,
    response: HttpResponse,
}

impl Rejection {
    /// Wraps a failed response for the given request URL.
    #[must_use]
    pub fn new(url: impl Into<String>, response: HttpResponse) -> Self {
        Self {
            url: url.into(),
            response,
        }
    }

    /// URL of the rejected request.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.response.status
    }

    /// The full response.
    #[must_use]
    pub const fn response(&self) -> &HttpResponse {
        &self.response
    }

    /// Consumes the rejection, returning the response.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        self.response
    }

    /// OAuth2 `error` code from the JSON body.
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        self.response.error_code()
    }

    /// Value of the `WWW-Authenticate` response header.
    #[must_use]
    pub fn www_authenticate(&self) -> Option<&str> {
        self.response.header("www-authenticate")
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} responded with status {}", self.url, self.response.status)?;
        if let Some(code) = self.error_code() {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Rejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_error_code() {
        let rejection = Rejection::new(
            "https://api.test/oauth2/token",
            HttpResponse::new(400, r#"{"error":"invalid_grant"}"#),
        );
        assert_eq!(
            rejection.to_string(),
            "https://api.test/oauth2/token responded with status 400 (invalid_grant)"
        );
    }

    #[test]
    fn test_www_authenticate() {
        let rejection = Rejection::new(
            "https://api.test/me",
            HttpResponse::new(401, "").with_header("WWW-Authenticate", "Bearer realm=\"x\""),
        );
        assert_eq!(rejection.www_authenticate(), Some("Bearer realm=\"x\""));
        assert_eq!(rejection.error_code(), None);
    }
}
