//! Token record and authorization header formatting

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How the `Authorization` header value is assembled from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Capitalized token type immediately followed by the access token
    /// (`bearer` + `abc` gives `Bearerabc`). Matches the long-standing
    /// behaviour of existing deployments.
    #[default]
    Concatenated,
    /// Capitalized token type, one space, access token (`Bearer abc`).
    Spaced,
}

/// Token record returned by the authorization server.
///
/// The record is replaced wholesale on every grant or refresh response.
/// Server-specific fields (`expires_in`, `scope`, ...) are kept in `extra`
/// and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Refresh token, if the server issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type, usually `bearer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Any other fields sent by the server
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl TokenRecord {
    /// Creates a record with an access token and token type.
    #[must_use]
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            token_type: Some(token_type.into()),
            ..Self::default()
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Parses a token endpoint response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON object.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Access token, `None` when absent or empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        non_empty(self.access_token.as_deref())
    }

    /// Refresh token, `None` when absent or empty.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        non_empty(self.refresh_token.as_deref())
    }

    /// Token type, `None` when absent or empty.
    #[must_use]
    pub fn token_type(&self) -> Option<&str> {
        non_empty(self.token_type.as_deref())
    }

    /// Builds the `Authorization` header value.
    ///
    /// Returns `None` unless both the token type and the access token are
    /// present.
    #[must_use]
    pub fn authorization_header(&self, style: HeaderStyle) -> Option<String> {
        let token_type = capitalize(self.token_type()?);
        let access_token = self.access_token()?;

        Some(match style {
            HeaderStyle::Concatenated => format!("{token_type}{access_token}"),
            HeaderStyle::Spaced => format!("{token_type} {access_token}"),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Upper-cases the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Short, log-safe preview of a token value.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_authorization_header_concatenates_without_space() {
        let token = TokenRecord::new("abc", "bearer");
        assert_eq!(
            token.authorization_header(HeaderStyle::Concatenated),
            Some("Bearerabc".to_string())
        );
    }

    #[test]
    fn test_authorization_header_spaced_style() {
        let token = TokenRecord::new("abc", "bearer");
        assert_eq!(
            token.authorization_header(HeaderStyle::Spaced),
            Some("Bearer abc".to_string())
        );
    }

    #[test]
    fn test_authorization_header_requires_both_fields() {
        let mut token = TokenRecord::new("abc", "bearer");
        token.token_type = None;
        assert_eq!(token.authorization_header(HeaderStyle::default()), None);

        let mut token = TokenRecord::new("", "bearer");
        assert_eq!(token.authorization_header(HeaderStyle::default()), None);
        token.access_token = None;
        assert_eq!(token.authorization_header(HeaderStyle::default()), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("bearer"), "Bearer");
        assert_eq!(capitalize("Bearer "), "Bearer ");
        assert_eq!(capitalize("mAC"), "MAC");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let body = r#"{"access_token":"a1","token_type":"bearer","expires_in":3600,"scope":"read"}"#;
        let token = TokenRecord::from_json(body).unwrap();

        assert_eq!(token.access_token(), Some("a1"));
        assert_eq!(token.refresh_token(), None);
        assert_eq!(token.extra.get("expires_in"), Some(&serde_json::json!(3600)));

        let written = serde_json::to_value(&token).unwrap();
        assert_eq!(written["scope"], "read");
        assert!(written.get("refresh_token").is_none());
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(TokenRecord::from_json("\"token\"").is_err());
        assert!(TokenRecord::from_json("not json").is_err());
    }

    #[test]
    fn test_token_preview_hides_short_tokens() {
        assert_eq!(token_preview("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(token_preview("short"), "***");
    }
}
