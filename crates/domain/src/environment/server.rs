//! Per-environment server settings, merge and validation

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Default token endpoint path.
pub const DEFAULT_GRANT_PATH: &str = "/oauth2/token";

/// Default revocation endpoint path.
pub const DEFAULT_REVOKE_PATH: &str = "/oauth2/revoke";

/// Parameters accepted by `configure`.
///
/// Every key is optional; only provided keys overwrite the current settings.
/// Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerParams {
    /// Authorization server base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// OAuth2 client identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Client secret. `Some(None)` resets to a public client.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret: Option<Option<String>>,
    /// Token endpoint path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_path: Option<String>,
    /// Revocation endpoint path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoke_path: Option<String>,
}

/// Distinguishes `"key": null` from an omitted key.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ServerParams {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    /// Sets the client id.
    #[must_use]
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    /// Sets the client secret.
    #[must_use]
    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secret = Some(Some(value.into()));
        self
    }

    /// Marks the client as public (no secret).
    #[must_use]
    pub fn public_client(mut self) -> Self {
        self.client_secret = Some(None);
        self
    }

    /// Sets the token endpoint path.
    #[must_use]
    pub fn grant_path(mut self, value: impl Into<String>) -> Self {
        self.grant_path = Some(value.into());
        self
    }

    /// Sets the revocation endpoint path.
    #[must_use]
    pub fn revoke_path(mut self, value: impl Into<String>) -> Self {
        self.revoke_path = Some(value.into());
        self
    }

    /// Reads parameters from an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] if the value is not a JSON object
    /// and [`ConfigError::InvalidParams`] for unknown keys or non-string values.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::NotAnObject(json_kind(value).to_string()));
        }
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidParams(e.to_string()))
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Raw settings of one environment, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// Authorization server base URL
    pub base_url: Option<String>,
    /// OAuth2 client identifier
    pub client_id: Option<String>,
    /// Client secret, absent for public clients
    pub client_secret: Option<String>,
    /// Token endpoint path
    pub grant_path: Option<String>,
    /// Revocation endpoint path
    pub revoke_path: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            client_id: None,
            client_secret: None,
            grant_path: Some(DEFAULT_GRANT_PATH.to_string()),
            revoke_path: Some(DEFAULT_REVOKE_PATH.to_string()),
        }
    }
}

impl ServerSettings {
    /// Overwrites the provided keys.
    pub fn merge(&mut self, params: ServerParams) {
        if let Some(base_url) = params.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(client_id) = params.client_id {
            self.client_id = Some(client_id);
        }
        if let Some(client_secret) = params.client_secret {
            self.client_secret = client_secret;
        }
        if let Some(grant_path) = params.grant_path {
            self.grant_path = Some(grant_path);
        }
        if let Some(revoke_path) = params.revoke_path {
            self.revoke_path = Some(revoke_path);
        }
    }

    /// Checks required keys and returns the normalized configuration.
    ///
    /// Required keys are checked in the order `baseUrl`, `clientId`,
    /// `grantPath`, `revokePath`; the first missing one is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] naming the first empty key.
    pub fn validate(&self) -> Result<ServerConfig, ConfigError> {
        let base_url = required(self.base_url.as_deref(), "baseUrl")?;
        let client_id = required(self.client_id.as_deref(), "clientId")?;
        let grant_path = required(self.grant_path.as_deref(), "grantPath")?;
        let revoke_path = required(self.revoke_path.as_deref(), "revokePath")?;

        Ok(ServerConfig {
            base_url: strip_trailing_slash(base_url),
            client_id: client_id.to_string(),
            client_secret: self.client_secret.clone(),
            grant_path: with_leading_slash(grant_path),
            revoke_path: with_leading_slash(revoke_path),
        })
    }
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingParameter(key))
}

fn strip_trailing_slash(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Validated, normalized server configuration.
///
/// `base_url` has had one trailing slash removed; both paths start with one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    base_url: String,
    client_id: String,
    client_secret: Option<String>,
    grant_path: String,
    revoke_path: String,
}

impl ServerConfig {
    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret, `None` for public clients.
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Token endpoint path.
    #[must_use]
    pub fn grant_path(&self) -> &str {
        &self.grant_path
    }

    /// Revocation endpoint path.
    #[must_use]
    pub fn revoke_path(&self) -> &str {
        &self.revoke_path
    }

    /// Full token endpoint URL.
    #[must_use]
    pub fn grant_url(&self) -> String {
        format!("{}{}", self.base_url, self.grant_path)
    }

    /// Full revocation endpoint URL.
    #[must_use]
    pub fn revoke_url(&self) -> String {
        format!("{}{}", self.base_url, self.revoke_path)
    }

    /// Returns true if `url` targets this server (plain string prefix match).
    #[must_use]
    pub fn covers(&self, url: &str) -> bool {
        url.starts_with(&self.base_url)
    }
}
