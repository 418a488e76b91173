//! Settings file loader.
//!
//! Settings live in the platform config directory unless a path is given:
//! - Linux: ~/.config/warden/settings.yaml
//! - macOS: ~/Library/Application Support/warden/settings.yaml
//!
//! ```yaml
//! env: dev
//! headerStyle: concatenated
//! servers:
//!   dev:
//!     baseUrl: https://auth.dev.example.com/
//!     clientId: web
//!   prod:
//!     baseUrl: https://auth.example.com
//!     clientId: web
//!     clientSecret: s3cret
//! ```
//!
//! JSON files with the same shape are accepted when the extension is `.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use warden_application::ports::{FileSystem, FileSystemError};
use warden_domain::{ConfigError, Environment, HeaderStyle, OAuthSettings, ServerParams};

use crate::persistence::TokioFileSystem;

/// Overrides the active environment.
pub const ENV_ACTIVE: &str = "WARDEN_ENV";
/// Overrides the active environment's base URL.
pub const ENV_BASE_URL: &str = "WARDEN_BASE_URL";
/// Overrides the active environment's client id.
pub const ENV_CLIENT_ID: &str = "WARDEN_CLIENT_ID";
/// Overrides the active environment's client secret.
pub const ENV_CLIENT_SECRET: &str = "WARDEN_CLIENT_SECRET";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// YAML parse error.
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse error.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported settings format: {0}")]
    UnsupportedFormat(PathBuf),

    /// An environment override could not be applied.
    #[error("invalid value for {name}: {source}")]
    InvalidOverride {
        /// Variable name
        name: &'static str,
        /// Underlying error
        source: ConfigError,
    },

    /// An environment's server settings are incomplete.
    #[error("{environment} server: {source}")]
    Server {
        /// Environment being configured
        environment: Environment,
        /// Underlying error
        source: ConfigError,
    },
}

/// Contents of a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsFile {
    /// Active environment
    #[serde(default)]
    pub env: Option<Environment>,
    /// How the `Authorization` header is assembled
    #[serde(default)]
    pub header_style: Option<HeaderStyle>,
    /// Name of the token slot
    #[serde(default)]
    pub token_namespace: Option<String>,
    /// Server parameters per environment
    #[serde(default)]
    pub servers: BTreeMap<Environment, ServerParams>,
}

impl SettingsFile {
    /// Default settings path in the platform config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("warden").join("settings.yaml"))
    }

    /// Loads a settings file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::load_with(&TokioFileSystem::new(), path).await
    }

    /// Loads the file at `path`, or empty settings if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub async fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        match Self::load(path).await {
            Err(SettingsError::FileSystem(FileSystemError::NotFound(_))) => {
                tracing::debug!(path = %path.display(), "no settings file");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Loads a settings file through `fs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_with<F: FileSystem>(fs: &F, path: &Path) -> Result<Self, SettingsError> {
        let content = fs.read_file_string(path).await?;
        let settings = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&content)?,
            Some("json") => Self::from_json(&content)?,
            _ => return Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!(path = %path.display(), servers = settings.servers.len(), "loaded settings file");
        Ok(settings)
    }

    /// Parses YAML settings.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or unknown keys.
    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        // An empty document means no settings.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parses JSON settings.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or unknown keys.
    pub fn from_json(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies `WARDEN_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// See [`with_overrides`](Self::with_overrides).
    pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// `WARDEN_ENV` selects the environment first; the server overrides then
    /// apply to that environment. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidOverride`] for an unknown environment
    /// name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(env) = value(ENV_ACTIVE) {
            let env = env
                .parse::<Environment>()
                .map_err(|source| SettingsError::InvalidOverride {
                    name: ENV_ACTIVE,
                    source,
                })?;
            self.env = Some(env);
        }

        let env = self.env.unwrap_or_default();
        let mut params = self.servers.remove(&env).unwrap_or_default();
        if let Some(base_url) = value(ENV_BASE_URL) {
            params = params.base_url(base_url);
        }
        if let Some(client_id) = value(ENV_CLIENT_ID) {
            params = params.client_id(client_id);
        }
        if let Some(client_secret) = value(ENV_CLIENT_SECRET) {
            params = params.client_secret(client_secret);
        }
        if params != ServerParams::default() {
            self.servers.insert(env, params);
        }
        Ok(self)
    }

    /// Builds validated settings, configuring every listed environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Server`] for the first environment whose
    /// parameters do not validate.
    pub fn into_settings(self) -> Result<OAuthSettings, SettingsError> {
        let mut settings = OAuthSettings::new();
        for (environment, params) in self.servers {
            settings
                .configure(environment, params)
                .map_err(|source| SettingsError::Server {
                    environment,
                    source,
                })?;
        }
        settings.set_active(self.env.unwrap_or_default());
        Ok(settings)
    }
}
