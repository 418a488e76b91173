//! Settings for all environments plus the active selector

use std::collections::BTreeMap;

use super::{Environment, ServerConfig, ServerParams, ServerSettings};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ServerEntry {
    settings: ServerSettings,
    config: Option<ServerConfig>,
}

/// Authorization server settings for every environment.
///
/// A failed `configure` leaves the environment exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    active: Environment,
    servers: BTreeMap<Environment, ServerEntry>,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthSettings {
    /// Creates settings with defaults for every environment and `dev` active.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Environment::default(),
            servers: Environment::all()
                .iter()
                .map(|env| (*env, ServerEntry::default()))
                .collect(),
        }
    }

    /// Merges `params` into the environment's settings and validates them.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required key is empty after the merge.
    pub fn configure(
        &mut self,
        environment: Environment,
        params: ServerParams,
    ) -> Result<&ServerConfig, ConfigError> {
        let entry = self.servers.entry(environment).or_default();

        let mut merged = entry.settings.clone();
        merged.merge(params);
        let config = merged.validate()?;

        // Store the normalized values so later merges start from them.
        merged.base_url = Some(config.base_url().to_string());
        merged.grant_path = Some(config.grant_path().to_string());
        merged.revoke_path = Some(config.revoke_path().to_string());

        entry.settings = merged;
        Ok(entry.config.insert(config))
    }

    /// Same as [`configure`](Self::configure) for an untyped JSON argument.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] if `params` is not a JSON object,
    /// plus every error [`configure`](Self::configure) can return.
    pub fn configure_value(
        &mut self,
        environment: Environment,
        params: &serde_json::Value,
    ) -> Result<&ServerConfig, ConfigError> {
        let params = ServerParams::from_value(params)?;
        self.configure(environment, params)
    }

    /// Configures the `dev` environment.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn configure_dev(&mut self, params: ServerParams) -> Result<&ServerConfig, ConfigError> {
        self.configure(Environment::Dev, params)
    }

    /// Configures the `prod` environment.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn configure_prod(&mut self, params: ServerParams) -> Result<&ServerConfig, ConfigError> {
        self.configure(Environment::Prod, params)
    }

    /// Selects the active environment.
    pub const fn set_active(&mut self, environment: Environment) {
        self.active = environment;
    }

    /// Returns the active environment.
    #[must_use]
    pub const fn active(&self) -> Environment {
        self.active
    }

    /// Raw settings of an environment.
    #[must_use]
    pub fn settings(&self, environment: Environment) -> Option<&ServerSettings> {
        self.servers.get(&environment).map(|entry| &entry.settings)
    }

    /// Validated configuration of an environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] if the environment was never
    /// configured successfully.
    pub fn server(&self, environment: Environment) -> Result<&ServerConfig, ConfigError> {
        self.servers
            .get(&environment)
            .and_then(|entry| entry.config.as_ref())
            .ok_or_else(|| ConfigError::NotConfigured(environment.to_string()))
    }

    /// Validated configuration of the active environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] if the active environment was
    /// never configured successfully.
    pub fn active_server(&self) -> Result<&ServerConfig, ConfigError> {
        self.server(self.active)
    }
}
