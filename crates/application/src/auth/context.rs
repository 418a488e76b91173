//! Shared configuration context.

use std::sync::Arc;

use tokio::sync::RwLock;
use warden_domain::{ConfigError, Environment, OAuthSettings, ServerConfig, ServerParams};

/// Handle to the authorization server settings and the active environment.
///
/// Cloning the handle shares the settings; switching the environment through
/// one clone is seen by all of them.
#[derive(Debug, Clone, Default)]
pub struct OAuthContext {
    settings: Arc<RwLock<OAuthSettings>>,
}

impl OAuthContext {
    /// Wraps settings prepared by the composition root.
    #[must_use]
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Merges `params` into an environment's settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if validation fails; settings are unchanged.
    pub async fn configure(
        &self,
        environment: Environment,
        params: ServerParams,
    ) -> Result<ServerConfig, ConfigError> {
        let mut settings = self.settings.write().await;
        settings.configure(environment, params).cloned()
    }

    /// Selects the active environment.
    pub async fn set_active_environment(&self, environment: Environment) {
        self.settings.write().await.set_active(environment);
        tracing::debug!(%environment, "switched active environment");
    }

    /// The active environment.
    pub async fn active_environment(&self) -> Environment {
        self.settings.read().await.active()
    }

    /// Validated configuration of the active environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] if the active environment has
    /// no valid configuration.
    pub async fn active_server(&self) -> Result<ServerConfig, ConfigError> {
        self.settings.read().await.active_server().cloned()
    }

    /// Copy of the current settings.
    pub async fn snapshot(&self) -> OAuthSettings {
        self.settings.read().await.clone()
    }
}
