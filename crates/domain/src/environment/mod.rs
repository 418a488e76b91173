//! Environment-scoped authorization server settings
//!
//! Each named environment carries its own server settings. Exactly one
//! environment is active at a time and selects the server used for grants
//! and for header injection.

mod server;
mod settings;

pub use server::{ServerConfig, ServerParams, ServerSettings};
pub use settings::OAuthSettings;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Known deployment environments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development server
    #[default]
    Dev,
    /// Production server
    Prod,
}

impl Environment {
    /// Returns all known environments.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Dev, Self::Prod]
    }

    /// Returns the environment name as used in settings files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}
