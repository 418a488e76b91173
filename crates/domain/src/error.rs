//! Domain error types

use thiserror::Error;

/// Errors raised while configuring authorization server settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration argument is not a key-value object.
    #[error("invalid argument: config must be an object, got {0}")]
    NotAnObject(String),

    /// The configuration object could not be read as server parameters.
    #[error("invalid server parameters: {0}")]
    InvalidParams(String),

    /// A required parameter is missing or empty after merging.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// The environment name is not one of the known environments.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// The environment has never been successfully configured.
    #[error("environment `{0}` is not configured")]
    NotConfigured(String),
}

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Server configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
