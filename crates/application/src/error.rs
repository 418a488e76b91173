//! Application error types

use thiserror::Error;
use warden_domain::{ConfigError, Rejection};

use crate::ports::{HttpClientError, StorageError};

/// Failure of a request sent through the intercepted pipeline.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was received.
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// A response was received with a non-2xx status.
    #[error("request rejected: {0}")]
    Rejected(Rejection),
}

impl TransportError {
    /// The rejected response, if the server answered.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Http(_) => None,
        }
    }
}

/// Errors returned by OAuth client operations.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The active environment is not usable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP exchange failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The token slot could not be updated.
    #[error("token storage error: {0}")]
    Storage(#[from] StorageError),

    /// A 2xx token response did not contain a JSON object.
    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),
}

impl OAuthError {
    /// The rejected response, if the failure was a non-2xx answer.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Transport(error) => error.rejection(),
            _ => None,
        }
    }
}

/// Result type alias for OAuth client operations.
pub type OAuthResult<T> = Result<T, OAuthError>;
