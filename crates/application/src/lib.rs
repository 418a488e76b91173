//! Warden Application - OAuth2 flows and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP transport and the token slot
//! - The token accessor, interceptor and OAuth2 client
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use auth::{
    AuthEvents, InterceptedClient, OAuthClient, OAuthContext, OAuthInterceptor, RejectionAction,
    RequestOptions, TokenStore, classify,
};
pub use error::{OAuthError, OAuthResult, TransportError};
pub use ports::{
    FileSystem, FileSystemError, HttpClient, HttpClientError, StorageError, TokenStorage,
};
