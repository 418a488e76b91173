//! Warden Domain - Core types
//!
//! This crate defines the domain model of the Warden OAuth2 client:
//! environment-scoped server settings, the token record, and the HTTP
//! exchange types seen by interceptors.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod environment;
pub mod error;
pub mod request;
pub mod response;

pub use auth::{HeaderStyle, OAUTH_ERROR_EVENT, OAuthEvent, TokenRecord};
pub use environment::{Environment, OAuthSettings, ServerConfig, ServerParams, ServerSettings};
pub use error::{ConfigError, DomainError, DomainResult};
pub use request::{FormData, Header, Headers, HttpMethod, HttpRequest};
pub use response::{HttpResponse, Rejection};
