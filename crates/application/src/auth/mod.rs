//! Authentication module for the Warden OAuth2 client.
//!
//! This module provides:
//! - The shared configuration context and the token accessor
//! - The event bus for authentication failures
//! - The interceptor and the pipeline it is installed on
//! - The OAuth2 client issuing grant, refresh and revoke calls

mod client;
mod context;
mod events;
mod interceptor;
mod pipeline;
mod token_store;

pub use client::{OAuthClient, RequestOptions};
pub use context::OAuthContext;
pub use events::AuthEvents;
pub use interceptor::{OAuthInterceptor, RejectionAction, classify};
pub use pipeline::InterceptedClient;
pub use token_store::TokenStore;
