//! Authentication domain types

mod event;
mod types;

pub use event::{OAUTH_ERROR_EVENT, OAuthEvent};
pub use types::{HeaderStyle, TokenRecord, capitalize, token_preview};
