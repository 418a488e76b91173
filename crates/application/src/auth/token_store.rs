//! Token accessor over the persistent token slot.
//!
//! Reads are served from an in-memory copy loaded once from storage.
//! Writes go to storage first and only then replace the in-memory copy, so a
//! failed write never leaves the two out of step.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use warden_domain::{HeaderStyle, TokenRecord};

use crate::ports::{StorageError, TokenStorage};

/// Shared handle to the current token record.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn TokenStorage>,
    token: Arc<RwLock<Option<TokenRecord>>>,
    header_style: HeaderStyle,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("header_style", &self.header_style)
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Opens the store, loading whatever record the slot holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub async fn open(storage: Arc<dyn TokenStorage>) -> Result<Self, StorageError> {
        let token = storage.load().await?;
        Ok(Self {
            storage,
            token: Arc::new(RwLock::new(token)),
            header_style: HeaderStyle::default(),
        })
    }

    /// Sets how [`authorization_header`](Self::authorization_header) joins
    /// the token type and the access token.
    #[must_use]
    pub const fn with_header_style(mut self, header_style: HeaderStyle) -> Self {
        self.header_style = header_style;
        self
    }

    /// Header style in use.
    #[must_use]
    pub const fn header_style(&self) -> HeaderStyle {
        self.header_style
    }

    /// Replaces the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted; the previous record
    /// stays in place.
    pub async fn set_token(&self, token: TokenRecord) -> Result<(), StorageError> {
        let mut current = self.token.write().await;
        self.storage.save(&token).await?;
        *current = Some(token);
        Ok(())
    }

    /// The stored record.
    pub async fn token(&self) -> Option<TokenRecord> {
        self.token.read().await.clone()
    }

    /// True if a record is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Access token of the stored record.
    pub async fn access_token(&self) -> Option<String> {
        self.project(TokenRecord::access_token).await
    }

    /// Refresh token of the stored record.
    pub async fn refresh_token(&self) -> Option<String> {
        self.project(TokenRecord::refresh_token).await
    }

    /// Token type of the stored record.
    pub async fn token_type(&self) -> Option<String> {
        self.project(TokenRecord::token_type).await
    }

    /// `Authorization` header value for the stored record.
    pub async fn authorization_header(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()?
            .authorization_header(self.header_style)
    }

    /// Clears the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be cleared; the record stays in
    /// place.
    pub async fn remove_token(&self) -> Result<(), StorageError> {
        let mut current = self.token.write().await;
        self.storage.clear().await?;
        *current = None;
        Ok(())
    }

    async fn project(&self, field: fn(&TokenRecord) -> Option<&str>) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .and_then(field)
            .map(ToString::to_string)
    }
}
