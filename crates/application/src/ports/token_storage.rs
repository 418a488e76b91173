//! Token storage port
//!
//! A single namespaced slot holding the current token record.

use async_trait::async_trait;
use warden_domain::TokenRecord;

use super::FileSystemError;

/// Errors that can occur while reading or writing the token slot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing store cannot be used (e.g. no data directory).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistent key-value slot for the token record.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Loads the stored record, `None` if the slot is empty.
    async fn load(&self) -> Result<Option<TokenRecord>, StorageError>;

    /// Replaces the stored record.
    async fn save(&self, token: &TokenRecord) -> Result<(), StorageError>;

    /// Empties the slot. Clearing an empty slot succeeds.
    async fn clear(&self) -> Result<(), StorageError>;
}
