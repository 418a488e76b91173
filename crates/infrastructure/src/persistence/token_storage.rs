//! Token slot adapters.
//!
//! The file slot keeps one record per namespace:
//! ```text
//! <data dir>/warden/
//!   auth_token.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_application::ports::{FileSystem, FileSystemError, StorageError, TokenStorage};
use warden_domain::TokenRecord;

use super::TokioFileSystem;
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "auth_token";

/// Token slot persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage<F = TokioFileSystem> {
    fs: F,
    path: PathBuf,
}

impl FileTokenStorage<TokioFileSystem> {
    /// Slot named `namespace` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, namespace: &str) -> Self {
        Self::with_fs(TokioFileSystem::new(), dir, namespace)
    }

    /// Slot named `namespace` in the platform data directory
    /// (`~/.local/share/warden` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the platform has no data
    /// directory.
    pub fn default_location(namespace: &str) -> Result<Self, StorageError> {
        let dir = Self::default_dir().ok_or_else(|| {
            StorageError::Unavailable("could not determine data directory".to_string())
        })?;
        Ok(Self::in_dir(dir, namespace))
    }

    /// Platform data directory for Warden.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("warden"))
    }
}

impl<F: FileSystem> FileTokenStorage<F> {
    /// Slot backed by a custom file system.
    pub fn with_fs(fs: F, dir: impl AsRef<Path>, namespace: &str) -> Self {
        let path = dir
            .as_ref()
            .join(format!("{}.json", file_stem(namespace)));
        Self { fs, path }
    }

    /// Location of the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<F: FileSystem> TokenStorage for FileTokenStorage<F> {
    async fn load(&self) -> Result<Option<TokenRecord>, StorageError> {
        let bytes = match self.fs.read_file(&self.path).await {
            Ok(bytes) => bytes,
            Err(FileSystemError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // An undecodable record reads as empty; the next save overwrites it.
        match from_json_bytes(&bytes) {
            Ok(token) => {
                tracing::debug!(path = %self.path.display(), "loaded token slot");
                Ok(Some(token))
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable token slot"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &TokenRecord) -> Result<(), StorageError> {
        let bytes =
            to_json_stable_bytes(token).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.fs.write_file(&self.path, &bytes).await?;
        tracing::debug!(path = %self.path.display(), "wrote token slot");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match self.fs.remove_file(&self.path).await {
            Ok(()) | Err(FileSystemError::NotFound(_)) => {
                tracing::debug!(path = %self.path.display(), "cleared token slot");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps a namespace usable as a file name.
fn file_stem(namespace: &str) -> String {
    let stem: String = namespace
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        DEFAULT_NAMESPACE.to_string()
    } else {
        stem
    }
}

/// Process-local token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: RwLock<Option<TokenRecord>>,
}

impl MemoryTokenStorage {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot holding `token`.
    #[must_use]
    pub fn with_token(token: TokenRecord) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<TokenRecord>, StorageError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, token: &TokenRecord) -> Result<(), StorageError> {
        *self.slot.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;
    use warden_application::TokenStore;

    fn token() -> TokenRecord {
        let mut token = TokenRecord::new("a1", "bearer").with_refresh_token("r1");
        token.extra.insert("expires_in".to_string(), 3600.into());
        token
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("auth_token"), "auth_token");
        assert_eq!(file_stem("../etc/passwd"), "___etc_passwd");
        assert_eq!(file_stem("  "), DEFAULT_NAMESPACE);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_slot() {
        let dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::in_dir(dir.path(), DEFAULT_NAMESPACE);

        assert_eq!(storage.load().await.unwrap(), None);
        assert!(storage.path().ends_with("auth_token.json"));
    }

    #[tokio::test]
    async fn test_record_survives_new_handle() {
        let dir = TempDir::new().unwrap();
        FileTokenStorage::in_dir(dir.path(), "session")
            .save(&token())
            .await
            .unwrap();

        let reopened = FileTokenStorage::in_dir(dir.path(), "session");

        assert_eq!(reopened.load().await.unwrap(), Some(token()));
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let dir = TempDir::new().unwrap();
        let first = FileTokenStorage::in_dir(dir.path(), "first");
        let second = FileTokenStorage::in_dir(dir.path(), "second");

        first.save(&token()).await.unwrap();

        assert_eq!(second.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_removes_file_and_tolerates_empty_slot() {
        let dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::in_dir(dir.path(), DEFAULT_NAMESPACE);
        storage.save(&token()).await.unwrap();

        storage.clear().await.unwrap();
        storage.clear().await.unwrap();

        assert!(!storage.path().exists());
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_undecodable_file_is_empty_slot() {
        let dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::in_dir(dir.path(), DEFAULT_NAMESPACE);
        std::fs::write(storage.path(), "{ truncated").unwrap();

        assert_eq!(storage.load().await.unwrap(), None);

        storage.save(&token()).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(token()));
    }

    #[tokio::test]
    async fn test_undecodable_file_can_be_cleared() {
        let dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::in_dir(dir.path(), DEFAULT_NAMESPACE);
        std::fs::write(storage.path(), "[1, 2]").unwrap();

        let store = TokenStore::open(Arc::new(storage.clone())).await.unwrap();
        assert!(!store.is_authenticated().await);

        store.remove_token().await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_memory_slot() {
        let storage = MemoryTokenStorage::new();
        assert_eq!(storage.load().await.unwrap(), None);

        storage.save(&token()).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(token()));

        storage.clear().await.unwrap();
        assert_eq!(storage.load().await.unwrap(), None);
    }
}
