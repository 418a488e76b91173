//! Real file system implementation.

use std::path::Path;

use tokio::fs;
use warden_application::ports::{FileSystem, FileSystemError};

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn read_file_string(&self, path: &Path) -> Result<String, FileSystemError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // Write next to the target, then swap it in.
        let staging = path.with_extension("tmp");
        fs::write(&staging, contents)
            .await
            .map_err(|e| FileSystemError::from_io(e, &staging))?;
        fs::rename(&staging, path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::remove_file(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("slot.json");
        let fs = TokioFileSystem::new();

        fs.write_file(&path, b"one").await.unwrap();
        fs.write_file(&path, b"two").await.unwrap();

        assert_eq!(fs.read_file_string(&path).await.unwrap(), "two");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        let fs = TokioFileSystem::new();

        assert!(matches!(
            fs.read_file(&path).await,
            Err(FileSystemError::NotFound(p)) if p == path
        ));
        assert!(matches!(
            fs.remove_file(&path).await,
            Err(FileSystemError::NotFound(_))
        ));
    }
}
