use crate::core::provision::join_path;
use crate::domain::ports::FileStore;
use crate::utils::error::{ImportError, Result};
use std::path::PathBuf;

/// File store rooted at a local directory, laid out like the host's data folder.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_path: PathBuf,
}

impl LocalFileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut resolved = self.base_path.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." || segment == "." {
                return Err(ImportError::remote(
                    "resolve",
                    path,
                    "relative segments are not allowed",
                ));
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }
}

impl FileStore for LocalFileStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.resolve(path)?;
        tokio::fs::try_exists(&full_path)
            .await
            .map_err(|e| ImportError::remote("browse", path, e))
    }

    async fn create_directory(&self, parent: &str, segment: &str) -> Result<String> {
        let path = join_path(parent, segment);
        let full_path = self.resolve(&path)?;
        match tokio::fs::create_dir(&full_path).await {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(path),
            Err(e) => Err(ImportError::remote("create directory", path, e)),
        }
    }

    async fn upload(&self, directory: &str, file_name: &str, data: &[u8]) -> Result<String> {
        let path = join_path(directory, file_name);
        let full_path = self.resolve(&path)?;
        tokio::fs::write(&full_path, data)
            .await
            .map_err(|e| ImportError::remote("upload", &path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_directory_and_upload() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());

        assert!(!store.exists("worlds").await.unwrap());
        let created = store.create_directory("", "worlds").await.unwrap();
        assert_eq!(created, "worlds");
        assert!(store.exists("worlds").await.unwrap());

        let path = store.upload("worlds", "icon.png", b"png").await.unwrap();
        assert_eq!(path, "worlds/icon.png");
        let written = std::fs::read(temp_dir.path().join("worlds").join("icon.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_create_existing_directory_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());

        store.create_directory("", "worlds").await.unwrap();
        assert!(store.create_directory("", "worlds").await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());

        let err = store.upload("missing", "a.png", b"x").await.unwrap_err();
        assert!(matches!(err, ImportError::RemoteError { .. }));
    }

    #[tokio::test]
    async fn test_rejects_parent_segments() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());

        assert!(store.exists("../etc").await.is_err());
    }
}
