use crate::domain::ports::{Archive, ArchiveEntry};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Mutex;
use zip::ZipArchive;

/// Zip data archive loaded fully into memory.
pub struct ZipArchiveSource {
    archive: Mutex<ZipArchive<Cursor<Vec<u8>>>>,
    entries: Vec<ArchiveEntry>,
}

impl ZipArchiveSource {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive =
            ZipArchive::new(Cursor::new(data)).map_err(|e| ImportError::MalformedArchive {
                message: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| ImportError::MalformedArchive {
                    message: format!("entry #{}: {}", i, e),
                })?;
            entries.push(ArchiveEntry {
                path: file.name().to_string(),
                is_directory: file.is_dir(),
            });
        }

        tracing::debug!("Loaded zip archive with {} entries", entries.len());
        Ok(Self {
            archive: Mutex::new(archive),
            entries,
        })
    }

    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("📦 Opening data archive {}", path.display());
        let data = tokio::fs::read(path).await?;
        Self::from_bytes(data)
    }

    fn read_entry(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.lock().map_err(|_| ImportError::MalformedArchive {
            message: "archive handle poisoned by an earlier panic".to_string(),
        })?;
        let mut file = archive.by_name(path)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

#[async_trait]
impl Archive for ZipArchiveSource {
    fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries.clone()
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let data = self.read_entry(path)?;
        String::from_utf8(data).map_err(|e| ImportError::MarkupError {
            message: format!("{} is not valid UTF-8: {}", path, e),
        })
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        self.read_entry(path)
    }
}
