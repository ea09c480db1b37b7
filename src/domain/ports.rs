use crate::domain::model::{DocumentPayload, DocumentRef, FolderRef, FolderSpec};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Raw descriptor of one archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub is_directory: bool,
}

/// Read-only handle over a loaded data archive.
#[async_trait]
pub trait Archive: Send + Sync {
    fn entries(&self) -> Vec<ArchiveEntry>;
    async fn read_text(&self, path: &str) -> Result<String>;
    async fn read_binary(&self, path: &str) -> Result<Vec<u8>>;
}

/// Host storage for uploaded assets. Paths are `/`-separated and relative to the storage root.
pub trait FileStore: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn create_directory(
        &self,
        parent: &str,
        segment: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
    /// Stores `data` as `{directory}/{file_name}` and returns the stored path.
    fn upload(
        &self,
        directory: &str,
        file_name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Host document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_or_create_folder(&self, spec: &FolderSpec) -> Result<FolderRef>;
    /// Existing documents of `document_type` in `folder`, by domain key → document id.
    async fn document_keys(
        &self,
        folder: &FolderRef,
        document_type: &str,
    ) -> Result<HashMap<String, String>>;
    async fn create_many(&self, payloads: Vec<DocumentPayload>) -> Result<Vec<DocumentRef>>;
    async fn update_many(&self, updates: Vec<(String, DocumentPayload)>)
        -> Result<Vec<DocumentRef>>;
}
