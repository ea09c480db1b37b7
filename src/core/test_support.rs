//! In-memory collaborators for unit tests.

use crate::core::provision::join_path;
use crate::domain::model::{DocumentPayload, DocumentRef, FolderRef, FolderSpec};
use crate::domain::ports::{Archive, ArchiveEntry, DocumentStore, FileStore};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const PADDED_ARMOR_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Armors>
  <Armor>
    <Key>PADDED</Key>
    <Name>Padded Armor</Name>
    <Defense>0</Defense>
    <Soak>1</Soak>
    <Price>5</Price>
    <Encumbrance>1</Encumbrance>
    <HP>0</HP>
    <Rarity>1</Rarity>
  </Armor>
</Armors>"#;

#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: Vec<ArchiveEntry>,
    contents: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.entries.push(ArchiveEntry {
            path: path.to_string(),
            is_directory: true,
        });
        self
    }

    pub fn with_file(mut self, path: &str, data: &[u8]) -> Self {
        self.entries.push(ArchiveEntry {
            path: path.to_string(),
            is_directory: false,
        });
        self.contents.insert(path.to_string(), data.to_vec());
        self
    }

    fn content(&self, path: &str) -> Result<Vec<u8>> {
        self.contents.get(path).cloned().ok_or_else(|| {
            ImportError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }
}

#[async_trait]
impl Archive for MemoryArchive {
    fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries.clone()
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.content(path)?).into_owned())
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        self.content(path)
    }
}

/// Archive holding `Data/Armor.xml` with the padded armor, optionally its artwork, and an
/// unrelated weapon image.
pub fn armor_archive(with_image: bool) -> MemoryArchive {
    let archive = MemoryArchive::new()
        .with_dir("Data/")
        .with_file("Data/Armor.xml", PADDED_ARMOR_XML.as_bytes())
        .with_dir("Data/EquipmentImages/")
        .with_dir("Data/EquipmentImages/Armor/")
        .with_file("Data/EquipmentImages/Weapon/WeaponBLASTER.png", b"weapon");
    if with_image {
        archive.with_file("Data/EquipmentImages/Armor/ArmorPADDED.png", b"\x89PNG")
    } else {
        archive
    }
}

#[derive(Debug, Default)]
struct FileState {
    directories: HashSet<String>,
    files: HashMap<String, Vec<u8>>,
    failing_uploads: HashSet<String>,
    created_directories: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    state: Arc<Mutex<FileState>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_uploads_of(&self, file_name: &str) {
        self.state
            .lock()
            .await
            .failing_uploads
            .insert(file_name.to_string());
    }

    pub async fn has_file(&self, path: &str) -> bool {
        self.state.lock().await.files.contains_key(path)
    }

    pub async fn has_directory(&self, path: &str) -> bool {
        self.state.lock().await.directories.contains(path)
    }

    pub async fn created_directories(&self) -> usize {
        self.state.lock().await.created_directories
    }
}

impl FileStore for MemoryFileStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state.directories.contains(path) || state.files.contains_key(path))
    }

    async fn create_directory(&self, parent: &str, segment: &str) -> Result<String> {
        let path = join_path(parent, segment);
        let mut state = self.state.lock().await;
        state.directories.insert(path.clone());
        state.created_directories += 1;
        Ok(path)
    }

    async fn upload(&self, directory: &str, file_name: &str, data: &[u8]) -> Result<String> {
        let mut state = self.state.lock().await;
        if state.failing_uploads.contains(file_name) {
            return Err(ImportError::remote("upload", file_name, "rejected by test store"));
        }
        if !state.directories.contains(directory) {
            return Err(ImportError::remote("upload", directory, "directory does not exist"));
        }
        let path = join_path(directory, file_name);
        state.files.insert(path.clone(), data.to_vec());
        Ok(path)
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    folders: Vec<FolderRef>,
    documents: Vec<(String, DocumentPayload)>,
    fail_writes: bool,
    next_id: usize,
}

impl DocumentState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{:04}", prefix, self.next_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<Mutex<DocumentState>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_writes(&self) {
        self.state.lock().await.fail_writes = true;
    }

    pub async fn folders(&self) -> Vec<FolderRef> {
        self.state.lock().await.folders.clone()
    }

    pub async fn documents(&self) -> Vec<(String, DocumentPayload)> {
        self.state.lock().await.documents.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_or_create_folder(&self, spec: &FolderSpec) -> Result<FolderRef> {
        let mut state = self.state.lock().await;
        if let Some(folder) = state
            .folders
            .iter()
            .find(|f| f.name == spec.name && f.kind == spec.kind)
        {
            return Ok(folder.clone());
        }
        let folder = FolderRef {
            id: state.next_id("folder"),
            name: spec.name.clone(),
            kind: spec.kind.clone(),
        };
        state.folders.push(folder.clone());
        Ok(folder)
    }

    async fn document_keys(
        &self,
        folder: &FolderRef,
        document_type: &str,
    ) -> Result<HashMap<String, String>> {
        let state = self.state.lock().await;
        Ok(state
            .documents
            .iter()
            .filter(|(_, doc)| doc.folder == folder.id && doc.document_type == document_type)
            .filter(|(_, doc)| !doc.key().is_empty())
            .map(|(id, doc)| (doc.key().to_string(), id.clone()))
            .collect())
    }

    async fn create_many(&self, payloads: Vec<DocumentPayload>) -> Result<Vec<DocumentRef>> {
        let mut state = self.state.lock().await;
        if state.fail_writes {
            return Err(ImportError::remote("create documents", "memory", "store is read-only"));
        }
        let mut created = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let id = state.next_id("doc");
            created.push(DocumentRef {
                id: id.clone(),
                name: payload.name.clone(),
            });
            state.documents.push((id, payload));
        }
        Ok(created)
    }

    async fn update_many(
        &self,
        updates: Vec<(String, DocumentPayload)>,
    ) -> Result<Vec<DocumentRef>> {
        let mut state = self.state.lock().await;
        if state.fail_writes {
            return Err(ImportError::remote("update documents", "memory", "store is read-only"));
        }
        let mut updated = Vec::with_capacity(updates.len());
        for (id, payload) in updates {
            if let Some(slot) = state.documents.iter_mut().find(|(doc_id, _)| *doc_id == id) {
                updated.push(DocumentRef {
                    id: id.clone(),
                    name: payload.name.clone(),
                });
                slot.1 = payload;
            }
        }
        Ok(updated)
    }
}
