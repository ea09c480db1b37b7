use crate::domain::model::{DocumentPayload, DocumentRef, FolderRef, FolderSpec};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    #[serde(flatten)]
    pub payload: DocumentPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DocumentDatabase {
    #[serde(default)]
    folders: Vec<FolderRef>,
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

/// Document store kept in memory and, when opened from a file, written back as pretty JSON
/// after every change.
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    path: Option<PathBuf>,
    database: Arc<Mutex<DocumentDatabase>>,
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl JsonDocumentStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            database: Arc::new(Mutex::new(DocumentDatabase::default())),
        }
    }

    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let database = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            let database: DocumentDatabase = serde_json::from_str(&content)?;
            tracing::debug!(
                "Loaded {} folders and {} documents from {}",
                database.folders.len(),
                database.documents.len(),
                path.display()
            );
            database
        } else {
            DocumentDatabase::default()
        };

        Ok(Self {
            path: Some(path),
            database: Arc::new(Mutex::new(database)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn folders(&self) -> Vec<FolderRef> {
        self.database.lock().await.folders.clone()
    }

    pub async fn documents(&self) -> Vec<StoredDocument> {
        self.database.lock().await.documents.clone()
    }

    async fn flush(&self, database: &DocumentDatabase) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_error =
            |e: std::io::Error| ImportError::remote("write documents", path.display().to_string(), e);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        let content = serde_json::to_string_pretty(database)?;
        tokio::fs::write(path, content).await.map_err(write_error)
    }

    /// Writes `staged` and only then makes it the current state, so a failed write leaves
    /// nothing behind for a later flush to pick up.
    async fn commit(&self, current: &mut DocumentDatabase, staged: DocumentDatabase) -> Result<()> {
        self.flush(&staged).await?;
        *current = staged;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn get_or_create_folder(&self, spec: &FolderSpec) -> Result<FolderRef> {
        let mut database = self.database.lock().await;
        if let Some(folder) = database
            .folders
            .iter()
            .find(|f| f.name == spec.name && f.kind == spec.kind)
        {
            return Ok(folder.clone());
        }

        let folder = FolderRef {
            id: new_id(),
            name: spec.name.clone(),
            kind: spec.kind.clone(),
        };
        tracing::info!("📁 Creating folder '{}'", folder.name);
        let mut staged = database.clone();
        staged.folders.push(folder.clone());
        self.commit(&mut database, staged).await?;
        Ok(folder)
    }

    async fn document_keys(
        &self,
        folder: &FolderRef,
        document_type: &str,
    ) -> Result<HashMap<String, String>> {
        let database = self.database.lock().await;
        Ok(database
            .documents
            .iter()
            .filter(|d| d.payload.folder == folder.id && d.payload.document_type == document_type)
            .filter(|d| !d.payload.key().is_empty())
            .map(|d| (d.payload.key().to_string(), d.id.clone()))
            .collect())
    }

    async fn create_many(&self, payloads: Vec<DocumentPayload>) -> Result<Vec<DocumentRef>> {
        let mut database = self.database.lock().await;
        let mut staged = database.clone();
        let now = Utc::now();
        let mut created = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let document = StoredDocument {
                id: new_id(),
                payload,
                created_at: now,
                updated_at: now,
            };
            created.push(DocumentRef {
                id: document.id.clone(),
                name: document.payload.name.clone(),
            });
            staged.documents.push(document);
        }
        self.commit(&mut database, staged).await?;
        Ok(created)
    }

    async fn update_many(
        &self,
        updates: Vec<(String, DocumentPayload)>,
    ) -> Result<Vec<DocumentRef>> {
        let mut database = self.database.lock().await;
        let mut staged = database.clone();
        let now = Utc::now();
        let mut updated = Vec::with_capacity(updates.len());
        for (id, payload) in updates {
            match staged.documents.iter_mut().find(|d| d.id == id) {
                Some(document) => {
                    document.payload = payload;
                    document.updated_at = now;
                    updated.push(DocumentRef {
                        id,
                        name: document.payload.name.clone(),
                    });
                }
                None => tracing::warn!("Document {} vanished before it could be updated", id),
            }
        }
        self.commit(&mut database, staged).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn payload(key: &str, folder: &str) -> DocumentPayload {
        DocumentPayload {
            name: format!("Item {}", key),
            img: "icons/armor.svg".to_string(),
            document_type: "armor".to_string(),
            system: json!({ "key": key }),
            folder: folder.to_string(),
        }
    }

    fn armors() -> FolderSpec {
        FolderSpec {
            name: "Swes - Armors".to_string(),
            kind: "Item".to_string(),
        }
    }

    #[tokio::test]
    async fn test_folder_is_reused() {
        let store = JsonDocumentStore::in_memory();

        let first = store.get_or_create_folder(&armors()).await.unwrap();
        let second = store.get_or_create_folder(&armors()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.folders().await.len(), 1);
    }

    #[tokio::test]
    async fn test_document_keys_scoped_to_folder_and_type() {
        let store = JsonDocumentStore::in_memory();
        let folder = store.get_or_create_folder(&armors()).await.unwrap();

        let mut weapon = payload("BLASTER", &folder.id);
        weapon.document_type = "weapon".to_string();
        store
            .create_many(vec![
                payload("PADDED", &folder.id),
                payload("HEAVY", "elsewhere"),
                payload("", &folder.id),
                weapon,
            ])
            .await
            .unwrap();

        let keys = store.document_keys(&folder, "armor").await.unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.contains_key("PADDED"));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_creation_time() {
        let store = JsonDocumentStore::in_memory();
        let folder = store.get_or_create_folder(&armors()).await.unwrap();
        let created = store
            .create_many(vec![payload("PADDED", &folder.id)])
            .await
            .unwrap();
        let before = store.documents().await[0].clone();

        let mut changed = payload("PADDED", &folder.id);
        changed.name = "Padded Armor".to_string();
        let updated = store
            .update_many(vec![(created[0].id.clone(), changed)])
            .await
            .unwrap();

        assert_eq!(updated[0].id, created[0].id);
        let after = &store.documents().await[0];
        assert_eq!(after.payload.name, "Padded Armor");
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_persists_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("worlds").join("w").join("swes-documents.json");

        let store = JsonDocumentStore::open(&path).await.unwrap();
        let folder = store.get_or_create_folder(&armors()).await.unwrap();
        store
            .create_many(vec![payload("PADDED", &folder.id)])
            .await
            .unwrap();
        assert!(path.exists());

        let reopened = JsonDocumentStore::open(&path).await.unwrap();
        assert_eq!(reopened.folders().await, vec![folder]);
        let documents = reopened.documents().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].payload.key(), "PADDED");
        assert_eq!(documents[0].payload.document_type, "armor");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_trace() {
        let temp_dir = TempDir::new().unwrap();
        let worlds = temp_dir.path().join("worlds");
        let path = worlds.join("w").join("swes-documents.json");
        let store = JsonDocumentStore::open(&path).await.unwrap();
        let folder = store.get_or_create_folder(&armors()).await.unwrap();

        // A regular file where the world directory should be makes every write fail.
        std::fs::remove_dir_all(&worlds).unwrap();
        std::fs::write(&worlds, b"not a directory").unwrap();

        let err = store
            .create_many(vec![payload("PADDED", &folder.id)])
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::RemoteError { .. }));
        assert!(store.documents().await.is_empty());

        let gears = FolderSpec {
            name: "Swes - Gears".to_string(),
            kind: "Item".to_string(),
        };
        assert!(store.get_or_create_folder(&gears).await.is_err());
        assert_eq!(store.folders().await.len(), 1);

        std::fs::remove_file(&worlds).unwrap();
        store.get_or_create_folder(&gears).await.unwrap();

        let reopened = JsonDocumentStore::open(&path).await.unwrap();
        assert!(reopened.documents().await.is_empty());
        assert_eq!(reopened.folders().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let worlds = temp_dir.path().join("worlds");
        let store = JsonDocumentStore::open(worlds.join("w").join("swes-documents.json"))
            .await
            .unwrap();
        let folder = store.get_or_create_folder(&armors()).await.unwrap();
        let created = store
            .create_many(vec![payload("PADDED", &folder.id)])
            .await
            .unwrap();

        std::fs::remove_dir_all(&worlds).unwrap();
        std::fs::write(&worlds, b"not a directory").unwrap();

        let mut changed = payload("PADDED", &folder.id);
        changed.name = "Padded Armor".to_string();
        assert!(store
            .update_many(vec![(created[0].id.clone(), changed)])
            .await
            .is_err());
        assert_eq!(store.documents().await[0].payload.name, "Item PADDED");
    }
}
