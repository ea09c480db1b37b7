use crate::core::coerce::Diagnostics;
use crate::core::context::{CategoryContext, ItemCategory};
use crate::core::entry::{ArchiveIndex, ClassifiedEntry};
use crate::core::markup::{one_or_many, parse_markup, select};
use crate::core::provision::{create_path_if_necessary, resolve_icons, upload_images};
use crate::domain::model::{DocumentPayload, FolderRef, NormalizedRecord};
use crate::domain::ports::{Archive, DocumentStore, FileStore};
use crate::utils::error::{ImportError, Result, Stage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How the persist stage treats records whose key already exists in the destination folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Update documents in place by domain key, create the rest.
    #[default]
    Upsert,
    /// Always create, duplicating documents on every re-import.
    Append,
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::Upsert => f.write_str("upsert"),
            WritePolicy::Append => f.write_str("append"),
        }
    }
}

impl FromStr for WritePolicy {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(WritePolicy::Upsert),
            "append" => Ok(WritePolicy::Append),
            _ => Err(ImportError::InvalidConfigValueError {
                field: "write_policy".to_string(),
                value: s.to_string(),
                reason: "Expected 'upsert' or 'append'".to_string(),
            }),
        }
    }
}

/// Outcome of one successful category run.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub category: ItemCategory,
    pub folder: FolderRef,
    pub records: usize,
    pub images_uploaded: usize,
    pub images_failed: usize,
    pub icons_fallback: usize,
    pub created: usize,
    pub updated: usize,
    pub diagnostics: Diagnostics,
}

/// Runs the import stages for one category against injected collaborators.
pub struct ImportPipeline<'a, A: Archive, F: FileStore, D: DocumentStore> {
    archive: &'a A,
    files: &'a F,
    documents: &'a D,
    index: &'a ArchiveIndex,
    write_policy: WritePolicy,
}

impl<'a, A: Archive, F: FileStore, D: DocumentStore> ImportPipeline<'a, A, F, D> {
    pub fn new(archive: &'a A, files: &'a F, documents: &'a D, index: &'a ArchiveIndex) -> Self {
        Self {
            archive,
            files,
            documents,
            index,
            write_policy: WritePolicy::default(),
        }
    }

    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub async fn process_elements(&self, ctx: &CategoryContext) -> Result<CategoryReport> {
        let category = ctx.category.as_str();
        let fail = |stage: Stage| move |e: ImportError| e.at_stage(category, stage);

        tracing::info!("📦 {}: importing from {}/{}", category, ctx.markup.directory, ctx.markup.file_name);

        let markup_entry = self
            .index
            .lookup(&ctx.markup.directory, &ctx.markup.file_name)
            .ok_or_else(|| ImportError::MissingMarkupFile {
                category: category.to_string(),
                directory: ctx.markup.directory.clone(),
                file_name: ctx.markup.file_name.clone(),
            })
            .map_err(fail(Stage::Locate))?;

        let text = self
            .archive
            .read_text(&markup_entry.full_path)
            .await
            .map_err(fail(Stage::Extract))?;

        let world_path = create_path_if_necessary(self.files, &ctx.images.world_path)
            .await
            .map_err(fail(Stage::Provision))?;

        let images: Vec<&ClassifiedEntry> = self
            .index
            .images_under(&ctx.images.archive_directory)
            .collect();
        let uploads = upload_images(self.archive, self.files, &images, &world_path).await;
        tracing::info!(
            "🖼️ {}: {} images uploaded, {} failed",
            category,
            uploads.uploaded.len(),
            uploads.failed
        );

        let tree = parse_markup(&text).map_err(fail(Stage::Parse))?;

        let folder = self
            .documents
            .get_or_create_folder(&ctx.folder)
            .await
            .map_err(fail(Stage::Folder))?;

        let selected = select(&tree, &ctx.element.selector);
        if selected.is_none() {
            tracing::warn!("{}: no records under {}", category, ctx.element.selector);
        }
        let nodes = one_or_many(selected);
        let mut diagnostics = Diagnostics::new();
        let records = (ctx.element.mapper)(&nodes, &mut diagnostics);
        tracing::info!(
            "🔄 {}: mapped {} records ({} missing mandatory fields)",
            category,
            records.len(),
            diagnostics.len()
        );

        let icons = resolve_icons(self.files, ctx, &records).await;
        let icons_fallback = icons.iter().filter(|icon| icon.fallback).count();

        let payloads = records
            .iter()
            .zip(icons)
            .map(|(record, icon)| build_payload(ctx, record, icon.path, &folder))
            .collect::<Result<Vec<_>>>()
            .map_err(fail(Stage::Map))?;

        let (created, updated) = self
            .persist(ctx, &folder, payloads)
            .await
            .map_err(fail(Stage::Persist))?;
        tracing::info!("💾 {}: {} created, {} updated in '{}'", category, created, updated, folder.name);

        Ok(CategoryReport {
            category: ctx.category,
            folder,
            records: records.len(),
            images_uploaded: uploads.uploaded.len(),
            images_failed: uploads.failed,
            icons_fallback,
            created,
            updated,
            diagnostics,
        })
    }

    async fn persist(
        &self,
        ctx: &CategoryContext,
        folder: &FolderRef,
        payloads: Vec<DocumentPayload>,
    ) -> Result<(usize, usize)> {
        if payloads.is_empty() {
            return Ok((0, 0));
        }

        if self.write_policy == WritePolicy::Append {
            let created = self.documents.create_many(payloads).await?;
            return Ok((created.len(), 0));
        }

        let existing = self
            .documents
            .document_keys(folder, &ctx.element.document_type)
            .await?;

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for payload in collapse_duplicate_keys(payloads) {
            match existing.get(payload.key()) {
                Some(id) if !payload.key().is_empty() => updates.push((id.clone(), payload)),
                _ => creates.push(payload),
            }
        }

        let updated = if updates.is_empty() {
            0
        } else {
            self.documents.update_many(updates).await?.len()
        };
        let created = if creates.is_empty() {
            0
        } else {
            self.documents.create_many(creates).await?.len()
        };
        Ok((created, updated))
    }
}

pub fn build_payload(
    ctx: &CategoryContext,
    record: &NormalizedRecord,
    img: String,
    folder: &FolderRef,
) -> Result<DocumentPayload> {
    Ok(DocumentPayload {
        name: record.name().to_string(),
        img,
        document_type: ctx.element.document_type.clone(),
        system: serde_json::to_value(record)?,
        folder: folder.id.clone(),
    })
}

/// Keeps one payload per non-empty key: the position of the first, the content of the last.
fn collapse_duplicate_keys(payloads: Vec<DocumentPayload>) -> Vec<DocumentPayload> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut collapsed: Vec<DocumentPayload> = Vec::with_capacity(payloads.len());

    for payload in payloads {
        let key = payload.key().to_string();
        if key.is_empty() {
            collapsed.push(payload);
            continue;
        }
        match positions.get(&key) {
            Some(&idx) => {
                tracing::warn!("Key {} appears more than once, keeping the last record", key);
                collapsed[idx] = payload;
            }
            None => {
                positions.insert(key, collapsed.len());
                collapsed.push(payload);
            }
        }
    }
    collapsed
}
