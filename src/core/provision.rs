//! Storage helpers around the collaborator ports: idempotent path creation, image upload
//! fan-out and icon resolution fan-out.

use crate::core::context::CategoryContext;
use crate::core::entry::ClassifiedEntry;
use crate::domain::model::NormalizedRecord;
use crate::domain::ports::{Archive, FileStore};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};

/// Upper bound on in-flight uploads or existence checks within one category.
pub const MAX_CONCURRENT_TRANSFERS: usize = 8;

pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), segment)
    }
}

/// Creates `path` one segment at a time, skipping segments that already exist.
pub async fn create_path_if_necessary<F: FileStore>(files: &F, path: &str) -> Result<String> {
    if files.exists(path).await? {
        tracing::debug!("Path {} already exists", path);
        return Ok(path.to_string());
    }

    tracing::info!("Path {} does not exist yet, creating it", path);
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let next = join_path(&current, segment);
        if !files.exists(&next).await? {
            tracing::debug!("Creating {} under '{}'", segment, current);
            files.create_directory(&current, segment).await?;
        }
        current = next;
    }
    Ok(path.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded: Vec<String>,
    pub failed: usize,
}

/// Uploads every image concurrently. A failing image is logged and counted, the rest carry on.
pub async fn upload_images<A: Archive, F: FileStore>(
    archive: &A,
    files: &F,
    images: &[&ClassifiedEntry],
    destination: &str,
) -> UploadOutcome {
    let results: Vec<Result<String>> = stream::iter(images.iter().map(|image| async move {
        let data = archive.read_binary(&image.full_path).await?;
        files.upload(destination, &image.name, &data).await
    }))
    .buffered(MAX_CONCURRENT_TRANSFERS)
    .collect()
    .await;

    let mut outcome = UploadOutcome::default();
    for (image, result) in images.iter().zip(results) {
        match result {
            Ok(path) => {
                tracing::debug!("Image {} uploaded to {}", image.full_path, path);
                outcome.uploaded.push(path);
            }
            Err(e) => {
                tracing::warn!("Image {} could not be uploaded: {}", image.full_path, e);
                outcome.failed += 1;
            }
        }
    }
    outcome
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub path: String,
    pub fallback: bool,
}

/// Picks each record's uploaded artwork, or the category default when it is missing or the
/// existence check fails. Output order matches `records`.
pub async fn resolve_icons<F: FileStore>(
    files: &F,
    ctx: &CategoryContext,
    records: &[NormalizedRecord],
) -> Vec<ResolvedIcon> {
    let default_icon = || ResolvedIcon {
        path: ctx.images.default_icon.clone(),
        fallback: true,
    };

    stream::iter(records.iter().map(|record| async move {
        let key = record.key();
        if key.is_empty() {
            return default_icon();
        }
        let candidate = ctx.icon_path(key);
        match files.exists(&candidate).await {
            Ok(true) => ResolvedIcon {
                path: candidate,
                fallback: false,
            },
            Ok(false) => default_icon(),
            Err(e) => {
                tracing::warn!("Could not check icon {}: {}", candidate, e);
                default_icon()
            }
        }
    }))
    .buffered(MAX_CONCURRENT_TRANSFERS)
    .collect()
    .await
}
