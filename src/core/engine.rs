use crate::core::context::{CategoryContext, ItemCategory};
use crate::core::entry::{ArchiveIndex, EntryKind};
use crate::core::pipeline::{CategoryReport, ImportPipeline, WritePolicy};
use crate::domain::ports::{Archive, DocumentStore, FileStore};
use crate::utils::error::{ErrorSeverity, ImportError};
use crate::utils::monitor::SystemMonitor;

#[derive(Debug)]
pub struct CategoryFailure {
    pub category: ItemCategory,
    pub error: ImportError,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub completed: Vec<CategoryReport>,
    pub failed: Vec<CategoryFailure>,
}

impl ImportSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn report(&self, category: ItemCategory) -> Option<&CategoryReport> {
        self.completed.iter().find(|r| r.category == category)
    }

    pub fn worst_severity(&self) -> Option<ErrorSeverity> {
        self.failed
            .iter()
            .map(|f| f.error.severity())
            .max()
    }
}

/// Owns the collaborators of one import invocation and runs categories one after another.
pub struct ImportEngine<A: Archive, F: FileStore, D: DocumentStore> {
    archive: A,
    files: F,
    documents: D,
    write_policy: WritePolicy,
    monitor: SystemMonitor,
}

impl<A: Archive, F: FileStore, D: DocumentStore> ImportEngine<A, F, D> {
    pub fn new(archive: A, files: F, documents: D) -> Self {
        Self::new_with_monitoring(archive, files, documents, false)
    }

    pub fn new_with_monitoring(archive: A, files: F, documents: D, monitor_enabled: bool) -> Self {
        Self {
            archive,
            files,
            documents,
            write_policy: WritePolicy::default(),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub async fn run(&self, contexts: &[CategoryContext]) -> ImportSummary {
        tracing::info!("Starting import of {} categories", contexts.len());

        let index = ArchiveIndex::build(&self.archive.entries());
        tracing::info!(
            "Archive holds {} directories, {} markup files, {} images",
            index.by_kind.get(&EntryKind::Directory).map_or(0, Vec::len),
            index.by_kind.get(&EntryKind::Markup).map_or(0, Vec::len),
            index.by_kind.get(&EntryKind::Image).map_or(0, Vec::len),
        );

        let pipeline = ImportPipeline::new(&self.archive, &self.files, &self.documents, &index)
            .with_write_policy(self.write_policy);

        let mut summary = ImportSummary::default();
        for ctx in contexts {
            match pipeline.process_elements(ctx).await {
                Ok(report) => summary.completed.push(report),
                Err(error) => {
                    tracing::error!(
                        "❌ {} import failed at stage {:?}: {}",
                        ctx.category,
                        error.stage(),
                        error
                    );
                    summary.failed.push(CategoryFailure {
                        category: ctx.category,
                        error,
                    });
                }
            }
            self.monitor.log_stats(ctx.category.as_str());
        }

        self.monitor.log_final_stats();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::HostPaths;
    use crate::core::test_support::{armor_archive, MemoryDocumentStore, MemoryFileStore};
    use crate::utils::error::Stage;

    fn all_contexts() -> Vec<CategoryContext> {
        let paths = HostPaths::new("test-world", "swes");
        ItemCategory::ALL
            .iter()
            .map(|c| CategoryContext::for_category(*c, &paths))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_category_does_not_stop_the_others() {
        let engine = ImportEngine::new(
            armor_archive(true),
            MemoryFileStore::new(),
            MemoryDocumentStore::new(),
        );

        let summary = engine.run(&all_contexts()).await;

        assert!(!summary.is_success());
        assert_eq!(summary.completed.len(), 1);
        assert_eq!(summary.report(ItemCategory::Armor).unwrap().created, 1);

        let failed: Vec<ItemCategory> = summary.failed.iter().map(|f| f.category).collect();
        assert_eq!(failed, vec![ItemCategory::Weapon, ItemCategory::Gear]);
        assert!(summary
            .failed
            .iter()
            .all(|f| f.error.stage() == Some(Stage::Locate)));
        assert_eq!(summary.worst_severity(), Some(ErrorSeverity::High));
    }

    #[tokio::test]
    async fn test_empty_context_list() {
        let engine = ImportEngine::new(
            armor_archive(false),
            MemoryFileStore::new(),
            MemoryDocumentStore::new(),
        );

        let summary = engine.run(&[]).await;

        assert!(summary.is_success());
        assert!(summary.completed.is_empty());
        assert!(engine.documents().folders().await.is_empty());
    }
}
