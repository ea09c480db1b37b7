use clap::Parser;
use swes_import::utils::error::ImportError;
use swes_import::utils::{logger, validation::Validate};
use swes_import::{
    CliConfig, ImportEngine, ImportSummary, JsonDocumentStore, LocalFileStore, ZipArchiveSource,
};

fn fail(e: &ImportError, context: &str) -> ! {
    tracing::error!(
        "❌ {}: {} (Severity: {:?})",
        context,
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}: {}", context, e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}

fn print_summary(summary: &ImportSummary) {
    for report in &summary.completed {
        println!(
            "✅ {}: {} records ({} created, {} updated) into '{}', {} images uploaded ({} failed), {} default icons, {} missing fields",
            report.category,
            report.records,
            report.created,
            report.updated,
            report.folder.name,
            report.images_uploaded,
            report.images_failed,
            report.icons_fallback,
            report.diagnostics.len()
        );
    }
    for failure in &summary.failed {
        eprintln!("❌ {}: {}", failure.category, failure.error);
        eprintln!("💡 {}", failure.error.recovery_suggestion());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting swes-import");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match config.resolve_settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e, "Configuration could not be loaded"),
    };
    if let Err(e) = settings.validate() {
        fail(&e, "Configuration validation failed");
    }
    tracing::debug!("Resolved settings: {:?}", settings);

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // validate() guarantees the archive is set
    let archive_path = settings.archive.clone().unwrap_or_default();
    let archive = match ZipArchiveSource::open(&archive_path).await {
        Ok(archive) => archive,
        Err(e) => fail(&e, "Data archive could not be opened"),
    };

    if let Err(e) = tokio::fs::create_dir_all(&settings.data_root).await {
        fail(&ImportError::IoError(e), "Data root could not be created");
    }
    let files = LocalFileStore::new(&settings.data_root);
    let documents = match JsonDocumentStore::open(settings.documents_file()).await {
        Ok(documents) => documents,
        Err(e) => fail(&e, "Document store could not be opened"),
    };

    let engine = ImportEngine::new_with_monitoring(archive, files, documents, config.monitor)
        .with_write_policy(settings.write_policy);
    let summary = engine.run(&settings.contexts()).await;

    print_summary(&summary);

    match summary.worst_severity() {
        None => {
            tracing::info!("✅ Import completed successfully!");
            Ok(())
        }
        Some(severity) => {
            tracing::error!(
                "❌ {} of {} categories failed",
                summary.failed.len(),
                summary.failed.len() + summary.completed.len()
            );
            let exit_code = severity.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}
