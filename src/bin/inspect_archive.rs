use anyhow::Context;
use clap::Parser;
use swes_import::core::entry::{ArchiveIndex, EntryKind};
use swes_import::domain::ports::Archive;
use swes_import::utils::logger;
use swes_import::{CategoryContext, HostPaths, ItemCategory, ZipArchiveSource};

#[derive(Parser)]
#[command(name = "inspect-archive")]
#[command(about = "Show how an OggDude data export is classified before importing it")]
struct Args {
    /// Path to the OggDude data export (.zip)
    archive: String,

    /// List every file of every directory
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let archive = ZipArchiveSource::open(&args.archive)
        .await
        .with_context(|| format!("Failed to open archive '{}'", args.archive))?;
    let index = ArchiveIndex::build(&archive.entries());

    println!("📦 {}", args.archive);
    for kind in [
        EntryKind::Directory,
        EntryKind::Markup,
        EntryKind::Image,
        EntryKind::Unknown,
    ] {
        let count = index.by_kind.get(&kind).map_or(0, Vec::len);
        println!("  {:<10} {}", format!("{:?}", kind), count);
    }

    let mut directories: Vec<_> = index.by_directory.iter().collect();
    directories.sort_by(|a, b| a.0.cmp(b.0));
    println!("\n📁 Directories");
    for (directory, entries) in directories {
        let shown = if directory.is_empty() { "<root>" } else { directory };
        println!("  {} ({} files)", shown, entries.len());
        if args.verbose {
            for entry in entries {
                println!("    {:?} {}", entry.kind, entry.name);
            }
        }
    }

    println!("\n🔎 Categories");
    let paths = HostPaths::new("inspect", "swes");
    for category in ItemCategory::ALL {
        let ctx = CategoryContext::for_category(category, &paths);
        let markup = index.lookup(&ctx.markup.directory, &ctx.markup.file_name);
        let images = index.images_under(&ctx.images.archive_directory).count();
        match markup {
            Some(entry) => println!(
                "  ✅ {:<7} {} found, {} images",
                category.as_str(), entry.full_path, images
            ),
            None => println!(
                "  ❌ {:<7} {}/{} missing, {} images",
                category.as_str(), ctx.markup.directory, ctx.markup.file_name, images
            ),
        }
    }

    Ok(())
}
