pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ImportSettings;

pub use crate::adapters::{JsonDocumentStore, LocalFileStore, ZipArchiveSource};
pub use crate::core::context::{CategoryContext, HostPaths, ItemCategory};
pub use crate::core::engine::{ImportEngine, ImportSummary};
pub use crate::core::pipeline::{CategoryReport, ImportPipeline, WritePolicy};
pub use crate::utils::error::{ImportError, Result};
