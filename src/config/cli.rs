use crate::config::toml_config::{ImportFileConfig, ImportSection};
use crate::config::ImportSettings;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "swes-import")]
#[command(about = "Import OggDude equipment data (armor, weapons, gear) into a SWES world")]
pub struct CliConfig {
    #[arg(long, help = "Path to the OggDude data export (.zip)")]
    pub archive: Option<String>,

    #[arg(long, help = "Root of the host data storage [default: ./data]")]
    pub data_root: Option<String>,

    #[arg(long, help = "Target world id [default: default]")]
    pub world_id: Option<String>,

    #[arg(long, help = "Game system id [default: swes]")]
    pub system_id: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Categories to import [default: armor,weapon,gear]")]
    pub categories: Vec<String>,

    #[arg(long, help = "upsert (default) or append")]
    pub write_policy: Option<String>,

    #[arg(long, help = "TOML file with an [import] section")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory after each category")]
    pub monitor: bool,
}

impl CliConfig {
    fn as_section(&self) -> ImportSection {
        ImportSection {
            archive: self.archive.clone(),
            data_root: self.data_root.clone(),
            world_id: self.world_id.clone(),
            system_id: self.system_id.clone(),
            categories: if self.categories.is_empty() {
                None
            } else {
                Some(self.categories.clone())
            },
            write_policy: self.write_policy.clone(),
        }
    }

    /// Flags first, then the `--config` file, then built-in defaults.
    pub fn resolve_settings(&self) -> Result<ImportSettings> {
        let file_section = match &self.config {
            Some(path) => {
                tracing::info!("📄 Loading configuration from {}", path);
                ImportFileConfig::from_file(path)?.import
            }
            None => ImportSection::default(),
        };

        ImportSettings::from_section(self.as_section().or(file_section))
    }
}
