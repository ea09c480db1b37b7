#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::{ImportFileConfig, ImportSection};

use crate::core::context::{CategoryContext, HostPaths, ItemCategory};
use crate::core::pipeline::WritePolicy;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_identifier, validate_path, validate_required_field,
    Validate,
};
use std::path::PathBuf;

pub const DEFAULT_DATA_ROOT: &str = "./data";
pub const DEFAULT_WORLD_ID: &str = "default";
pub const DEFAULT_SYSTEM_ID: &str = "swes";
pub const DOCUMENTS_FILE_NAME: &str = "swes-documents.json";

/// Fully resolved settings of one import invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub archive: Option<String>,
    pub data_root: String,
    pub world_id: String,
    pub system_id: String,
    pub categories: Vec<ItemCategory>,
    pub write_policy: WritePolicy,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            archive: None,
            data_root: DEFAULT_DATA_ROOT.to_string(),
            world_id: DEFAULT_WORLD_ID.to_string(),
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            categories: ItemCategory::ALL.to_vec(),
            write_policy: WritePolicy::default(),
        }
    }
}

impl ImportSettings {
    /// Applies defaults to whatever `section` leaves unset.
    pub fn from_section(section: ImportSection) -> Result<Self> {
        let defaults = Self::default();

        let categories = match section.categories {
            Some(names) if !names.is_empty() => {
                let mut categories = Vec::with_capacity(names.len());
                for name in &names {
                    let category: ItemCategory = name.parse()?;
                    if !categories.contains(&category) {
                        categories.push(category);
                    }
                }
                categories
            }
            _ => defaults.categories,
        };

        let write_policy = match section.write_policy {
            Some(policy) => policy.parse()?,
            None => defaults.write_policy,
        };

        Ok(Self {
            archive: section.archive,
            data_root: section.data_root.unwrap_or(defaults.data_root),
            world_id: section.world_id.unwrap_or(defaults.world_id),
            system_id: section.system_id.unwrap_or(defaults.system_id),
            categories,
            write_policy,
        })
    }

    pub fn host_paths(&self) -> HostPaths {
        HostPaths::new(&self.world_id, &self.system_id)
    }

    pub fn contexts(&self) -> Vec<CategoryContext> {
        let paths = self.host_paths();
        self.categories
            .iter()
            .map(|category| CategoryContext::for_category(*category, &paths))
            .collect()
    }

    pub fn documents_file(&self) -> PathBuf {
        PathBuf::from(&self.data_root)
            .join("worlds")
            .join(&self.world_id)
            .join(DOCUMENTS_FILE_NAME)
    }
}

impl Validate for ImportSettings {
    fn validate(&self) -> Result<()> {
        let archive = validate_required_field("archive", &self.archive)?;
        validate_path("archive", archive)?;
        validate_file_extensions("archive", std::slice::from_ref(archive), &["zip"])?;
        validate_path("data_root", &self.data_root)?;
        validate_identifier("world_id", &self.world_id)?;
        validate_identifier("system_id", &self.system_id)?;

        if self.categories.is_empty() {
            return Err(ImportError::MissingConfigError {
                field: "categories".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> ImportSettings {
        ImportSettings {
            archive: Some("oggdude.zip".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_fill_unset_values() {
        let settings = ImportSettings::from_section(ImportSection {
            world_id: Some("outer-rim".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(settings.world_id, "outer-rim");
        assert_eq!(settings.system_id, DEFAULT_SYSTEM_ID);
        assert_eq!(settings.data_root, DEFAULT_DATA_ROOT);
        assert_eq!(settings.categories, ItemCategory::ALL.to_vec());
        assert_eq!(settings.write_policy, WritePolicy::Upsert);
    }

    #[test]
    fn test_categories_are_parsed_and_deduplicated() {
        let settings = ImportSettings::from_section(ImportSection {
            categories: Some(vec![
                "gear".to_string(),
                "Armor".to_string(),
                "gear".to_string(),
            ]),
            write_policy: Some("append".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            settings.categories,
            vec![ItemCategory::Gear, ItemCategory::Armor]
        );
        assert_eq!(settings.write_policy, WritePolicy::Append);
        assert_eq!(settings.contexts().len(), 2);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = ImportSettings::from_section(ImportSection {
            categories: Some(vec!["starships".to_string()]),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(ImportError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_storage_locations() {
        let settings = ImportSettings {
            data_root: "/srv/foundry".to_string(),
            world_id: "w1".to_string(),
            system_id: "swes".to_string(),
            ..valid_settings()
        };

        let paths = settings.host_paths();
        assert_eq!(paths.world_image_base(), "worlds/w1/swes-assets/images");
        assert_eq!(paths.system_icon_base(), "systems/swes/assets/images/icons");
        assert_eq!(
            settings.documents_file(),
            PathBuf::from("/srv/foundry/worlds/w1/swes-documents.json")
        );
        let contexts = settings.contexts();
        assert!(contexts[0]
            .images
            .world_path
            .starts_with(&paths.world_image_base()));
        assert!(contexts[0]
            .images
            .default_icon
            .starts_with(&paths.system_icon_base()));
    }

    #[test]
    fn test_validation() {
        assert!(valid_settings().validate().is_ok());

        let missing_archive = ImportSettings::default();
        assert!(matches!(
            missing_archive.validate(),
            Err(ImportError::MissingConfigError { .. })
        ));

        let not_a_zip = ImportSettings {
            archive: Some("Armor.xml".to_string()),
            ..Default::default()
        };
        assert!(not_a_zip.validate().is_err());

        let bad_world = ImportSettings {
            world_id: "../escape".to_string(),
            ..valid_settings()
        };
        assert!(bad_world.validate().is_err());

        let no_categories = ImportSettings {
            categories: Vec::new(),
            ..valid_settings()
        };
        assert!(no_categories.validate().is_err());

        let empty_root = ImportSettings {
            data_root: String::new(),
            ..valid_settings()
        };
        assert!(empty_root.validate().is_err());
    }
}
