//! Per-category import configuration.

use crate::core::mappers::{armor_mapper, gear_mapper, weapon_mapper, RecordMapper};
use crate::domain::model::FolderSpec;
use crate::utils::error::ImportError;
use std::fmt;
use std::str::FromStr;

pub const MARKUP_DIRECTORY: &str = "Data";
pub const FOLDER_KIND: &str = "Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Armor,
    Weapon,
    Gear,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 3] = [ItemCategory::Armor, ItemCategory::Weapon, ItemCategory::Gear];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Armor => "armor",
            ItemCategory::Weapon => "weapon",
            ItemCategory::Gear => "gear",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "armor" | "armors" => Ok(ItemCategory::Armor),
            "weapon" | "weapons" => Ok(ItemCategory::Weapon),
            "gear" | "gears" => Ok(ItemCategory::Gear),
            _ => Err(ImportError::InvalidConfigValueError {
                field: "categories".to_string(),
                value: s.to_string(),
                reason: "Expected one of: armor, weapon, gear".to_string(),
            }),
        }
    }
}

/// Locations in the host storage: world assets are user-visible uploads, system icons ship
/// with the game system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub world_id: String,
    pub system_id: String,
}

impl HostPaths {
    pub fn new(world_id: impl Into<String>, system_id: impl Into<String>) -> Self {
        Self {
            world_id: world_id.into(),
            system_id: system_id.into(),
        }
    }

    /// World storage base for uploaded artwork.
    pub fn world_image_base(&self) -> String {
        format!("worlds/{}/swes-assets/images", self.world_id)
    }

    /// Icons shipped with the game system.
    pub fn system_icon_base(&self) -> String {
        format!("systems/{}/assets/images/icons", self.system_id)
    }

    pub fn world_image_path(&self, directory: &str) -> String {
        format!("{}/{}", self.world_image_base(), directory)
    }

    pub fn system_icon_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.system_icon_base(), file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSource {
    pub directory: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// Archive directory holding the category artwork.
    pub archive_directory: String,
    /// Artwork file names are `{name_prefix}{key}.png`.
    pub name_prefix: String,
    pub world_path: String,
    pub default_icon: String,
}

#[derive(Debug, Clone)]
pub struct ElementSpec {
    /// Dot-separated path to the record nodes in the parsed markup.
    pub selector: String,
    pub mapper: RecordMapper,
    pub document_type: String,
}

#[derive(Debug, Clone)]
pub struct CategoryContext {
    pub category: ItemCategory,
    pub markup: MarkupSource,
    pub images: ImageSource,
    pub folder: FolderSpec,
    pub element: ElementSpec,
}

impl CategoryContext {
    pub fn for_category(category: ItemCategory, paths: &HostPaths) -> Self {
        match category {
            ItemCategory::Armor => build_armor_context(paths),
            ItemCategory::Weapon => build_weapon_context(paths),
            ItemCategory::Gear => build_gear_context(paths),
        }
    }

    /// Expected uploaded artwork for a record key.
    pub fn icon_path(&self, key: &str) -> String {
        format!(
            "{}/{}{}.png",
            self.images.world_path, self.images.name_prefix, key
        )
    }
}

struct CategoryTemplate {
    category: ItemCategory,
    file_name: &'static str,
    image_directory: &'static str,
    image_prefix: &'static str,
    world_directory: &'static str,
    icon: &'static str,
    folder_name: &'static str,
    selector: &'static str,
    mapper: RecordMapper,
}

fn build_context(template: CategoryTemplate, paths: &HostPaths) -> CategoryContext {
    CategoryContext {
        category: template.category,
        markup: MarkupSource {
            directory: MARKUP_DIRECTORY.to_string(),
            file_name: template.file_name.to_string(),
        },
        images: ImageSource {
            archive_directory: template.image_directory.to_string(),
            name_prefix: template.image_prefix.to_string(),
            world_path: paths.world_image_path(template.world_directory),
            default_icon: paths.system_icon_path(template.icon),
        },
        folder: FolderSpec {
            name: template.folder_name.to_string(),
            kind: FOLDER_KIND.to_string(),
        },
        element: ElementSpec {
            selector: template.selector.to_string(),
            mapper: template.mapper,
            document_type: template.category.as_str().to_string(),
        },
    }
}

pub fn build_armor_context(paths: &HostPaths) -> CategoryContext {
    build_context(
        CategoryTemplate {
            category: ItemCategory::Armor,
            file_name: "Armor.xml",
            image_directory: "Data/EquipmentImages/Armor",
            image_prefix: "Armor",
            world_directory: "armors",
            icon: "armor.svg",
            folder_name: "Swes - Armors",
            selector: "Armors.Armor",
            mapper: armor_mapper,
        },
        paths,
    )
}

pub fn build_weapon_context(paths: &HostPaths) -> CategoryContext {
    build_context(
        CategoryTemplate {
            category: ItemCategory::Weapon,
            file_name: "Weapons.xml",
            image_directory: "Data/EquipmentImages/Weapon",
            image_prefix: "Weapon",
            world_directory: "weapons",
            icon: "weapon.svg",
            folder_name: "Swes - Weapons",
            selector: "Weapons.Weapon",
            mapper: weapon_mapper,
        },
        paths,
    )
}

pub fn build_gear_context(paths: &HostPaths) -> CategoryContext {
    build_context(
        CategoryTemplate {
            category: ItemCategory::Gear,
            file_name: "Gear.xml",
            image_directory: "Data/EquipmentImages/Gear",
            image_prefix: "Gear",
            world_directory: "gears",
            icon: "gear.svg",
            folder_name: "Swes - Gears",
            selector: "Gears.Gear",
            mapper: gear_mapper,
        },
        paths,
    )
}
