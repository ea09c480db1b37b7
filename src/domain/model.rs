use serde::{Deserialize, Serialize};

/// Bibliographic reference of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub description: String,
    pub page: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraPrice {
    pub name: String,
    pub price: i64,
    pub rarity: i64,
    pub restricted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    pub key: String,
    pub count: i64,
}

/// Dice pool adjustment granted by a mod.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieModifier {
    pub skill_key: String,
    pub skill_type: String,
    pub skill_char: String,
    pub add_set_back_count: i64,
    pub advantage_count: i64,
    pub boost_count: i64,
    pub setback_count: i64,
    pub success_count: i64,
    pub threat_count: i64,
    pub upgrade_ability_count: i64,
    pub upgrade_difficulty_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMod {
    pub key: String,
    pub misc_desc: String,
    pub count: i64,
    pub index: i64,
    pub def_zone: String,
    pub die_modifiers: Vec<DieModifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponModifier {
    pub unarmed: bool,
    pub unarmed_name: String,
    pub skill_key: String,
    pub all_skill_key: String,
    pub damage: i64,
    pub damage_add: i64,
    pub crit: i64,
    pub crit_sub: i64,
    pub range_value: i64,
    pub range: String,
    pub hands: String,
    pub qualities: Vec<Quality>,
}

/// Fields every equipment category carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCommon {
    pub name: String,
    pub key: String,
    pub description: String,
    pub restricted: bool,
    #[serde(rename = "type")]
    pub item_type: String,
    pub price: i64,
    pub encumbrance: i64,
    pub hp: i64,
    pub rarity: i64,
    pub sources: Vec<Source>,
    pub categories: Vec<String>,
    pub era_pricing: Vec<EraPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    #[serde(flatten)]
    pub common: ItemCommon,
    pub soak: i64,
    pub defense: i64,
    pub mods: Vec<ItemMod>,
    pub weapon_modifiers: Vec<WeaponModifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    #[serde(flatten)]
    pub common: ItemCommon,
    pub skill_key: String,
    pub damage: i64,
    pub damage_add: i64,
    pub crit: i64,
    pub size_low: i64,
    pub size_high: i64,
    pub attach_cost_mult: i64,
    pub range: String,
    pub range_value: String,
    pub scale: String,
    pub hands: String,
    pub no_melee: bool,
    pub ordnance: bool,
    pub vehicle_no_replace: bool,
    pub qualities: Vec<Quality>,
    pub mods: Vec<ItemMod>,
    pub weapon_modifiers: Vec<WeaponModifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gear {
    #[serde(flatten)]
    pub common: ItemCommon,
    pub short: String,
    pub weapon_modifiers: Vec<WeaponModifier>,
}

/// One mapped markup node, ready to become the `system` part of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Armor(Armor),
    Weapon(Weapon),
    Gear(Gear),
}

impl NormalizedRecord {
    pub fn common(&self) -> &ItemCommon {
        match self {
            NormalizedRecord::Armor(armor) => &armor.common,
            NormalizedRecord::Weapon(weapon) => &weapon.common,
            NormalizedRecord::Gear(gear) => &gear.common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn key(&self) -> &str {
        &self.common().key
    }
}

/// Identity of a destination folder: exact name plus document kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderSpec {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub id: String,
    pub name: String,
    pub kind: String,
}

/// Bulk-create payload for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub name: String,
    pub img: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub system: serde_json::Value,
    pub folder: String,
}

impl DocumentPayload {
    /// Domain key carried in the `system` part, empty when absent.
    pub fn key(&self) -> &str {
        self.system
            .get("key")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
}
