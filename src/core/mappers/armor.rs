use super::common::{map_base_mods, map_common, map_weapon_modifiers};
use crate::core::coerce::{mandatory_number, Diagnostics};
use crate::domain::model::{Armor, NormalizedRecord};
use serde_json::Value;

pub fn map_armor(node: &Value, diagnostics: &mut Diagnostics) -> Armor {
    Armor {
        common: map_common(node, "armor", diagnostics),
        soak: mandatory_number(diagnostics, "armor.Soak", node.get("Soak")),
        defense: mandatory_number(diagnostics, "armor.Defense", node.get("Defense")),
        mods: map_base_mods(node),
        weapon_modifiers: map_weapon_modifiers(node, "armor", diagnostics),
    }
}

pub fn armor_mapper(records: &[&Value], diagnostics: &mut Diagnostics) -> Vec<NormalizedRecord> {
    records
        .iter()
        .map(|node| NormalizedRecord::Armor(map_armor(node, diagnostics)))
        .collect()
}
