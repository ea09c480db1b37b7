use super::common::{map_base_mods, map_common, map_quality, map_weapon_modifiers};
use crate::core::coerce::{
    mandatory_number, mandatory_string, optional_array, optional_boolean, optional_string,
    Diagnostics,
};
use crate::core::markup::get_path;
use crate::domain::model::{NormalizedRecord, Weapon};
use serde_json::Value;

pub fn map_weapon(node: &Value, diagnostics: &mut Diagnostics) -> Weapon {
    Weapon {
        common: map_common(node, "weapon", diagnostics),
        skill_key: mandatory_string(diagnostics, "weapon.SkillKey", node.get("SkillKey")),
        damage: mandatory_number(diagnostics, "weapon.Damage", node.get("Damage")),
        damage_add: mandatory_number(diagnostics, "weapon.DamageAdd", node.get("DamageAdd")),
        crit: mandatory_number(diagnostics, "weapon.Crit", node.get("Crit")),
        size_low: mandatory_number(diagnostics, "weapon.SizeLow", node.get("SizeLow")),
        size_high: mandatory_number(diagnostics, "weapon.SizeHigh", node.get("SizeHigh")),
        attach_cost_mult: mandatory_number(
            diagnostics,
            "weapon.AttachCostMult",
            node.get("AttachCostMult"),
        ),
        range: optional_string(node.get("Range")),
        range_value: optional_string(node.get("RangeValue")),
        scale: optional_string(node.get("Scale")),
        hands: optional_string(node.get("Hands")),
        no_melee: optional_boolean(node.get("NoMelee")),
        ordnance: optional_boolean(node.get("Ordnance")),
        vehicle_no_replace: optional_boolean(node.get("VehicleNoReplace")),
        qualities: optional_array(get_path(node, &["Qualities", "Quality"]), |quality| {
            map_quality(quality, "weapon.Quality.Key", diagnostics)
        }),
        mods: map_base_mods(node),
        weapon_modifiers: map_weapon_modifiers(node, "weapon", diagnostics),
    }
}

pub fn weapon_mapper(records: &[&Value], diagnostics: &mut Diagnostics) -> Vec<NormalizedRecord> {
    records
        .iter()
        .map(|node| NormalizedRecord::Weapon(map_weapon(node, diagnostics)))
        .collect()
}
