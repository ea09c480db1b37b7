use super::common::{map_common, map_weapon_modifiers};
use crate::core::coerce::{mandatory_string, Diagnostics};
use crate::domain::model::{Gear, NormalizedRecord};
use serde_json::Value;

pub fn map_gear(node: &Value, diagnostics: &mut Diagnostics) -> Gear {
    Gear {
        common: map_common(node, "gear", diagnostics),
        short: mandatory_string(diagnostics, "gear.Short", node.get("Short")),
        weapon_modifiers: map_weapon_modifiers(node, "gear", diagnostics),
    }
}

pub fn gear_mapper(records: &[&Value], diagnostics: &mut Diagnostics) -> Vec<NormalizedRecord> {
    records
        .iter()
        .map(|node| NormalizedRecord::Gear(map_gear(node, diagnostics)))
        .collect()
}
