//! Pieces shared by every equipment category.

use crate::core::coerce::{
    mandatory_boolean, mandatory_number, mandatory_string, optional_array, optional_boolean,
    optional_number, optional_string, optional_text_array, Diagnostics,
};
use crate::core::markup::{get_path, TEXT_KEY};
use crate::domain::model::{
    DieModifier, EraPrice, ItemCommon, ItemMod, Quality, Source, WeaponModifier,
};
use serde_json::Value;

pub fn map_common(node: &Value, prefix: &str, diagnostics: &mut Diagnostics) -> ItemCommon {
    let label = |field: &str| format!("{}.{}", prefix, field);

    ItemCommon {
        name: mandatory_string(diagnostics, &label("Name"), node.get("Name")),
        key: mandatory_string(diagnostics, &label("Key"), node.get("Key")),
        description: mandatory_string(diagnostics, &label("Description"), node.get("Description")),
        restricted: optional_boolean(node.get("Restricted")),
        item_type: mandatory_string(diagnostics, &label("Type"), node.get("Type")),
        price: mandatory_number(diagnostics, &label("Price"), node.get("Price")),
        encumbrance: mandatory_number(diagnostics, &label("Encumbrance"), node.get("Encumbrance")),
        hp: mandatory_number(diagnostics, &label("HP"), node.get("HP")),
        rarity: mandatory_number(diagnostics, &label("Rarity"), node.get("Rarity")),
        sources: optional_text_array(get_path(node, &["Sources", "Source"]), map_source),
        categories: optional_text_array(get_path(node, &["Categories", "Category"]), |category| {
            optional_string(Some(category))
        }),
        era_pricing: optional_array(get_path(node, &["EraPricing", "Era"]), |era| {
            map_era_price(era, prefix, diagnostics)
        }),
    }
}

/// A source is either bare text or `{_: description, Page: n}`.
pub fn map_source(source: &Value) -> Source {
    match source {
        Value::String(description) => Source {
            description: description.clone(),
            page: 0,
        },
        _ => Source {
            description: optional_string(source.get(TEXT_KEY)),
            page: optional_number(source.get("Page")),
        },
    }
}

pub fn map_era_price(era: &Value, prefix: &str, diagnostics: &mut Diagnostics) -> EraPrice {
    EraPrice {
        name: mandatory_string(diagnostics, &format!("{}.EraPrice.Name", prefix), era.get("Name")),
        price: mandatory_number(diagnostics, &format!("{}.EraPrice.Price", prefix), era.get("Price")),
        rarity: mandatory_number(
            diagnostics,
            &format!("{}.EraPrice.Rarity", prefix),
            era.get("Rarity"),
        ),
        restricted: mandatory_boolean(
            diagnostics,
            &format!("{}.EraPrice.Restricted", prefix),
            era.get("Restricted"),
        ),
    }
}

pub fn map_quality(quality: &Value, label: &str, diagnostics: &mut Diagnostics) -> Quality {
    Quality {
        key: mandatory_string(diagnostics, label, quality.get("Key")),
        count: optional_number(quality.get("Count")),
    }
}

pub fn map_die_modifier(modifier: &Value) -> DieModifier {
    DieModifier {
        skill_key: optional_string(modifier.get("SkillKey")),
        skill_type: optional_string(modifier.get("SkillType")),
        skill_char: optional_string(modifier.get("SkillChar")),
        add_set_back_count: optional_number(modifier.get("AddSetBackCount")),
        advantage_count: optional_number(modifier.get("AdvantageCount")),
        boost_count: optional_number(modifier.get("BoostCount")),
        setback_count: optional_number(modifier.get("SetbackCount")),
        success_count: optional_number(modifier.get("SuccessCount")),
        threat_count: optional_number(modifier.get("ThreatCount")),
        upgrade_ability_count: optional_number(modifier.get("UpgradeAbilityCount")),
        upgrade_difficulty_count: optional_number(modifier.get("UpgradeDifficultyCount")),
    }
}

pub fn map_item_mod(item_mod: &Value) -> ItemMod {
    ItemMod {
        key: optional_string(item_mod.get("Key")),
        misc_desc: optional_string(item_mod.get("MiscDesc")),
        count: optional_number(item_mod.get("Count")),
        index: optional_number(item_mod.get("Index")),
        def_zone: optional_string(item_mod.get("DefZone")),
        die_modifiers: optional_array(
            get_path(item_mod, &["DieModifiers", "DieModifier"]),
            map_die_modifier,
        ),
    }
}

pub fn map_base_mods(node: &Value) -> Vec<ItemMod> {
    optional_array(get_path(node, &["BaseMods", "Mod"]), map_item_mod)
}

pub fn map_weapon_modifier(
    modifier: &Value,
    prefix: &str,
    diagnostics: &mut Diagnostics,
) -> WeaponModifier {
    let quality_label = format!("{}.WeaponModifier.Quality.Key", prefix);
    WeaponModifier {
        unarmed: optional_boolean(modifier.get("Unarmed")),
        unarmed_name: optional_string(modifier.get("UnarmedName")),
        skill_key: optional_string(modifier.get("SkillKey")),
        all_skill_key: optional_string(modifier.get("AllSkillKey")),
        damage: optional_number(modifier.get("Damage")),
        damage_add: optional_number(modifier.get("DamageAdd")),
        crit: optional_number(modifier.get("Crit")),
        crit_sub: optional_number(modifier.get("CritSub")),
        range_value: optional_number(modifier.get("RangeValue")),
        range: optional_string(modifier.get("Range")),
        hands: optional_string(modifier.get("Hands")),
        qualities: optional_array(get_path(modifier, &["Qualities", "Quality"]), |quality| {
            map_quality(quality, &quality_label, diagnostics)
        }),
    }
}

pub fn map_weapon_modifiers(
    node: &Value,
    prefix: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<WeaponModifier> {
    optional_array(
        get_path(node, &["WeaponModifiers", "WeaponModifier"]),
        |modifier| map_weapon_modifier(modifier, prefix, diagnostics),
    )
}
