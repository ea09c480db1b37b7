//! Category mappers: raw markup nodes in, normalized records out, same order and length.

pub mod armor;
pub mod common;
pub mod gear;
pub mod weapon;

use crate::core::coerce::Diagnostics;
use crate::domain::model::NormalizedRecord;
use serde_json::Value;

pub type RecordMapper = fn(&[&Value], &mut Diagnostics) -> Vec<NormalizedRecord>;

pub use armor::armor_mapper;
pub use gear::gear_mapper;
pub use weapon::weapon_mapper;
