//! Read-only data shapes for the catalog (spec §3.6).
//!
//! The catalog is loaded once per process and shared (by `Arc`) across every
//! room; nothing in here is ever mutated after `Catalog::default_catalog()`
//! (or a future external loader) returns it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::status_effect::StatusKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityCategory {
    Attack,
    Heal,
    Defense,
    Special,
    Racial,
}

/// Who an ability can be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    SelfTarget,
    Single,
    Multi,
    Monster,
}

/// Usage accounting policy for a racial ability (spec §3.6, §GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RacialUsage {
    PerGame,
    PerRound,
    Passive,
}

/// Free-form numeric knobs an ability handler reads. Not every field applies
/// to every ability; handlers read only the fields relevant to their shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AbilityParams {
    pub base_amount: f64,
    pub armor_bonus: f64,
    pub status: Option<StatusKind>,
    pub status_turns: u32,
    pub status_magnitude: f64,
    pub counter_damage: f64,
    pub exclude_warlocks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: String,
    pub name: String,
    pub category: AbilityCategory,
    pub target: TargetKind,
    pub unlock_at: u32,
    /// Resolution priority within a round; lower resolves first (spec §4.1.1 step 3).
    pub order: u32,
    pub cooldown: u32,
    pub params: AbilityParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacialAbilityDef {
    pub id: String,
    pub name: String,
    pub usage: RacialUsage,
    pub max_uses: u32,
    pub params: AbilityParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: String,
    pub name: String,
    /// Ordered by unlock level then catalog order; `unlocked_for` (player.rs)
    /// filters this down to what a given level exposes.
    pub abilities: Vec<AbilityDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceDef {
    pub id: String,
    pub name: String,
    pub racial: RacialAbilityDef,
}

/// Coordination bonus tuning (spec §4.1.1 step 4, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinationBalance {
    pub bonus_per_attacker: f64,
    pub max_bonus: f64,
}

/// Warlock conversion tuning (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarlockWinConditions {
    pub majority_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionBalance {
    pub base_chance: f64,
    pub max_chance: f64,
    pub scaling_factor: f64,
    pub aoe_modifier: f64,
    pub random_modifier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarlockBalance {
    pub conversion: ConversionBalance,
    pub reject_warlock_healing: bool,
    pub win_conditions: WarlockWinConditions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterBalance {
    pub base_hp: f64,
    pub base_damage: f64,
    pub hp_per_level: f64,
    pub age_damage_multiplier: f64,
    pub level_up_hp_increment: f64,
    pub level_up_damage_increment: f64,
    pub level_up_armor_increment: f64,
    pub full_heal_on_level_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorBalance {
    /// `final = modDmg * (1 - min(max_reduction, reduction_per_point * armor))`.
    pub reduction_per_point: f64,
    pub max_reduction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub monster: MonsterBalance,
    pub coordination: CoordinationBalance,
    pub warlock: WarlockBalance,
    pub armor: ArmorBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventTemplate {
    pub public: String,
    pub attacker: Option<String>,
    pub target: Option<String>,
}

pub type MessageTemplates = HashMap<String, EventTemplate>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusEffectDefault {
    pub magnitude: f64,
    pub turns: u32,
}

pub type StatusEffectDefaults = HashMap<StatusKind, StatusEffectDefault>;
