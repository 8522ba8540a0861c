//! Player entity (spec §3.1).
//!
//! Mutated only by the room's resolver or the subsystems it drives; never
//! holds a reference to another `Player` (design note §9 on cyclic
//! references) — cross-player links (e.g. `death_attacker`) are by id only
//! and resolved through the room's owner map.

use std::collections::HashMap;

use crate::catalog::types::AbilityDef;
use crate::ids::{ConnectionId, PlayerId};
use crate::status_effect::StatusEffectMap;

/// Class-effect buffs named in spec §3.1 (Spirit Guard, Sanctuary of Truth,
/// Thirsty Blade). Modeled as a small tagged map rather than ad hoc bools so
/// new class effects are one variant away, not a new struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassEffectKind {
    /// Counter-attacks anyone who damages the holder.
    SpiritGuard,
    /// Counter-attacks and reveals the attacker's warlock status if warlock.
    SanctuaryOfTruth,
    /// Heals the holder for a fraction of damage it deals.
    ThirstyBlade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassEffectState {
    pub magnitude: f64,
    /// `None` means "lasts until explicitly cleared" (most class effects are
    /// passive-for-the-game once unlocked).
    pub turns: Option<u32>,
}

pub type ClassEffectMap = HashMap<ClassEffectKind, ClassEffectState>;

/// Race-specific state that doesn't fit the generic status-effect model
/// (spec §3.1: "Stone Armor intact+value, Undying charge, Adaptability slot").
#[derive(Debug, Clone, Default)]
pub struct RacialState {
    pub uses_remaining: u32,
    /// Cleared at the start of each round for `PerRound` racials.
    pub used_this_round: bool,
    pub stone_armor_intact: bool,
    pub stone_armor_value: f64,
    pub undying_available: bool,
    pub adaptability_slot: Option<String>,
    pub keen_senses: bool,
}

/// Per-session combat statistics (used for trophy awards, spec §SPEC_FULL B).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    pub damage_dealt: u64,
    pub healing_done: u64,
    pub damage_taken: u64,
    pub monster_damage: u64,
    pub kills: u32,
    pub corruptions: u32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub connection_id: Option<ConnectionId>,
    pub name: String,
    pub race: Option<String>,
    pub class: Option<String>,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub base_armor: f64,
    pub effective_armor: f64,
    pub damage_mod: f64,
    pub healing_mod: f64,
    pub alive: bool,
    pub is_warlock: bool,
    pub pending_death: bool,
    pub death_attacker: Option<PlayerId>,
    pub abilities: Vec<AbilityDef>,
    pub cooldowns: HashMap<String, u32>,
    pub status_effects: StatusEffectMap,
    pub class_effects: ClassEffectMap,
    pub racial: RacialState,
    pub stats: SessionStats,
    pub ready: bool,
    pub connected: bool,
    pub is_host: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            connection_id: None,
            name,
            race: None,
            class: None,
            level: 1,
            hp: 100,
            max_hp: 100,
            base_armor: 0.0,
            effective_armor: 0.0,
            damage_mod: 1.0,
            healing_mod: 1.0,
            alive: true,
            is_warlock: false,
            pending_death: false,
            death_attacker: None,
            abilities: Vec::new(),
            cooldowns: HashMap::new(),
            status_effects: HashMap::new(),
            class_effects: HashMap::new(),
            racial: RacialState::default(),
            stats: SessionStats::default(),
            ready: false,
            connected: true,
            is_host: false,
        }
    }

    /// Abilities unlocked at the player's current level (spec §3.1 invariant:
    /// `unlocked ⊆ abilities` iff `player.level ≥ ability.unlockAt`).
    pub fn unlocked_abilities(&self) -> impl Iterator<Item = &AbilityDef> {
        self.abilities
            .iter()
            .filter(move |a| self.level >= a.unlock_at)
    }

    pub fn is_unlocked(&self, ability_id: &str) -> bool {
        self.unlocked_abilities().any(|a| a.id == ability_id)
    }

    pub fn cooldown_of(&self, ability_id: &str) -> u32 {
        self.cooldowns.get(ability_id).copied().unwrap_or(0)
    }

    /// Usability per spec §3.1: `cooldown[a]=0 ∧ a ∈ unlocked ∧ not stunned ∧ alive`.
    pub fn can_use(&self, ability_id: &str, stunned: bool) -> bool {
        self.alive
            && !stunned
            && self.cooldown_of(ability_id) == 0
            && self.is_unlocked(ability_id)
    }

    pub fn ability(&self, ability_id: &str) -> Option<&AbilityDef> {
        self.abilities.iter().find(|a| a.id == ability_id)
    }

    /// Rearms cooldown after a successful activation (spec §4.1.2: `cd =
    /// ability.cooldown + 1`, the extra tick accounting for the same-round
    /// decrement in step 9).
    pub fn set_cooldown_after_use(&mut self, ability_id: &str, cooldown: u32) {
        self.cooldowns
            .insert(ability_id.to_string(), cooldown + 1);
    }

    pub fn tick_cooldowns(&mut self) {
        for cd in self.cooldowns.values_mut() {
            *cd = cd.saturating_sub(1);
        }
    }

    pub fn take_damage_raw(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
        self.stats.damage_taken += amount as u64;
    }

    pub fn heal_raw(&mut self, amount: u32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Write-once-then-monotonic-until-death (spec §3.1 invariant).
    pub fn set_warlock(&mut self) {
        self.is_warlock = true;
    }

    pub fn clear_warlock_on_death(&mut self) {
        self.is_warlock = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{AbilityCategory, AbilityParams, TargetKind};

    fn ability(id: &str, unlock_at: u32) -> AbilityDef {
        AbilityDef {
            id: id.to_string(),
            name: id.to_string(),
            category: AbilityCategory::Attack,
            target: TargetKind::Single,
            unlock_at,
            order: 1,
            cooldown: 0,
            params: AbilityParams::default(),
        }
    }

    #[test]
    fn unlocked_filters_by_level() {
        let mut p = Player::new(PlayerId::new(), "A".into());
        p.abilities = vec![ability("slash", 1), ability("cleave", 3)];
        p.level = 1;
        assert!(p.is_unlocked("slash"));
        assert!(!p.is_unlocked("cleave"));
        p.level = 3;
        assert!(p.is_unlocked("cleave"));
    }

    #[test]
    fn cooldown_law_rearm_then_tick() {
        let mut p = Player::new(PlayerId::new(), "A".into());
        p.abilities = vec![ability("slash", 1)];
        p.set_cooldown_after_use("slash", 2);
        assert_eq!(p.cooldown_of("slash"), 3);
        p.tick_cooldowns();
        assert_eq!(p.cooldown_of("slash"), 2);
    }

    #[test]
    fn cannot_use_while_stunned_or_dead() {
        let mut p = Player::new(PlayerId::new(), "A".into());
        p.abilities = vec![ability("slash", 1)];
        assert!(p.can_use("slash", false));
        assert!(!p.can_use("slash", true));
        p.alive = false;
        assert!(!p.can_use("slash", false));
    }
}
