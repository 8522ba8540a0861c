//! Status effects: a tagged sum over kinds with per-kind payloads (spec §3.3,
//! §4.6, and design note "Status effects: model as a tagged sum ... rather
//! than untyped property bags").

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::event::{Event, EventLog};
use crate::ids::PlayerId;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Poison,
    Stunned,
    Shielded,
    Invisible,
    Vulnerable,
    Weakened,
    Enraged,
    Regen,
    ImmuneNextDamage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StackPolicy {
    RefreshDuration,
    AddMagnitudeAndDuration,
    LastWriteWins,
}

fn stack_policy_for(kind: StatusKind) -> StackPolicy {
    match kind {
        StatusKind::Poison | StatusKind::Regen => StackPolicy::AddMagnitudeAndDuration,
        StatusKind::ImmuneNextDamage => StackPolicy::LastWriteWins,
        _ => StackPolicy::RefreshDuration,
    }
}

/// An active status effect instance (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub turns: u32,
    pub magnitude: f64,
    pub source: Option<PlayerId>,
}

pub type StatusEffectMap = HashMap<StatusKind, StatusEffect>;

/// Applies, ticks, and queries status effects. Stateless: all mutable state
/// lives on the `Player` being acted on, per the design note against
/// back-pointers (§9) — the manager never holds a reference to a player.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusEffectManager;

impl StatusEffectManager {
    /// Merges a new effect application per the per-kind stacking policy.
    pub fn apply(
        &self,
        target: &mut Player,
        kind: StatusKind,
        magnitude: f64,
        turns: u32,
        source: Option<PlayerId>,
        log: &mut EventLog,
    ) {
        let entry = target.status_effects.entry(kind);
        match entry {
            std::collections::hash_map::Entry::Occupied(mut occ) => {
                let existing = occ.get_mut();
                match stack_policy_for(kind) {
                    StackPolicy::RefreshDuration => {
                        existing.turns = existing.turns.max(turns);
                        existing.magnitude = magnitude;
                        existing.source = source;
                    }
                    StackPolicy::AddMagnitudeAndDuration => {
                        existing.turns += turns;
                        existing.magnitude += magnitude;
                    }
                    StackPolicy::LastWriteWins => {
                        existing.turns = turns;
                        existing.magnitude = magnitude;
                        existing.source = source;
                    }
                }
            }
            std::collections::hash_map::Entry::Vacant(vac) => {
                vac.insert(StatusEffect {
                    kind,
                    turns,
                    magnitude,
                    source,
                });
            }
        }
        log.push(Event::public(format!(
            "{} is afflicted with {:?}",
            target.name, kind
        )));
    }

    /// End-of-turn recurring damage/regen, then decrement and expire.
    pub fn tick(&self, target: &mut Player, log: &mut EventLog) {
        if let Some(poison) = target.status_effects.get(&StatusKind::Poison).cloned() {
            let amount = poison.magnitude.floor().max(0.0) as u32;
            target.hp = target.hp.saturating_sub(amount);
            log.push(Event::private_pair(
                target.id,
                target.id,
                format!("{} takes {amount} poison damage", target.name),
                format!("You take {amount} poison damage"),
                format!("{} takes {amount} poison damage", target.name),
            ));
        }
        if let Some(regen) = target.status_effects.get(&StatusKind::Regen).cloned() {
            let amount = regen.magnitude.floor().max(0.0) as u32;
            target.hp = (target.hp + amount).min(target.max_hp);
        }

        let mut expired = Vec::new();
        for effect in target.status_effects.values_mut() {
            if effect.turns > 0 {
                effect.turns -= 1;
            }
            if effect.turns == 0 {
                expired.push(effect.kind);
            }
        }
        for kind in expired {
            target.status_effects.remove(&kind);
            log.push(Event::public(format!(
                "{}'s {:?} effect wears off",
                target.name, kind
            )));
        }
    }

    pub fn is_stunned(&self, player: &Player) -> bool {
        player.status_effects.contains_key(&StatusKind::Stunned)
    }

    pub fn is_invisible(&self, player: &Player) -> bool {
        player.status_effects.contains_key(&StatusKind::Invisible)
    }

    pub fn has_effect(&self, player: &Player, kind: StatusKind) -> bool {
        player.status_effects.contains_key(&kind)
    }

    /// Armor contribution from status effects (e.g. Shielded).
    pub fn armor_bonus(&self, player: &Player) -> f64 {
        player
            .status_effects
            .get(&StatusKind::Shielded)
            .map(|e| e.magnitude)
            .unwrap_or(0.0)
    }

    pub fn vulnerability_increase(&self, player: &Player) -> f64 {
        player
            .status_effects
            .get(&StatusKind::Vulnerable)
            .map(|e| e.magnitude)
            .unwrap_or(0.0)
    }

    pub fn weakened_reduction(&self, player: &Player) -> f64 {
        player
            .status_effects
            .get(&StatusKind::Weakened)
            .map(|e| e.magnitude)
            .unwrap_or(0.0)
    }

    /// Consumes the immune-next-damage flag if present. Returns true if it fired.
    pub fn consume_immunity(&self, player: &mut Player) -> bool {
        player
            .status_effects
            .remove(&StatusKind::ImmuneNextDamage)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;

    fn fresh_player() -> Player {
        Player::new(PlayerId::new(), "Test".to_string())
    }

    #[test]
    fn poison_stacks_add_magnitude_and_duration() {
        let mgr = StatusEffectManager;
        let mut log = EventLog::default();
        let mut p = fresh_player();
        mgr.apply(&mut p, StatusKind::Poison, 5.0, 2, None, &mut log);
        mgr.apply(&mut p, StatusKind::Poison, 3.0, 1, None, &mut log);
        let effect = p.status_effects.get(&StatusKind::Poison).unwrap();
        assert_eq!(effect.magnitude, 8.0);
        assert_eq!(effect.turns, 3);
    }

    #[test]
    fn stun_refreshes_rather_than_stacks() {
        let mgr = StatusEffectManager;
        let mut log = EventLog::default();
        let mut p = fresh_player();
        mgr.apply(&mut p, StatusKind::Stunned, 0.0, 1, None, &mut log);
        mgr.apply(&mut p, StatusKind::Stunned, 0.0, 3, None, &mut log);
        let effect = p.status_effects.get(&StatusKind::Stunned).unwrap();
        assert_eq!(effect.turns, 3);
    }

    #[test]
    fn tick_removes_expired_effects() {
        let mgr = StatusEffectManager;
        let mut log = EventLog::default();
        let mut p = fresh_player();
        mgr.apply(&mut p, StatusKind::Stunned, 0.0, 1, None, &mut log);
        mgr.tick(&mut p, &mut log);
        assert!(!mgr.is_stunned(&p));
    }

    #[test]
    fn poison_damage_applies_before_decrement() {
        let mgr = StatusEffectManager;
        let mut log = EventLog::default();
        let mut p = fresh_player();
        p.hp = 100;
        mgr.apply(&mut p, StatusKind::Poison, 10.0, 2, None, &mut log);
        mgr.tick(&mut p, &mut log);
        assert_eq!(p.hp, 90);
        assert_eq!(p.status_effects.get(&StatusKind::Poison).unwrap().turns, 1);
    }
}
