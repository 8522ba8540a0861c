//! Special-category ability handler: named class effects that don't fit the
//! generic attack/heal/defense shapes (Sanctuary of Truth, Thirsty Blade —
//! spec §3.1).
//!
//! Dispatch is by ability id rather than a dedicated catalog field: the
//! catalog's `AbilityParams` carries only generic numeric knobs, so a
//! handful of named specials read the knob that matches their flavor
//! (`counterDamage` for Sanctuary's counter-attack, `baseAmount` as the
//! lifesteal fraction for Thirsty Blade).

use crate::catalog::types::AbilityDef;
use crate::event::{Event, EventLog};
use crate::ids::PlayerId;
use crate::player::{ClassEffectKind, ClassEffectState, Player};

pub fn resolve(players: &mut [Player], actor_id: PlayerId, ability: &AbilityDef, log: &mut EventLog) {
    let Some(actor) = players.iter_mut().find(|p| p.id == actor_id) else { return };

    match ability.id.as_str() {
        "sanctuary_of_truth" => {
            actor.class_effects.insert(
                ClassEffectKind::SanctuaryOfTruth,
                ClassEffectState {
                    magnitude: ability.params.counter_damage,
                    turns: None,
                },
            );
            log.push(Event::public(format!("{} wards themself with a sanctuary of truth", actor.name)));
        }
        "thirsty_blade" => {
            actor.class_effects.insert(
                ClassEffectKind::ThirstyBlade,
                ClassEffectState {
                    magnitude: ability.params.base_amount,
                    turns: None,
                },
            );
            log.push(Event::public(format!("{}'s blade thirsts for blood", actor.name)));
        }
        _ => {}
    }
}

/// Applies Thirsty Blade lifesteal after a successful hit (spec §4.2 step 7
/// analog for class effects not covered by CombatSystem's counter-attack
/// path). Called by the attack handler once damage has landed.
pub fn apply_lifesteal(players: &mut [Player], actor_id: PlayerId, damage_dealt: u32) {
    let Some(actor) = players.iter_mut().find(|p| p.id == actor_id) else { return };
    if let Some(effect) = actor.class_effects.get(&ClassEffectKind::ThirstyBlade) {
        let healed = (damage_dealt as f64 * effect.magnitude).floor().max(0.0) as u32;
        actor.heal_raw(healed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{AbilityCategory, AbilityParams, TargetKind};

    #[test]
    fn thirsty_blade_grants_lifesteal_class_effect() {
        let mut log = EventLog::default();
        let mut players = vec![Player::new(PlayerId::new(), "Duelist".into())];
        let actor_id = players[0].id;
        let ability = AbilityDef {
            id: "thirsty_blade".into(),
            name: "Thirsty Blade".into(),
            category: AbilityCategory::Special,
            target: TargetKind::SelfTarget,
            unlock_at: 1,
            order: 40,
            cooldown: 4,
            params: AbilityParams { base_amount: 0.3, ..Default::default() },
        };
        resolve(&mut players, actor_id, &ability, &mut log);
        assert!(players[0].class_effects.contains_key(&ClassEffectKind::ThirstyBlade));
    }
}
