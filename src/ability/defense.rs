//! Defense-category ability handler: self-buffs — armor, shields, and
//! counter-attack class effects (spec §3.1 class-effect map, §4.1.2).

use crate::catalog::types::AbilityDef;
use crate::event::EventLog;
use crate::ids::PlayerId;
use crate::player::{ClassEffectKind, ClassEffectState, Player};
use crate::status_effect::StatusEffectManager;

pub fn resolve(
    players: &mut [Player],
    status_mgr: &StatusEffectManager,
    actor_id: PlayerId,
    ability: &AbilityDef,
    log: &mut EventLog,
) {
    let Some(actor) = players.iter_mut().find(|p| p.id == actor_id) else { return };

    if ability.params.armor_bonus > 0.0 {
        actor.effective_armor += ability.params.armor_bonus;
    }

    if let Some(kind) = ability.params.status {
        status_mgr.apply(
            actor,
            kind,
            ability.params.status_magnitude,
            ability.params.status_turns,
            Some(actor_id),
            log,
        );
    }

    if ability.params.counter_damage > 0.0 {
        actor.class_effects.insert(
            ClassEffectKind::SpiritGuard,
            ClassEffectState {
                magnitude: ability.params.counter_damage,
                turns: Some(ability.params.status_turns.max(1)),
            },
        );
        log.push(crate::event::Event::public(format!(
            "{} braces to counter-attack",
            actor.name
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{AbilityCategory, AbilityParams, TargetKind};
    use crate::status_effect::StatusKind;

    fn ability() -> AbilityDef {
        AbilityDef {
            id: "shield_wall".into(),
            name: "Shield Wall".into(),
            category: AbilityCategory::Defense,
            target: TargetKind::SelfTarget,
            unlock_at: 1,
            order: 50,
            cooldown: 3,
            params: AbilityParams {
                status: Some(StatusKind::Shielded),
                status_magnitude: 5.0,
                status_turns: 2,
                ..Default::default()
            },
        }
    }

    #[test]
    fn grants_shielded_status_to_self() {
        let mgr = StatusEffectManager;
        let mut log = EventLog::default();
        let mut players = vec![Player::new(PlayerId::new(), "Tank".into())];
        let actor_id = players[0].id;
        resolve(&mut players, &mgr, actor_id, &ability(), &mut log);
        assert!(players[0].status_effects.contains_key(&StatusKind::Shielded));
    }
}
