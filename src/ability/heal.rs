//! Heal-category ability handler (spec §4.1.2, §4.2 healing pipeline).

use crate::action::TargetRef;
use crate::catalog::types::{AbilityDef, TargetKind};
use crate::catalog::Catalog;
use crate::combat::CombatSystem;
use crate::event::EventLog;
use crate::ids::PlayerId;
use crate::player::Player;

pub fn resolve(
    players: &mut [Player],
    catalog: &Catalog,
    combat: &CombatSystem,
    actor_id: PlayerId,
    ability: &AbilityDef,
    target: TargetRef,
    log: &mut EventLog,
) {
    match ability.target {
        TargetKind::Single | TargetKind::SelfTarget => {
            let TargetRef::Player(target_id) = target else { return };
            combat.apply_heal(
                players,
                catalog,
                actor_id,
                target_id,
                ability.params.base_amount,
                ability.params.exclude_warlocks,
                log,
            );
        }
        TargetKind::Multi => {
            let recipient_ids: Vec<PlayerId> = players.iter().filter(|p| p.alive).map(|p| p.id).collect();
            for recipient_id in recipient_ids {
                combat.apply_heal(
                    players,
                    catalog,
                    actor_id,
                    recipient_id,
                    ability.params.base_amount,
                    ability.params.exclude_warlocks,
                    log,
                );
            }
        }
        TargetKind::Monster => {}
    }
}
