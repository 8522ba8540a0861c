//! Racial ability handlers and passive-racial initialization (spec §3.1,
//! §3.6 `usage: perGame|perRound|passive`).
//!
//! `perGame`/`perRound` racials are activated through `SubmitAction` with
//! `kind: racial` and go through `resolve`; `passive` racials never appear as
//! a submittable action and are wired up once, at `SelectCharacter` time, by
//! `init_racial_state`.

use rand::Rng;

use crate::catalog::Catalog;
use crate::combat::CombatSystem;
use crate::event::{Event, EventLog};
use crate::ids::PlayerId;
use crate::player::Player;
use crate::status_effect::StatusKind;

/// Wires up passive racial state once the player has chosen `race_id` (spec
/// §3.1 racial state fields: Stone Armor intact+value, Undying charge, Keen
/// Senses flag).
pub fn init_racial_state(player: &mut Player, race_id: &str) {
    match race_id {
        "rockhewn" => {
            player.racial.stone_armor_intact = true;
            player.racial.stone_armor_value = 3.0;
            player.racial.uses_remaining = 1;
        }
        "skeleton" => {
            player.racial.undying_available = true;
        }
        "human" => {
            player.racial.uses_remaining = 1;
        }
        "crestfallen" => {
            player.racial.keen_senses = true;
        }
        "kinfolk" => {
            player.racial.uses_remaining = 1;
        }
        _ => {}
    }
}

/// Resets `perRound` usage flags; called once per round (spec §4.1.1 step 9
/// analog, driven by the room resolver alongside cooldown ticking).
pub fn reset_per_round_usage(player: &mut Player) {
    player.racial.used_this_round = false;
}

/// Activates `racial_ability_id` for `actor_id`. Returns `true` on success so
/// the caller can apply usage accounting (spec §3.1: "uses decrement only on
/// successful activation").
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    players: &mut [Player],
    catalog: &Catalog,
    combat: &CombatSystem,
    actor_id: PlayerId,
    racial_ability_id: &str,
    target_id: Option<PlayerId>,
    rng: &mut impl Rng,
    log: &mut EventLog,
) -> bool {
    match racial_ability_id {
        "stone_resolve" => {
            let Some(actor) = players.iter_mut().find(|p| p.id == actor_id) else { return false };
            actor.status_effects.insert(
                StatusKind::ImmuneNextDamage,
                crate::status_effect::StatusEffect {
                    kind: StatusKind::ImmuneNextDamage,
                    turns: 1,
                    magnitude: 0.0,
                    source: Some(actor_id),
                },
            );
            log.push(Event::public(format!("{} steels themself with stone resolve", actor.name)));
            true
        }
        "blood_mend" => {
            let Some(recipient_id) = target_id.or(Some(actor_id)) else { return false };
            combat.apply_heal(players, catalog, actor_id, recipient_id, 12.0, false, log)
        }
        "adaptability" => {
            let Some(donor_id) = target_id else { return false };
            let borrowed = players
                .iter()
                .find(|p| p.id == donor_id)
                .and_then(|donor| donor.unlocked_abilities().next().cloned());
            let Some(borrowed) = borrowed else { return false };
            let Some(actor) = players.iter_mut().find(|p| p.id == actor_id) else { return false };
            actor.racial.adaptability_slot = Some(borrowed.id.clone());
            if !actor.abilities.iter().any(|a| a.id == borrowed.id) {
                actor.abilities.push(borrowed);
            }
            log.push(Event::public(format!("{} adapts a new technique", actor.name)));
            true
        }
        _ => {
            let _ = rng;
            false
        }
    }
}
