//! Maps an ability id to its handler (spec §2 `AbilityRegistry`, §4.1.2).

pub mod attack;
pub mod defense;
pub mod heal;
pub mod racial;
pub mod special;

use rand::Rng;

use crate::action::{Action, ActionKind, TargetRef};
use crate::catalog::types::AbilityCategory;
use crate::catalog::Catalog;
use crate::combat::CombatSystem;
use crate::coordination::CoordinationTracker;
use crate::event::EventLog;
use crate::monster::Monster;
use crate::monster_controller::MonsterController;
use crate::player::Player;
use crate::status_effect::StatusEffectManager;
use crate::warlock::WarlockSystem;

#[derive(Debug, Default)]
pub struct AbilityRegistry;

impl AbilityRegistry {
    /// Dispatches a single class action to its category handler (spec
    /// §4.1.2). Preconditions (alive, not stunned, unlocked, cooldown=0,
    /// valid target shape) must already be checked by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_class_action(
        &self,
        action: &Action,
        players: &mut [Player],
        monster: &mut Monster,
        catalog: &Catalog,
        combat: &CombatSystem,
        status_mgr: &StatusEffectManager,
        coordination: &CoordinationTracker,
        warlocks: &mut WarlockSystem,
        monster_controller: &MonsterController,
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) {
        debug_assert_eq!(action.kind, ActionKind::Class);
        let Some(ability) = players
            .iter()
            .find(|p| p.id == action.actor_id)
            .and_then(|p| p.ability(&action.ability_id))
            .cloned()
        else {
            return;
        };

        match ability.category {
            AbilityCategory::Attack => attack::resolve(
                players,
                monster,
                catalog,
                combat,
                status_mgr,
                coordination,
                warlocks,
                monster_controller,
                action.actor_id,
                &ability,
                action.target,
                rng,
                log,
            ),
            AbilityCategory::Heal => heal::resolve(players, catalog, combat, action.actor_id, &ability, action.target, log),
            AbilityCategory::Defense => defense::resolve(players, status_mgr, action.actor_id, &ability, log),
            AbilityCategory::Special => special::resolve(players, action.actor_id, &ability, log),
            AbilityCategory::Racial => {}
        }
    }

    /// Dispatches a racial action (spec §3.6 racial ability, looked up via
    /// the actor's chosen race rather than `player.abilities`, which only
    /// ever holds class abilities).
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_racial_action(
        &self,
        action: &Action,
        players: &mut [Player],
        catalog: &Catalog,
        combat: &CombatSystem,
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) -> bool {
        debug_assert_eq!(action.kind, ActionKind::Racial);
        let target_id = match action.target {
            TargetRef::Player(id) => Some(id),
            TargetRef::Monster => None,
        };
        racial::resolve(players, catalog, combat, action.actor_id, &action.ability_id, target_id, rng, log)
    }
}
