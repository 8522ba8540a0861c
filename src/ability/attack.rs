//! Attack-category ability handler (spec §4.1.2, §4.2).

use rand::Rng;

use crate::ability::special;
use crate::action::TargetRef;
use crate::catalog::types::{AbilityDef, TargetKind};
use crate::catalog::Catalog;
use crate::combat::CombatSystem;
use crate::coordination::CoordinationTracker;
use crate::event::EventLog;
use crate::ids::PlayerId;
use crate::monster::Monster;
use crate::monster_controller::MonsterController;
use crate::player::Player;
use crate::status_effect::StatusEffectManager;
use crate::warlock::WarlockSystem;

/// Applies `ability` from `actor_id` to `target`. `target` has already been
/// validated against `ability.target` shape by the caller (spec §4.1.2
/// preconditions).
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    players: &mut [Player],
    monster: &mut Monster,
    catalog: &Catalog,
    combat: &CombatSystem,
    status_mgr: &StatusEffectManager,
    coordination: &CoordinationTracker,
    warlocks: &mut WarlockSystem,
    monster_controller: &MonsterController,
    actor_id: PlayerId,
    ability: &AbilityDef,
    target: TargetRef,
    rng: &mut impl Rng,
    log: &mut EventLog,
) {
    match ability.target {
        TargetKind::Monster => {
            if target != TargetRef::Monster {
                return;
            }
            strike_monster(players, monster, catalog, coordination, monster_controller, actor_id, ability, log);
        }
        TargetKind::Single => {
            let TargetRef::Player(target_id) = target else { return };
            strike_player(
                players, catalog, combat, status_mgr, coordination, warlocks, actor_id, ability, target_id, false,
                rng, log,
            );
        }
        TargetKind::Multi => {
            let victim_ids: Vec<PlayerId> =
                players.iter().filter(|p| p.alive && p.id != actor_id).map(|p| p.id).collect();
            for victim_id in victim_ids {
                strike_player(
                    players, catalog, combat, status_mgr, coordination, warlocks, actor_id, ability, victim_id, true,
                    rng, log,
                );
            }
        }
        TargetKind::SelfTarget => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn strike_monster(
    players: &[Player],
    monster: &mut Monster,
    catalog: &Catalog,
    coordination: &CoordinationTracker,
    monster_controller: &MonsterController,
    actor_id: PlayerId,
    ability: &AbilityDef,
    log: &mut EventLog,
) {
    let Some(actor) = players.iter().find(|p| p.id == actor_id) else { return };
    let bonus = coordination.bonus_for(actor_id, TargetRef::Monster, &catalog.balance.coordination);
    let amount = (ability.params.base_amount * actor.damage_mod * (1.0 + bonus)).floor().max(0.0) as u32;
    monster_controller.take_damage(monster, amount, log);
}

#[allow(clippy::too_many_arguments)]
fn strike_player(
    players: &mut [Player],
    catalog: &Catalog,
    combat: &CombatSystem,
    status_mgr: &StatusEffectManager,
    coordination: &CoordinationTracker,
    warlocks: &mut WarlockSystem,
    actor_id: PlayerId,
    ability: &AbilityDef,
    target_id: PlayerId,
    aoe: bool,
    rng: &mut impl Rng,
    log: &mut EventLog,
) {
    let bonus = coordination.bonus_for(actor_id, TargetRef::Player(target_id), &catalog.balance.coordination);
    let Some(damage_dealt) = combat.apply_damage(
        players,
        catalog,
        warlocks,
        actor_id,
        target_id,
        ability.params.base_amount,
        bonus,
        aoe,
        rng,
        log,
    ) else {
        return;
    };
    special::apply_lifesteal(players, actor_id, damage_dealt);
    if let Some(kind) = ability.params.status {
        if let Some(target) = players.iter_mut().find(|p| p.id == target_id) {
            if target.alive {
                status_mgr.apply(
                    target,
                    kind,
                    ability.params.status_magnitude,
                    ability.params.status_turns,
                    Some(actor_id),
                    log,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{AbilityCategory, AbilityParams};
    use crate::ids::PlayerId;
    use crate::monster_controller::MonsterController;
    use crate::player::{ClassEffectKind, ClassEffectState, Player};
    use crate::warlock::WarlockSystem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn thirsty_blade_heals_the_attacker_on_a_landed_hit() {
        let catalog = Catalog::default_catalog();
        let combat = CombatSystem::default();
        let status_mgr = StatusEffectManager;
        let coordination = CoordinationTracker::default();
        let monster_controller = MonsterController::default();
        let mut warlocks = WarlockSystem::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut log = EventLog::default();
        let mut monster = crate::monster::Monster::spawn(&catalog.balance.monster, 1);

        let mut players = vec![Player::new(PlayerId::new(), "Duelist".into()), Player::new(PlayerId::new(), "Target".into())];
        players[0].hp = 50;
        players[0]
            .class_effects
            .insert(ClassEffectKind::ThirstyBlade, ClassEffectState { magnitude: 0.5, turns: None });
        let actor_id = players[0].id;
        let target_id = players[1].id;

        let ability = AbilityDef {
            id: "backstab".into(),
            name: "Backstab".into(),
            category: AbilityCategory::Attack,
            target: TargetKind::Single,
            unlock_at: 1,
            order: 10,
            cooldown: 2,
            params: AbilityParams { base_amount: 40.0, ..Default::default() },
        };

        resolve(
            &mut players,
            &mut monster,
            &catalog,
            &combat,
            &status_mgr,
            &coordination,
            &mut warlocks,
            &monster_controller,
            actor_id,
            &ability,
            TargetRef::Player(target_id),
            &mut rng,
            &mut log,
        );

        // 40 damage landed, lifesteal magnitude 0.5 -> heals 20.
        assert_eq!(players[0].hp, 70);
    }
}
