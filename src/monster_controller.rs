//! Monster targeting, attack resolution, and respawn/level-up (spec §4.5).

use rand::Rng;

use crate::catalog::types::MonsterBalance;
use crate::combat::CombatSystem;
use crate::event::{Event, EventLog};
use crate::ids::PlayerId;
use crate::monster::Monster;
use crate::player::Player;
use crate::warlock::WarlockSystem;

#[derive(Debug, Default)]
pub struct MonsterController {
    combat: CombatSystem,
}

impl MonsterController {
    /// Picks a target (prefers lowest-HP visible alive player) and applies
    /// damage; misses if no visible alive target exists (spec §4.1.1 step 6,
    /// §4.5 `Attack`).
    pub fn attack(
        &self,
        monster: &Monster,
        players: &mut [Player],
        catalog: &crate::catalog::Catalog,
        warlocks: &mut WarlockSystem,
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) {
        if !monster.is_alive() {
            return;
        }
        let target_id = self.select_target(players);
        let Some(target_id) = target_id else {
            log.push(Event::public("The monster swings at shadows and hits nothing"));
            return;
        };

        let damage = monster.next_damage(&catalog.balance.monster);
        // The monster has no Player entity to read damage_mod/coordination
        // from, so apply its hit directly rather than through CombatSystem's
        // attacker-centric pipeline.
        if let Some(target) = players.iter_mut().find(|p| p.id == target_id) {
            let effective_armor = target.effective_armor;
            let mitigated = (damage * (1.0 - (catalog.balance.armor.reduction_per_point * effective_armor)
                .min(catalog.balance.armor.max_reduction)))
                .floor()
                .max(0.0) as u32;
            target.take_damage_raw(mitigated);
            target.stats.monster_damage += mitigated as u64;
            let target_name = target.name.clone();
            if target.hp == 0 && target.alive {
                target.pending_death = true;
                target.death_attacker = None;
            }
            log.push(Event::private_pair(
                target_id,
                target_id,
                format!("The monster lashes out at {target_name} for {mitigated} damage"),
                String::new(),
                format!("The monster lashes out at you for {mitigated} damage"),
            ));
        }
        let _ = &self.combat;
        let _ = warlocks;
    }

    /// Lowest-HP visible alive player, ties broken by player id (spec §4.5).
    fn select_target(&self, players: &[Player]) -> Option<PlayerId> {
        players
            .iter()
            .filter(|p| p.alive && !p.status_effects.contains_key(&crate::status_effect::StatusKind::Invisible))
            .min_by(|a, b| a.hp.cmp(&b.hp).then(a.id.cmp(&b.id)))
            .map(|p| p.id)
    }

    pub fn take_damage(&self, monster: &mut Monster, amount: u32, log: &mut EventLog) {
        monster.hp = monster.hp.saturating_sub(amount);
        if monster.hp == 0 {
            log.push(Event::public("The monster is destroyed!"));
        }
    }

    /// Respawns at `new_level` with recomputed `maxHp`, full HP, and reset
    /// age (spec §4.5 `Respawn`).
    pub fn respawn(&self, monster: &mut Monster, balance: &MonsterBalance, new_level: u32) {
        *monster = Monster::spawn(balance, new_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player(name: &str, hp: u32) -> Player {
        let mut p = Player::new(PlayerId::new(), name.to_string());
        p.hp = hp;
        p
    }

    #[test]
    fn targets_lowest_hp_alive_player() {
        let catalog = Catalog::default_catalog();
        let mut warlocks = WarlockSystem::default();
        let monster = Monster::spawn(&catalog.balance.monster, 1);
        let controller = MonsterController::default();
        let mut log = EventLog::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut players = vec![player("High", 90), player("Low", 10)];
        let low_id = players[1].id;
        controller.attack(&monster, &mut players, &catalog, &mut warlocks, &mut rng, &mut log);
        let low = players.iter().find(|p| p.id == low_id).unwrap();
        assert!(low.hp < 10);
    }

    #[test]
    fn misses_when_all_targets_invisible() {
        let catalog = Catalog::default_catalog();
        let mut warlocks = WarlockSystem::default();
        let monster = Monster::spawn(&catalog.balance.monster, 1);
        let controller = MonsterController::default();
        let mut log = EventLog::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut players = vec![player("Ghost", 90)];
        players[0].status_effects.insert(
            crate::status_effect::StatusKind::Invisible,
            crate::status_effect::StatusEffect {
                kind: crate::status_effect::StatusKind::Invisible,
                turns: 1,
                magnitude: 0.0,
                source: None,
            },
        );
        controller.attack(&monster, &mut players, &catalog, &mut warlocks, &mut rng, &mut log);
        assert_eq!(players[0].hp, 90);
    }

    #[test]
    fn respawn_resets_age_and_recomputes_max_hp() {
        let catalog = Catalog::default_catalog();
        let controller = MonsterController::default();
        let mut monster = Monster::spawn(&catalog.balance.monster, 1);
        monster.age = 5;
        monster.hp = 0;
        controller.respawn(&mut monster, &catalog.balance.monster, 2);
        assert_eq!(monster.age, 0);
        assert_eq!(monster.hp, monster.max_hp);
        assert!(monster.max_hp > Monster::spawn(&catalog.balance.monster, 1).max_hp);
    }
}
