//! `ProcessRound`: the deterministic 13-step per-turn pipeline (spec
//! §4.1.1), run to completion without yielding once the room worker decides
//! the round is ready (spec §5).

use crate::action::Action;
use crate::event::{Event, EventLog};

use super::phase::{Phase, RoundPhase};
use super::win;
use super::Room;

/// Result of a single `ProcessRound` pass, handed to the bus as a
/// `RoundResult` (spec §6.1).
pub struct RoundResult {
    pub log: EventLog,
    pub turn: u64,
    pub level_up: Option<(u32, u32)>,
    pub winner: Option<win::Winner>,
}

impl Room {
    pub fn process_round(&mut self) -> RoundResult {
        let mut log = EventLog::default();
        let mut level_up = None;

        // Step 1: snapshot is implicit — actions were already buffered
        // during the Action phase; nothing further to collect here.
        let mut racial_actions: Vec<Action> = self.action_buffer.racial_actions().to_vec();
        let mut class_actions: Vec<Action> = self.action_buffer.class_actions().to_vec();

        // Step 2: racial passives/activations resolve first, in submission order.
        racial_actions.sort_by_key(|a| a.submitted_at);
        for action in &racial_actions {
            let succeeded = self.ability_registry.resolve_racial_action(
                action,
                &mut self.players,
                &self.catalog,
                &self.combat,
                &mut self.rng,
                &mut log,
            );
            if succeeded {
                if let Some(player) = self.player_mut(action.actor_id) {
                    player.racial.uses_remaining = player.racial.uses_remaining.saturating_sub(1);
                    player.racial.used_this_round = true;
                }
            }
        }

        // Step 3: sort class actions by (ability.order ASC, submittedAt ASC, actorId ASC).
        class_actions.sort_by(|a, b| {
            let order_a = self
                .player(a.actor_id)
                .and_then(|p| p.ability(&a.ability_id))
                .map(|ab| ab.order)
                .unwrap_or(u32::MAX);
            let order_b = self
                .player(b.actor_id)
                .and_then(|p| p.ability(&b.ability_id))
                .map(|ab| ab.order)
                .unwrap_or(u32::MAX);
            order_a
                .cmp(&order_b)
                .then(a.submitted_at.cmp(&b.submitted_at))
                .then(a.actor_id.cmp(&b.actor_id))
        });

        // Step 4: build the coordination tracker from every attack action.
        self.coordination.reset();
        for action in &class_actions {
            if let Some(ability) = self.player(action.actor_id).and_then(|p| p.ability(&action.ability_id)) {
                if ability.category == crate::catalog::types::AbilityCategory::Attack {
                    self.coordination.track(action.actor_id, action.target);
                }
            }
        }

        // Step 5: execute class actions in resolved order.
        for action in &class_actions {
            let cooldown = self.player(action.actor_id).and_then(|p| p.ability(&action.ability_id)).map(|a| a.cooldown);
            self.ability_registry.resolve_class_action(
                action,
                &mut self.players,
                &mut self.monster,
                &self.catalog,
                &self.combat,
                &self.status_mgr,
                &self.coordination,
                &mut self.warlocks,
                &self.monster_controller,
                &mut self.rng,
                &mut log,
            );
            // Submission already validated unlocked/cooldown=0/target shape, so
            // dispatch always counts as the "successful activation" the
            // cooldown law (spec §4.1.2) rearms against.
            if let Some(cooldown) = cooldown {
                if let Some(player) = self.player_mut(action.actor_id) {
                    player.set_cooldown_after_use(&action.ability_id, cooldown);
                }
            }
        }

        // Step 6: monster turn.
        self.monster_controller.attack(
            &self.monster,
            &mut self.players,
            &self.catalog,
            &mut self.warlocks,
            &mut self.rng,
            &mut log,
        );

        // Step 7: process pending deaths.
        self.combat.resolve_pending_deaths(&mut self.players, &mut self.warlocks, &mut log);

        // Step 8: tick status effects.
        for player in self.players.iter_mut() {
            self.status_mgr.tick(player, &mut log);
        }

        // Step 9: tick cooldowns, reset per-round racial usage.
        for player in self.players.iter_mut() {
            player.tick_cooldowns();
            crate::ability::racial::reset_per_round_usage(player);
        }

        // Step 10: monster respawn / level-up.
        if !self.monster.is_alive() {
            let old_level = self.level;
            self.level += 1;
            let new_level = self.level;
            level_up = Some((old_level, new_level));
            let monster_balance = &self.catalog.balance.monster;
            for player in self.players.iter_mut() {
                if !player.alive {
                    continue;
                }
                player.level = new_level;
                player.max_hp += (monster_balance.level_up_hp_increment).floor().max(0.0) as u32;
                player.damage_mod += monster_balance.level_up_damage_increment;
                player.effective_armor += monster_balance.level_up_armor_increment;
                if monster_balance.full_heal_on_level_up {
                    player.hp = player.max_hp;
                }
            }
            self.monster_controller.respawn(&mut self.monster, &self.catalog.balance.monster, new_level);
            log.push(Event::public(format!("The party reaches level {new_level}!")));
        }

        // Step 11: evaluate win conditions.
        let winner = win::evaluate(&self.players, self.catalog.balance.warlock.win_conditions.majority_threshold);
        if let Some(w) = winner {
            self.winner = Some(w);
            self.phase = Phase::Ended;
        } else {
            self.phase = Phase::Active(RoundPhase::Action);
        }

        // Step 12/13: clear buffers, advance turn.
        self.action_buffer.clear();
        self.coordination.reset();
        self.turn += 1;

        RoundResult { log, turn: self.turn, level_up, winner }
    }
}
