//! Orchestrates damage/heal application: counter-attacks, immunity, Stone
//! Armor degradation, pending (delayed) death, conversion hook, Keen Senses
//! hook (spec §4.2).
//!
//! Mirrors `DamageCalculator` being a pure function and `CombatSystem` being
//! the side-effecting orchestrator around it: no two `Player`s ever hold a
//! live reference to each other (design note §9), so every multi-party step
//! here reads primitive fields out of one player before taking a mutable
//! borrow of another.

use std::collections::HashMap;

use rand::Rng;

use crate::action::TargetRef;
use crate::catalog::Catalog;
use crate::damage::{self, DamageInputs};
use crate::event::{Event, EventLog};
use crate::ids::PlayerId;
use crate::player::{ClassEffectKind, Player};
use crate::status_effect::StatusEffectManager;
use crate::template;
use crate::warlock::WarlockSystem;

fn find<'a>(players: &'a [Player], id: PlayerId) -> Option<&'a Player> {
    players.iter().find(|p| p.id == id)
}

fn find_mut<'a>(players: &'a mut [Player], id: PlayerId) -> Option<&'a mut Player> {
    players.iter_mut().find(|p| p.id == id)
}

fn render_pair(
    catalog: &Catalog,
    template_key: &str,
    attacker_name: &str,
    target_name: &str,
    amount: u32,
) -> (String, Option<String>, Option<String>) {
    let mut values = HashMap::new();
    values.insert("attacker", attacker_name.to_string());
    values.insert("target", target_name.to_string());
    values.insert("amount", amount.to_string());
    match catalog.template(template_key) {
        Some(tpl) => template::render_event(tpl, &values),
        None => (format!("{attacker_name} hits {target_name} for {amount}"), None, None),
    }
}

#[derive(Debug, Default)]
pub struct CombatSystem {
    status_mgr: StatusEffectManager,
}

impl CombatSystem {
    /// Applies a single hit from `attacker_id` to `target_id` (spec §4.2
    /// steps 1–9). Returns the damage that landed, or `None` if it was
    /// absorbed by immunity.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_damage(
        &self,
        players: &mut [Player],
        catalog: &Catalog,
        warlocks: &mut WarlockSystem,
        attacker_id: PlayerId,
        target_id: PlayerId,
        base_damage: f64,
        coordination_bonus: f64,
        aoe: bool,
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) -> Option<u32> {
        let attacker = find(players, attacker_id)?;
        let attacker_damage_mod = attacker.damage_mod;
        let attacker_name = attacker.name.clone();
        let attacker_is_warlock = attacker.is_warlock;

        let target = find_mut(players, target_id)?;
        let target_name = target.name.clone();

        // Step 1: immunity short-circuit (Stone Resolve).
        if self.status_mgr.consume_immunity(target) {
            let (public, _, target_text) = render_pair(catalog, "immunity", &attacker_name, &target_name, 0);
            log.push(
                Event::private_pair(attacker_id, target_id, public, String::new(), target_text.unwrap_or_default())
                    .with_kind(crate::event::EventKind::Immunity),
            );
            return None;
        }

        // Steps 2–3: modifier stack + armor mitigation.
        let vulnerability_increase = self.status_mgr.vulnerability_increase(target);
        let effective_armor = target.effective_armor + self.status_mgr.armor_bonus(target);
        let final_damage = damage::calculate(
            DamageInputs {
                base_damage,
                attacker_damage_mod,
                coordination_bonus,
                target_vulnerability_increase: vulnerability_increase,
                target_effective_armor: effective_armor,
            },
            &catalog.balance.armor,
        );

        // Step 4: apply.
        target.take_damage_raw(final_damage);

        let (public, attacker_text, target_text) =
            render_pair(catalog, "damage", &attacker_name, &target_name, final_damage);
        log.push(Event::public_pair(
            attacker_id,
            target_id,
            public,
            attacker_text.unwrap_or_default(),
            target_text.unwrap_or_default(),
        ));

        // Step 5: Stone Armor degradation.
        if target.racial.stone_armor_intact {
            target.racial.stone_armor_value -= 1.0;
            if target.racial.stone_armor_value <= 0.0 {
                target.racial.stone_armor_intact = false;
                target.effective_armor = target.base_armor;
            }
            let (public, _, target_text) =
                render_pair(catalog, "stone_armor_degrade", &attacker_name, &target_name, 0);
            log.push(Event::private_pair(
                attacker_id,
                target_id,
                public,
                String::new(),
                target_text.unwrap_or_default(),
            ));
        }

        // Step 6: flag pending death rather than killing in place.
        if target.hp == 0 && target.alive {
            target.pending_death = true;
            target.death_attacker = Some(attacker_id);
        }

        let target_alive_post_hit = target.alive && !target.pending_death;
        let target_has_spirit_guard = target.class_effects.contains_key(&ClassEffectKind::SpiritGuard);
        let target_has_sanctuary = target.class_effects.contains_key(&ClassEffectKind::SanctuaryOfTruth);
        let target_warlock_after = target.is_warlock;

        if let Some(attacker_mut) = find_mut(players, attacker_id) {
            attacker_mut.stats.damage_dealt += final_damage as u64;
        }

        // Step 7: counter-attacks.
        if target_has_spirit_guard || target_has_sanctuary {
            let counter_damage = find(players, target_id)
                .and_then(|t| t.class_effects.get(&ClassEffectKind::SpiritGuard).or_else(|| {
                    t.class_effects.get(&ClassEffectKind::SanctuaryOfTruth)
                }))
                .map(|e| e.magnitude)
                .unwrap_or(0.0);
            if let Some(attacker_mut) = find_mut(players, attacker_id) {
                attacker_mut.take_damage_raw(counter_damage.floor().max(0.0) as u32);
                log.push(Event::public(format!(
                    "{} is struck by a counter-attack for {} damage",
                    attacker_mut.name, counter_damage as u32
                )));
            }
            if target_has_sanctuary && attacker_is_warlock {
                log.push(Event::private_pair(
                    attacker_id,
                    target_id,
                    format!("{target_name} senses something foul about {attacker_name}"),
                    String::new(),
                    format!("{attacker_name} is revealed to you as a warlock"),
                ));
            }
        }

        // Step 8: warlock conversion attempt.
        if attacker_is_warlock && !target_warlock_after && target_alive_post_hit {
            let modifier = if aoe { catalog.balance.warlock.conversion.aoe_modifier } else { 1.0 };
            warlocks.attempt_conversion(
                players,
                attacker_id,
                Some(target_id),
                &catalog.balance.warlock,
                modifier,
                rng,
                log,
            );
        }

        // Step 9: Keen Senses passive reveal hook.
        if let Some(attacker_ref) = find(players, attacker_id) {
            if attacker_ref.racial.keen_senses {
                if let Some(target_ref) = find(players, target_id) {
                    if target_ref.is_warlock {
                        let (public, attacker_text, _) =
                            render_pair(catalog, "keen_senses_reveal", &attacker_name, &target_name, 0);
                        log.push(Event::private_pair(
                            attacker_id,
                            target_id,
                            public,
                            attacker_text.unwrap_or_default(),
                            String::new(),
                        ));
                    }
                }
            }
        }

        Some(final_damage)
    }

    /// Healing pipeline (spec §4.2): `floor(base * healingMod)`, gated by the
    /// warlock-self-heal-only policy and `excludeWarlocks` for AoE heals.
    pub fn apply_heal(
        &self,
        players: &mut [Player],
        catalog: &Catalog,
        healer_id: PlayerId,
        target_id: PlayerId,
        base_amount: f64,
        exclude_warlocks: bool,
        log: &mut EventLog,
    ) -> bool {
        let Some(healer) = find(players, healer_id) else { return false };
        let healer_damage_mod = healer.damage_mod;
        let healer_name = healer.name.clone();
        let healer_is_warlock = healer.is_warlock;

        let Some(target) = find_mut(players, target_id) else { return false };

        if !target.alive {
            return false;
        }
        if target.is_warlock && exclude_warlocks && healer_id != target_id {
            return false;
        }
        if healer_is_warlock && catalog.balance.warlock.reject_warlock_healing && healer_id != target_id {
            return false;
        }

        let target_name = target.name.clone();
        let amount = damage::calculate_healing(base_amount, healer_damage_mod);
        target.heal_raw(amount);

        if let Some(healer_mut) = find_mut(players, healer_id) {
            healer_mut.stats.healing_done += amount as u64;
        }

        let (public, attacker_text, target_text) =
            render_pair(catalog, "heal", &healer_name, &target_name, amount);
        log.push(Event::public_pair(
            healer_id,
            target_id,
            public,
            attacker_text.unwrap_or_default(),
            target_text.unwrap_or_default(),
        ));
        true
    }

    /// Resolves every player flagged `pendingDeath` (spec §4.1.1 step 7):
    /// Undying consumes its charge and revives at 1 HP, otherwise the player
    /// is finalized dead and the warlock count is decremented if applicable.
    pub fn resolve_pending_deaths(&self, players: &mut [Player], warlocks: &mut WarlockSystem, log: &mut EventLog) {
        let mut killers: Vec<PlayerId> = Vec::new();
        for player in players.iter_mut() {
            if !player.pending_death {
                continue;
            }
            player.pending_death = false;
            if player.racial.undying_available {
                player.racial.undying_available = false;
                player.hp = 1;
                log.push(Event::public(format!("{} clings to unlife and rises again", player.name)));
            } else {
                player.alive = false;
                let was_warlock = player.is_warlock;
                player.clear_warlock_on_death();
                if was_warlock {
                    warlocks.decrement_warlock_count();
                }
                if let Some(killer_id) = player.death_attacker {
                    killers.push(killer_id);
                }
                log.push(Event::public(format!("{} has fallen", player.name)));
            }
        }
        for killer_id in killers {
            if let Some(killer) = find_mut(players, killer_id) {
                killer.stats.kills += 1;
            }
        }
    }

    pub fn target_ref_of(&self, target_id: PlayerId) -> TargetRef {
        TargetRef::Player(target_id)
    }
}
