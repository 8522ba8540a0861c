//! Hidden-role conversion subsystem (spec §4.3).
//!
//! `num_warlocks` is the process of truth: it is only ever updated through
//! `increment`/`decrement`, never derived by rescanning players, so a
//! counter desync would show up immediately as a failed property-test
//! invariant (spec §8 property 2) rather than silently drifting.

use rand::Rng;

use crate::catalog::WarlockBalance;
use crate::event::{Event, EventKind, EventLog};
use crate::ids::PlayerId;
use crate::player::Player;

#[derive(Debug, Default)]
pub struct WarlockSystem {
    num_warlocks: u32,
}

impl WarlockSystem {
    pub fn num_warlocks(&self) -> u32 {
        self.num_warlocks
    }

    /// Picks `preferred` if present and alive, else a uniform random alive
    /// player, and assigns the warlock flag (spec §4.3).
    pub fn assign_initial_warlock(
        &mut self,
        players: &mut [Player],
        preferred: Option<PlayerId>,
        rng: &mut impl Rng,
    ) -> Option<PlayerId> {
        let chosen = preferred
            .filter(|id| players.iter().any(|p| p.id == *id && p.alive))
            .or_else(|| {
                let alive: Vec<PlayerId> = players.iter().filter(|p| p.alive).map(|p| p.id).collect();
                if alive.is_empty() {
                    None
                } else {
                    Some(alive[rng.random_range(0..alive.len())])
                }
            })?;

        if let Some(p) = players.iter_mut().find(|p| p.id == chosen) {
            p.set_warlock();
            self.num_warlocks += 1;
        }
        Some(chosen)
    }

    /// Attempts to convert `target` (or a random non-warlock if `None`) into
    /// a warlock under `attacker`'s influence (spec §4.3).
    pub fn attempt_conversion(
        &mut self,
        players: &mut [Player],
        attacker: PlayerId,
        target: Option<PlayerId>,
        balance: &WarlockBalance,
        modifier: f64,
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) {
        let attacker_is_warlock = players.iter().any(|p| p.id == attacker && p.is_warlock);
        if !attacker_is_warlock {
            return;
        }

        let alive_count = players.iter().filter(|p| p.alive).count().max(1);
        let target_id = match target {
            Some(id) => id,
            None => {
                let candidates: Vec<PlayerId> = players
                    .iter()
                    .filter(|p| p.alive && !p.is_warlock && p.id != attacker)
                    .map(|p| p.id)
                    .collect();
                if candidates.is_empty() {
                    return;
                }
                candidates[rng.random_range(0..candidates.len())]
            }
        };

        let already_warlock = players
            .iter()
            .find(|p| p.id == target_id)
            .map(|p| p.is_warlock)
            .unwrap_or(true);
        if already_warlock {
            return;
        }

        let chance = (balance.conversion.base_chance
            + balance.conversion.scaling_factor * (self.num_warlocks as f64 / alive_count as f64))
            .min(balance.conversion.max_chance)
            * modifier
            * (1.0 + rng.random::<f64>() * balance.conversion.random_modifier);

        let roll: f64 = rng.random();
        if roll < chance {
            self.force_convert(players, target_id, log);
            if let Some(attacker_mut) = players.iter_mut().find(|p| p.id == attacker) {
                attacker_mut.stats.corruptions += 1;
            }
        }
    }

    /// Deterministic conversion, used by scripted effects and internally by
    /// `attempt_conversion` on success (spec §4.3).
    pub fn force_convert(&mut self, players: &mut [Player], target: PlayerId, log: &mut EventLog) {
        if let Some(p) = players.iter_mut().find(|p| p.id == target) {
            if p.is_warlock {
                return;
            }
            p.set_warlock();
            self.num_warlocks += 1;
            log.push(
                Event::private_pair(
                    target,
                    target,
                    "Another hero has fallen to the shadows",
                    "You feel a dark power take hold of you",
                    "You feel a dark power take hold of you",
                )
                .with_kind(EventKind::Corruption),
            );
        }
    }

    /// Called once per warlock death (spec §4.3); clamped at zero.
    pub fn decrement_warlock_count(&mut self) {
        self.num_warlocks = self.num_warlocks.saturating_sub(1);
    }

    /// Strict majority: exact half does not win (spec §4.3, §9 open question).
    pub fn are_warlocks_winning(&self, players: &[Player], majority_threshold: f64) -> bool {
        let alive_warlocks = players.iter().filter(|p| p.alive && p.is_warlock).count() as f64;
        let alive_total = players.iter().filter(|p| p.alive).count() as f64;
        if alive_total == 0.0 {
            return false;
        }
        alive_warlocks * majority_threshold > alive_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PlayerId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player() -> Player {
        Player::new(PlayerId::new(), "P".into())
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut sys = WarlockSystem::default();
        sys.decrement_warlock_count();
        assert_eq!(sys.num_warlocks(), 0);
    }

    #[test]
    fn force_convert_flips_the_flag_and_bumps_the_count() {
        let mut players = vec![player(), player(), player()];
        let charlie = players[2].id;
        let alice = players[0].id;
        players[2].set_warlock();
        let mut sys = WarlockSystem { num_warlocks: 1 };
        let mut log = EventLog::default();
        sys.force_convert(&mut players, alice, &mut log);
        assert_eq!(sys.num_warlocks(), 2);
        assert!(players.iter().find(|p| p.id == alice).unwrap().is_warlock);
        let _ = charlie;
    }

    #[test]
    fn attempt_conversion_hits_the_formula_chance_over_many_rolls() {
        let balance = WarlockBalance {
            conversion: crate::catalog::ConversionBalance {
                base_chance: 0.3,
                max_chance: 0.5,
                scaling_factor: 0.0,
                aoe_modifier: 0.5,
                random_modifier: 0.0,
            },
            reject_warlock_healing: true,
            win_conditions: crate::catalog::WarlockWinConditions { majority_threshold: 2.0 },
        };
        // scaling_factor and random_modifier are both zeroed so the roll is
        // checked against a fixed chance of exactly base_chance.
        let expected_chance = 0.3;
        let mut rng = StdRng::seed_from_u64(7);
        let mut log = EventLog::default();
        let trials = 4000;
        let mut conversions = 0;
        for _ in 0..trials {
            let mut players = vec![player(), player()];
            let attacker = players[0].id;
            let target = players[1].id;
            players[0].set_warlock();
            let mut sys = WarlockSystem { num_warlocks: 1 };
            sys.attempt_conversion(&mut players, attacker, Some(target), &balance, 1.0, &mut rng, &mut log);
            if players.iter().find(|p| p.id == target).unwrap().is_warlock {
                conversions += 1;
                assert_eq!(sys.num_warlocks(), 2);
                let attacker_stats = &players.iter().find(|p| p.id == attacker).unwrap().stats;
                assert_eq!(attacker_stats.corruptions, 1);
            } else {
                assert_eq!(sys.num_warlocks(), 1);
            }
        }
        let empirical_rate = conversions as f64 / trials as f64;
        assert!(
            (empirical_rate - expected_chance).abs() < 0.03,
            "empirical conversion rate {empirical_rate} too far from formula chance {expected_chance}"
        );
    }

    #[test]
    fn strict_majority_required_to_win() {
        let mut players = vec![player(), player()];
        players[0].set_warlock();
        let sys = WarlockSystem { num_warlocks: 1 };
        // 1 warlock out of 2 alive: 1*2 > 2 is false (exact half doesn't win).
        assert!(!sys.are_warlocks_winning(&players, 2.0));
        players[1].set_warlock();
        let sys = WarlockSystem { num_warlocks: 2 };
        assert!(sys.are_warlocks_winning(&players, 2.0));
    }
}
