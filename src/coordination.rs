//! Tracks which attackers targeted the same entity this round, for the
//! coordination damage bonus (spec §4.1.1 step 4, §4.7).

use std::collections::{HashMap, HashSet};

use crate::action::TargetRef;
use crate::catalog::CoordinationBalance;
use crate::ids::PlayerId;

#[derive(Debug, Default)]
pub struct CoordinationTracker {
    attackers_by_target: HashMap<TargetRef, HashSet<PlayerId>>,
}

impl CoordinationTracker {
    pub fn track(&mut self, attacker: PlayerId, target: TargetRef) {
        self.attackers_by_target
            .entry(target)
            .or_default()
            .insert(attacker);
    }

    /// Number of *other* attackers on `target` besides `self_id`.
    pub fn count_others_on(&self, target: TargetRef, self_id: PlayerId) -> usize {
        self.attackers_by_target
            .get(&target)
            .map(|set| set.iter().filter(|a| **a != self_id).count())
            .unwrap_or(0)
    }

    /// `min(maxBonus, bonusPerAttacker * others)` (spec §4.7).
    pub fn bonus_for(&self, self_id: PlayerId, target: TargetRef, balance: &CoordinationBalance) -> f64 {
        let others = self.count_others_on(target, self_id) as f64;
        (balance.bonus_per_attacker * others).min(balance.max_bonus)
    }

    pub fn reset(&mut self) {
        self.attackers_by_target.clear();
    }
}
