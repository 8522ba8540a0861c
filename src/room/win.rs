//! Win-condition evaluation (spec §4.4), run after pending-death processing
//! and before the round result is emitted.

use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Good,
    Evil,
}

/// Returns `None` while the game continues, otherwise the side that won.
/// Order mirrors §4.4; the cases are mutually exclusive once alive players
/// exist, so evaluation order only matters for the `AllDead` short circuit.
pub fn evaluate(players: &[Player], majority_threshold: f64) -> Option<Winner> {
    let alive: Vec<&Player> = players.iter().filter(|p| p.alive).collect();
    if alive.is_empty() {
        return Some(Winner::Evil);
    }

    let alive_warlocks = alive.iter().filter(|p| p.is_warlock).count();
    let alive_total = alive.len();

    if alive_warlocks == alive_total {
        return Some(Winner::Evil);
    }
    if alive_warlocks == 0 {
        return Some(Winner::Good);
    }
    if (alive_warlocks as f64) * majority_threshold > alive_total as f64 {
        return Some(Winner::Evil);
    }
    None
}
