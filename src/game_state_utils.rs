//! Helper queries over a room's player list (spec §2 `GameStateUtils`).
//!
//! Kept free of any mutation: every function here takes `&[Player]` and
//! returns ids or references, so callers remain the only ones deciding when
//! and how to mutate state.

use rand::Rng;

use crate::ids::PlayerId;
use crate::player::Player;

pub fn alive_ids(players: &[Player]) -> Vec<PlayerId> {
    players.iter().filter(|p| p.alive).map(|p| p.id).collect()
}

pub fn lowest_hp_alive(players: &[Player]) -> Option<PlayerId> {
    players
        .iter()
        .filter(|p| p.alive)
        .min_by(|a, b| a.hp.cmp(&b.hp).then(a.id.cmp(&b.id)))
        .map(|p| p.id)
}

pub fn highest_hp_alive(players: &[Player]) -> Option<PlayerId> {
    players
        .iter()
        .filter(|p| p.alive)
        .max_by(|a, b| a.hp.cmp(&b.hp).then(a.id.cmp(&b.id)))
        .map(|p| p.id)
}

pub fn random_alive_target(players: &[Player], exclude: Option<PlayerId>, rng: &mut impl Rng) -> Option<PlayerId> {
    let candidates: Vec<PlayerId> = players
        .iter()
        .filter(|p| p.alive && Some(p.id) != exclude)
        .map(|p| p.id)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// Players currently flagged `pendingDeath=true`, in player-list order.
pub fn pending_resurrections(players: &[Player]) -> Vec<PlayerId> {
    players.iter().filter(|p| p.pending_death).map(|p| p.id).collect()
}
