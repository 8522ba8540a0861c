//! Identity primitives used throughout a room's lifetime.
//!
//! Mirrors the rules-engine convention of small `Copy` newtypes backed by
//! monotonic counters rather than raw integers passed around positionally.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static PLAYER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable identity for a player, persists across disconnect/reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

/// Identity of the current network connection a player is attached to.
/// Changes on reconnect; the `PlayerId` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

/// Four decimal digit room code, e.g. "4821".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCode(pub String);

impl PlayerId {
    pub fn new() -> Self {
        Self(PLAYER_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RoomCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_ids_are_unique_and_monotonic() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        assert!(b.0 > a.0);
    }

    #[test]
    fn connection_ids_are_independent_of_player_ids() {
        let p = PlayerId::new();
        let c = ConnectionId::new();
        // Different counters entirely; no assertion on relative value beyond construction.
        let _ = (p, c);
    }
}
