//! Error taxonomy (spec §7).
//!
//! Plain enums with hand-written `Display`, no `thiserror`. Every variant
//! here is surfaced to the originating client as an `ErrorMessage` event
//! (§6.1) except `Invariant`, which is logged and never shown verbatim.

use std::fmt;

use crate::ids::PlayerId;

/// Errors produced by `Room` operations (§4.1's contract table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    RoomExists,
    RoomStarted,
    RoomFull,
    NameDuplicate(String),
    NotFound,
    Incompatible,
    WrongPhase { expected: &'static str, found: &'static str },
    NotHost,
    NotReady,
    TooFew { have: usize, need: usize },
    Dead,
    Stunned,
    Cooldown { remaining: u32 },
    InvalidTarget,
    DuplicateAction,
    RacialExhausted,
    NoSlot,
    GracePassed,
    Invariant(String),
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::RoomExists => write!(f, "a room with that code already exists"),
            RoomError::RoomStarted => write!(f, "the game has already started"),
            RoomError::RoomFull => write!(f, "the room is full"),
            RoomError::NameDuplicate(name) => write!(f, "name '{name}' is already taken"),
            RoomError::NotFound => write!(f, "not found"),
            RoomError::Incompatible => write!(f, "that race and class cannot be combined"),
            RoomError::WrongPhase { expected, found } => {
                write!(f, "expected phase {expected}, room is in {found}")
            }
            RoomError::NotHost => write!(f, "only the host can do that"),
            RoomError::NotReady => write!(f, "not all players are ready"),
            RoomError::TooFew { have, need } => {
                write!(f, "need at least {need} players, have {have}")
            }
            RoomError::Dead => write!(f, "dead players cannot act"),
            RoomError::Stunned => write!(f, "stunned players cannot act"),
            RoomError::Cooldown { remaining } => {
                write!(f, "ability is on cooldown for {remaining} more round(s)")
            }
            RoomError::InvalidTarget => write!(f, "invalid target for this ability"),
            RoomError::DuplicateAction => write!(f, "an action of that kind was already submitted"),
            RoomError::RacialExhausted => write!(f, "that racial ability has no uses left this game or round"),
            RoomError::NoSlot => write!(f, "no disconnected slot matches that name"),
            RoomError::GracePassed => write!(f, "the reconnect grace period has elapsed"),
            RoomError::Invariant(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for RoomError {}

/// Errors from the combat/damage pipeline (§4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    UnknownPlayer(PlayerId),
    TargetAlreadyDead(PlayerId),
}

impl fmt::Display for CombatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatError::UnknownPlayer(id) => write!(f, "unknown player {}", id.0),
            CombatError::TargetAlreadyDead(id) => write!(f, "target {} is already dead", id.0),
        }
    }
}

impl std::error::Error for CombatError {}

/// Errors from the room registry (§4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Capacity,
    RoomExists,
    RoomNotFound,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Capacity => write!(f, "server is at maximum room capacity"),
            RegistryError::RoomExists => write!(f, "a room with that code already exists"),
            RegistryError::RoomNotFound => write!(f, "no room with that code"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors from the message bus adapter (§6.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    Unavailable,
    UnknownConnection,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Unavailable => write!(f, "message bus temporarily unavailable"),
            BusError::UnknownConnection => write!(f, "unknown connection"),
        }
    }
}

impl std::error::Error for BusError {}
