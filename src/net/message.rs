//! Wire-agnostic message shapes (spec §6.1). These are the only types a
//! transport layer (WebSocket, in-process channel, whatever) needs to know
//! about; everything else is internal to the room worker.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::monster::Monster;
use crate::player::Player;

/// Client → server messages (spec §6.1 bullet list).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    CreateGame { name: String },
    JoinGame { game_code: String, name: String },
    SelectCharacter { game_code: String, race: String, class: String },
    StartGame { game_code: String },
    PerformAction { game_code: String, action_type: String, target_id: Option<u64> },
    UseRacialAbility { game_code: String, target_id: Option<u64>, ability_type: String },
    ReconnectToGame { game_code: String, name: String },
}

/// A trimmed, serializable view of a player for wire broadcast. Session
/// internals (cooldown map, status effects) stay server-side; only what a
/// client needs to render shows up here.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: u64,
    pub name: String,
    pub race: Option<String>,
    pub class: Option<String>,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub alive: bool,
    pub is_host: bool,
    pub connected: bool,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.0,
            name: p.name.clone(),
            race: p.race.clone(),
            class: p.class.clone(),
            level: p.level,
            hp: p.hp,
            max_hp: p.max_hp,
            alive: p.alive,
            is_host: p.is_host,
            connected: p.connected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonsterView {
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
}

impl From<&Monster> for MonsterView {
    fn from(m: &Monster) -> Self {
        Self { hp: m.hp, max_hp: m.max_hp, level: m.level }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum TrophyCategory {
    MostDamage,
    MostHealing,
    MostKills,
    Survivor,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trophy {
    pub player_id: u64,
    pub category: TrophyCategory,
}

/// Server → client events (spec §6.1 outbound catalog, SPEC_FULL §B for
/// `TrophyAwarded`'s definition).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    GameCreated { game_code: String },
    PlayerList { players: Vec<PlayerView>, host: Option<u64> },
    PlayerJoined { player: PlayerView },
    GameStarted { players: Vec<PlayerView>, monster: MonsterView },
    GameStateUpdate { players: Vec<PlayerView>, monster: MonsterView },
    GameReconnected { players: Vec<PlayerView>, monster: MonsterView, turn: u64, level: u32, started: bool, host: Option<u64> },
    RoundResult {
        players: Vec<PlayerView>,
        monster: MonsterView,
        events_log: Vec<String>,
        winner: Option<String>,
        turn: u64,
        level: u32,
        level_up: Option<(u32, u32)>,
    },
    PrivateEvent { events: Vec<String> },
    TrophyAwarded { trophies: Vec<Trophy> },
    ErrorMessage { message: String },
}

pub fn parse_target(target_id: Option<u64>) -> crate::action::TargetRef {
    match target_id {
        Some(raw) => crate::action::TargetRef::Player(PlayerId(raw)),
        None => crate::action::TargetRef::Monster,
    }
}
