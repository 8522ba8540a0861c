//! Room orchestrator (spec §4.1): owns players, the phase machine, the
//! per-round action buffer, and every subsystem a `ProcessRound` pass drives.
//!
//! All mutation happens on whichever task currently holds `&mut Room` — the
//! single-writer-per-room model (spec §5) is enforced by `worker.rs`, which
//! is the only place that ever takes `&mut Room` outside of tests.

pub mod commands;
pub mod phase;
pub mod process_round;
pub mod win;
pub mod worker;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::action::{ActionBuffer, TargetRef};
use crate::ability::AbilityRegistry;
use crate::catalog::types::{RacialUsage, TargetKind};
use crate::catalog::Catalog;
use crate::combat::CombatSystem;
use crate::coordination::CoordinationTracker;
use crate::error::RoomError;
use crate::event::EventLog;
use crate::ids::{ConnectionId, PlayerId, RoomCode};
use crate::monster::Monster;
use crate::monster_controller::MonsterController;
use crate::player::Player;
use crate::status_effect::StatusEffectManager;
use crate::warlock::WarlockSystem;
use phase::Phase;
use win::Winner;

const MAX_PLAYERS: usize = 20;

struct DisconnectedSlot {
    player_id: PlayerId,
    was_host: bool,
    deadline: Instant,
}

pub struct Room {
    pub code: RoomCode,
    pub phase: Phase,
    pub level: u32,
    pub turn: u64,
    pub players: Vec<Player>,
    pub monster: Monster,
    pub host_id: Option<PlayerId>,
    pub winner: Option<Winner>,
    pub catalog: Arc<Catalog>,
    pub(crate) action_buffer: ActionBuffer,
    pub(crate) coordination: CoordinationTracker,
    pub(crate) warlocks: WarlockSystem,
    pub(crate) status_mgr: StatusEffectManager,
    pub(crate) combat: CombatSystem,
    pub(crate) monster_controller: MonsterController,
    pub(crate) ability_registry: AbilityRegistry,
    pub(crate) rng: StdRng,
    disconnected: HashMap<String, DisconnectedSlot>,
    min_players: usize,
    reconnect_grace: Duration,
}

impl Room {
    pub fn new(code: RoomCode, catalog: Arc<Catalog>, min_players: usize, reconnect_grace: Duration, seed: u64) -> Self {
        let monster = Monster::spawn(&catalog.balance.monster, 1);
        Self {
            code,
            phase: Phase::Lobby,
            level: 1,
            turn: 0,
            players: Vec::new(),
            monster,
            host_id: None,
            winner: None,
            catalog,
            action_buffer: ActionBuffer::default(),
            coordination: CoordinationTracker::default(),
            warlocks: WarlockSystem::default(),
            status_mgr: StatusEffectManager,
            combat: CombatSystem::default(),
            monster_controller: MonsterController::default(),
            ability_registry: AbilityRegistry,
            rng: StdRng::seed_from_u64(seed),
            disconnected: HashMap::new(),
            min_players,
            reconnect_grace,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// `AddPlayer` (spec §4.1 contract table).
    pub fn add_player(&mut self, connection_id: ConnectionId, name: String) -> Result<PlayerId, RoomError> {
        if self.phase != Phase::Lobby {
            return Err(RoomError::RoomStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(RoomError::NameDuplicate(name));
        }

        let id = PlayerId::new();
        let mut player = Player::new(id, name);
        player.connection_id = Some(connection_id);
        let is_first = self.players.is_empty();
        player.is_host = is_first;
        if is_first {
            self.host_id = Some(id);
        }
        self.players.push(player);
        Ok(id)
    }

    /// `SelectCharacter` (spec §4.1 contract table).
    pub fn select_character(&mut self, player_id: PlayerId, race: &str, class: &str) -> Result<(), RoomError> {
        if !matches!(self.phase, Phase::Lobby | Phase::CharacterSelect) {
            return Err(RoomError::WrongPhase { expected: "Lobby|CharacterSelect", found: self.phase.name() });
        }
        let race_def = self.catalog.race(race).ok_or(RoomError::NotFound)?.clone();
        let class_def = self.catalog.class(class).ok_or(RoomError::NotFound)?.clone();
        if !self.catalog.compatible(race, class) {
            return Err(RoomError::Incompatible);
        }

        let player = self.player_mut(player_id).ok_or(RoomError::NotFound)?;
        player.race = Some(race_def.id.clone());
        player.class = Some(class_def.id.clone());
        player.abilities = class_def.abilities.clone();
        crate::ability::racial::init_racial_state(player, &race_def.id);

        self.phase = Phase::CharacterSelect;
        Ok(())
    }

    /// `MarkReady` (spec §4.1 contract table).
    pub fn mark_ready(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if !matches!(self.phase, Phase::Lobby | Phase::CharacterSelect) {
            return Err(RoomError::WrongPhase { expected: "Lobby|CharacterSelect", found: self.phase.name() });
        }
        let player = self.player_mut(player_id).ok_or(RoomError::NotFound)?;
        player.ready = true;
        Ok(())
    }

    /// `StartGame` (spec §4.1 contract table).
    pub fn start_game(&mut self, host_id: PlayerId) -> Result<(), RoomError> {
        if self.host_id != Some(host_id) {
            return Err(RoomError::NotHost);
        }
        if self.players.len() < self.min_players {
            return Err(RoomError::TooFew { have: self.players.len(), need: self.min_players });
        }
        if !self.players.iter().all(|p| p.ready) {
            return Err(RoomError::NotReady);
        }
        self.warlocks.assign_initial_warlock(&mut self.players, None, &mut self.rng);
        self.phase = Phase::Active(phase::RoundPhase::Action);
        Ok(())
    }

    /// `SubmitAction` (spec §4.1 contract table); validated against the
    /// preconditions in §4.1.2 before being buffered.
    pub fn submit_action(
        &mut self,
        player_id: PlayerId,
        ability_id: String,
        target: crate::action::TargetRef,
        kind: crate::action::ActionKind,
    ) -> Result<(), RoomError> {
        if self.phase != Phase::Active(phase::RoundPhase::Action) {
            return Err(RoomError::WrongPhase { expected: "Active/Action", found: self.phase.name() });
        }

        let stunned = {
            let player = self.player(player_id).ok_or(RoomError::NotFound)?;
            self.status_mgr.is_stunned(player)
        };

        let ability_id_for_validation = ability_id.clone();
        let (cooldown, unlocked) = match kind {
            crate::action::ActionKind::Class => {
                let player = self.player(player_id).ok_or(RoomError::NotFound)?;
                (player.cooldown_of(&ability_id_for_validation), player.is_unlocked(&ability_id_for_validation))
            }
            crate::action::ActionKind::Racial => (0, true),
        };

        let player = self.player(player_id).ok_or(RoomError::NotFound)?;
        if !player.alive {
            return Err(RoomError::Dead);
        }
        if stunned {
            return Err(RoomError::Stunned);
        }
        if kind == crate::action::ActionKind::Class {
            if !unlocked {
                return Err(RoomError::InvalidTarget);
            }
            if cooldown > 0 {
                return Err(RoomError::Cooldown { remaining: cooldown });
            }
            let shape = self
                .player(player_id)
                .and_then(|p| p.ability(&ability_id_for_validation))
                .map(|a| a.target);
            if !matches!(shape, Some(kind) if target_matches_shape(kind, target)) {
                return Err(RoomError::InvalidTarget);
            }
        }
        if kind == crate::action::ActionKind::Racial {
            let player = self.player(player_id).ok_or(RoomError::NotFound)?;
            let race_id = player.race.as_deref().ok_or(RoomError::InvalidTarget)?;
            let racial = &self.catalog.race(race_id).ok_or(RoomError::NotFound)?.racial;
            if racial.id != ability_id_for_validation {
                return Err(RoomError::InvalidTarget);
            }
            match racial.usage {
                RacialUsage::Passive => return Err(RoomError::InvalidTarget),
                RacialUsage::PerGame => {
                    if player.racial.uses_remaining == 0 {
                        return Err(RoomError::RacialExhausted);
                    }
                }
                RacialUsage::PerRound => {
                    if player.racial.uses_remaining == 0 || player.racial.used_this_round {
                        return Err(RoomError::RacialExhausted);
                    }
                }
            }
        }

        let action = crate::action::Action {
            actor_id: player_id,
            ability_id,
            target,
            submitted_at: self.turn * 10_000 + self.action_buffer.class_actions().len() as u64,
            kind,
        };
        if !self.action_buffer.submit(action) {
            return Err(RoomError::DuplicateAction);
        }
        Ok(())
    }

    /// Advances Action → Results once every alive, non-stunned player has
    /// submitted a class action (spec §4.1 phase-advance rule).
    pub fn ready_for_results(&self) -> bool {
        self.players.iter().all(|p| {
            !p.alive || self.status_mgr.is_stunned(p) || !p.connected || self.action_buffer.has_class_action(p.id)
        })
    }

    /// `LeaveGame` (spec §4.1 contract table): marks disconnected and starts
    /// the reconnect grace window rather than removing the player outright.
    pub fn leave_game(&mut self, player_id: PlayerId) {
        let was_host = self.host_id == Some(player_id);
        if let Some(player) = self.player_mut(player_id) {
            player.connected = false;
            let name = player.name.clone();
            self.disconnected.insert(
                name,
                DisconnectedSlot { player_id, was_host, deadline: Instant::now() + self.reconnect_grace },
            );
        }
        if was_host {
            if let Some(next_host) = self.players.iter().find(|p| p.connected && p.alive).map(|p| p.id) {
                self.transfer_host_unchecked(next_host);
            }
        }
    }

    /// `ReconnectToGame` (spec §4.1 contract table, §4.8).
    pub fn reconnect_to_game(&mut self, name: &str, new_connection: ConnectionId) -> Result<PlayerId, RoomError> {
        let slot = self.disconnected.remove(name).ok_or(RoomError::NoSlot)?;
        if Instant::now() > slot.deadline {
            return Err(RoomError::GracePassed);
        }
        let was_host = slot.was_host;
        if let Some(player) = self.player_mut(slot.player_id) {
            player.connection_id = Some(new_connection);
            player.connected = true;
        }
        if was_host {
            self.transfer_host_unchecked(slot.player_id);
        }
        Ok(slot.player_id)
    }

    /// Explicit host-only lifecycle operation, supplementing the automatic
    /// transfer-on-disconnect path (SPEC_FULL §B).
    pub fn transfer_host(&mut self, current_host_id: PlayerId, new_host_id: PlayerId) -> Result<(), RoomError> {
        if self.host_id != Some(current_host_id) {
            return Err(RoomError::NotHost);
        }
        if self.player(new_host_id).is_none() {
            return Err(RoomError::NotFound);
        }
        self.transfer_host_unchecked(new_host_id);
        Ok(())
    }

    fn transfer_host_unchecked(&mut self, new_host_id: PlayerId) {
        if let Some(old) = self.host_id.and_then(|id| self.player_mut(id)) {
            old.is_host = false;
        }
        self.host_id = Some(new_host_id);
        if let Some(new_host) = self.player_mut(new_host_id) {
            new_host.is_host = true;
        }
    }
}

/// Whether a submitted target matches what an ability of this shape accepts
/// (spec §4.1.2 preconditions). `Multi` and `SelfTarget` abilities resolve
/// their own victim set and ignore the submitted target.
fn target_matches_shape(shape: TargetKind, target: TargetRef) -> bool {
    match shape {
        TargetKind::Monster => target == TargetRef::Monster,
        TargetKind::Single => matches!(target, TargetRef::Player(_)),
        TargetKind::Multi | TargetKind::SelfTarget => true,
    }
}
