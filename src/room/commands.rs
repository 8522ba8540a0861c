//! The inbound command surface a room worker dispatches against (spec §4.1
//! contract table). Thin routing layer over `Room`'s inherent methods —
//! kept separate so `worker.rs` never has to match on net wire shapes
//! directly.

use crate::action::{ActionKind, TargetRef};
use crate::error::RoomError;
use crate::ids::{ConnectionId, PlayerId};

use super::Room;

#[derive(Debug, Clone)]
pub enum Command {
    AddPlayer { connection_id: ConnectionId, name: String },
    SelectCharacter { player_id: PlayerId, race: String, class: String },
    MarkReady { player_id: PlayerId },
    StartGame { host_id: PlayerId },
    SubmitAction { player_id: PlayerId, ability_id: String, target: TargetRef, kind: ActionKind },
    ReconnectToGame { name: String, connection_id: ConnectionId },
    LeaveGame { player_id: PlayerId },
    TransferHost { current_host_id: PlayerId, new_host_id: PlayerId },
}

/// What happened as a result of a dispatched command, used by the worker to
/// decide whether a `ProcessRound` pass is now due (spec §4.1 phase-advance
/// rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    PlayerJoined(PlayerId),
    CharacterSelected,
    MarkedReady,
    GameStarted,
    ActionAccepted { round_ready: bool },
    Reconnected(PlayerId),
    Left,
    HostTransferred,
}

pub fn dispatch(room: &mut Room, command: Command) -> Result<CommandOutcome, RoomError> {
    match command {
        Command::AddPlayer { connection_id, name } => room.add_player(connection_id, name).map(CommandOutcome::PlayerJoined),
        Command::SelectCharacter { player_id, race, class } => {
            room.select_character(player_id, &race, &class).map(|_| CommandOutcome::CharacterSelected)
        }
        Command::MarkReady { player_id } => room.mark_ready(player_id).map(|_| CommandOutcome::MarkedReady),
        Command::StartGame { host_id } => room.start_game(host_id).map(|_| CommandOutcome::GameStarted),
        Command::SubmitAction { player_id, ability_id, target, kind } => {
            room.submit_action(player_id, ability_id, target, kind)?;
            Ok(CommandOutcome::ActionAccepted { round_ready: room.ready_for_results() })
        }
        Command::ReconnectToGame { name, connection_id } => {
            room.reconnect_to_game(&name, connection_id).map(CommandOutcome::Reconnected)
        }
        Command::LeaveGame { player_id } => {
            room.leave_game(player_id);
            Ok(CommandOutcome::Left)
        }
        Command::TransferHost { current_host_id, new_host_id } => {
            room.transfer_host(current_host_id, new_host_id).map(|_| CommandOutcome::HostTransferred)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ids::RoomCode;
    use std::sync::Arc;
    use std::time::Duration;

    fn room() -> Room {
        Room::new(RoomCode("1234".into()), Arc::new(Catalog::default_catalog()), 3, Duration::from_secs(60), 1)
    }

    #[test]
    fn add_player_command_returns_new_id() {
        let mut r = room();
        let outcome = dispatch(&mut r, Command::AddPlayer { connection_id: ConnectionId::new(), name: "Alice".into() }).unwrap();
        assert!(matches!(outcome, CommandOutcome::PlayerJoined(_)));
    }

    #[test]
    fn submit_action_reports_round_readiness() {
        let mut r = room();
        let alice = r.add_player(ConnectionId::new(), "Alice".into()).unwrap();
        r.add_player(ConnectionId::new(), "Bob".into()).unwrap();
        r.add_player(ConnectionId::new(), "Charlie".into()).unwrap();
        r.select_character(alice, "human", "warrior").unwrap();
        for p in &mut r.players {
            p.ready = true;
        }
        r.start_game(alice).unwrap();
        let outcome = dispatch(
            &mut r,
            Command::SubmitAction {
                player_id: alice,
                ability_id: "slash".into(),
                target: TargetRef::Monster,
                kind: ActionKind::Class,
            },
        )
        .unwrap();
        assert_eq!(outcome, CommandOutcome::ActionAccepted { round_ready: false });
    }
}
