//! Message bus: the thin adapter between room workers and whatever
//! transport `net/` is speaking (spec §6 "Transport-agnostic contract").
//!
//! The bus does not understand game rules. It knows two things: which
//! `ConnectionId` belongs to which outbound channel, and that fan-out to a
//! single subscriber must preserve emit order (spec §5). Per-room state
//! never crosses this boundary except as already-personalized strings.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::BusError;
use crate::ids::{ConnectionId, PlayerId, RoomCode};
use crate::player::Player;
use crate::room::process_round::RoundResult;

/// An outbound message a connection's transport task forwards to its client.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    RoundResult { room: RoomCode, turn: u64, lines: Vec<String> },
    LevelUp { room: RoomCode, from: u32, to: u32 },
    GameEnded { room: RoomCode, winner: String },
    Error { message: String },
}

type Subscriber = mpsc::UnboundedSender<OutboundMessage>;

/// Registry of live outbound channels, shared by every room worker.
#[derive(Clone, Default)]
pub struct OutboundSender {
    subscribers: Arc<Mutex<HashMap<ConnectionId, Subscriber>>>,
    /// Connection a given player is currently attached to, so a round result
    /// keyed by `PlayerId` can be routed to the right socket even across a
    /// reconnect that changed the `ConnectionId`.
    routes: Arc<Mutex<HashMap<PlayerId, ConnectionId>>>,
}

impl OutboundSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection's outbound channel; returns the receiving end
    /// for the transport task to drain.
    pub fn subscribe(&self, connection_id: ConnectionId) -> mpsc::UnboundedReceiver<OutboundMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().insert(connection_id, tx);
        rx
    }

    pub fn unsubscribe(&self, connection_id: ConnectionId) {
        self.subscribers.lock().unwrap().remove(&connection_id);
    }

    /// Updates which connection a player's messages should be routed to.
    /// Called on join and on every successful reconnect.
    pub fn route_player(&self, player_id: PlayerId, connection_id: ConnectionId) {
        self.routes.lock().unwrap().insert(player_id, connection_id);
    }

    fn send_to(&self, connection_id: ConnectionId, message: OutboundMessage) -> Result<(), BusError> {
        let subscribers = self.subscribers.lock().unwrap();
        let tx = subscribers.get(&connection_id).ok_or(BusError::UnknownConnection)?;
        tx.send(message).map_err(|_| BusError::Unavailable)
    }

    fn send_to_player(&self, player_id: PlayerId, message: OutboundMessage) {
        let connection_id = self.routes.lock().unwrap().get(&player_id).copied();
        if let Some(connection_id) = connection_id {
            let _ = self.send_to(connection_id, message);
        }
    }

    /// Personalizes and fans a round result out to every player still
    /// routable, preserving each viewer's emit order (spec §5, §3.5).
    pub fn broadcast_round_result(&self, code: &RoomCode, players: &[Player], result: &RoundResult) {
        for player in players {
            let lines = result.log.render_for(player.id);
            if lines.is_empty() {
                continue;
            }
            self.send_to_player(
                player.id,
                OutboundMessage::RoundResult { room: code.clone(), turn: result.turn, lines },
            );
        }
        if let Some((from, to)) = result.level_up {
            for player in players {
                self.send_to_player(player.id, OutboundMessage::LevelUp { room: code.clone(), from, to });
            }
        }
        if let Some(winner) = result.winner {
            let winner = format!("{winner:?}");
            for player in players {
                self.send_to_player(player.id, OutboundMessage::GameEnded { room: code.clone(), winner: winner.clone() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_connection_errors_instead_of_panicking() {
        let bus = OutboundSender::new();
        let err = bus.send_to(ConnectionId::new(), OutboundMessage::Error { message: "x".into() });
        assert_eq!(err, Err(BusError::UnknownConnection));
    }

    #[test]
    fn subscribed_connection_receives_routed_message() {
        let bus = OutboundSender::new();
        let connection_id = ConnectionId::new();
        let player_id = PlayerId::new();
        let mut rx = bus.subscribe(connection_id);
        bus.route_player(player_id, connection_id);
        bus.send_to_player(player_id, OutboundMessage::Error { message: "hi".into() });
        let received = rx.try_recv().unwrap();
        assert!(matches!(received, OutboundMessage::Error { .. }));
    }
}
