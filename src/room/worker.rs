//! One task per room; the single writer of that room's state (spec §5).
//!
//! Inbound commands are enqueued by the bus and drained here in FIFO order.
//! The worker is the only place that ever calls `process_round` or holds
//! `&mut Room` outside of tests — everything else talks to a room only
//! through this channel.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::bus::OutboundSender;
use crate::error::RoomError;

use super::commands::{self, Command, CommandOutcome};
use super::process_round::RoundResult;
use super::Room;

/// A command plus the channel its result is returned on.
pub struct WorkerMessage {
    pub command: Command,
    pub reply: oneshot::Sender<Result<CommandOutcome, RoomError>>,
}

pub type WorkerHandle = mpsc::Sender<WorkerMessage>;

/// Spawns the room's worker loop. Returns a handle for enqueuing commands;
/// the loop itself runs until the channel closes or `idle_timeout` elapses
/// with no inbound traffic, at which point `on_teardown` fires so the
/// caller can reclaim the room's slot in the registry.
pub fn spawn(
    mut room: Room,
    outbound: OutboundSender,
    idle_timeout: Duration,
    on_teardown: impl FnOnce() + Send + 'static,
) -> (WorkerHandle, tokio::task::JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<WorkerMessage>(256);
    let handle = tokio::spawn(async move {
        let code = room.code.clone();
        info!(room = %code, "room worker started");
        loop {
            let next = time::timeout(idle_timeout, rx.recv()).await;
            let message = match next {
                Ok(Some(message)) => message,
                Ok(None) => {
                    debug!(room = %code, "room worker channel closed");
                    break;
                }
                Err(_) => {
                    info!(room = %code, "room idle timeout elapsed, tearing down");
                    break;
                }
            };

            let round_ready = matches!(message.command, Command::SubmitAction { .. });
            let outcome = commands::dispatch(&mut room, message.command);
            if let Ok(CommandOutcome::ActionAccepted { round_ready: ready }) = &outcome {
                if *ready {
                    let result = room.process_round();
                    emit_round_result(&code, &outbound, &room.players, &result);
                }
            } else if round_ready {
                warn!(room = %code, "action command failed: {:?}", outcome);
            }

            let _ = message.reply.send(outcome);
        }
        on_teardown();
        info!(room = %code, "room worker stopped");
    });
    (tx, handle)
}

fn emit_round_result(
    code: &crate::ids::RoomCode,
    outbound: &OutboundSender,
    players: &[crate::player::Player],
    result: &RoundResult,
) {
    debug!(room = %code, turn = result.turn, "round processed");
    outbound.broadcast_round_result(code, players, result);
}
