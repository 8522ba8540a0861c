//! Process-wide room directory (spec §4.8, §5 "Shared resources").
//!
//! Holds the `code -> worker handle` map behind a single `Mutex` — creation,
//! lookup, and deletion are all brief enough that a coarse exclusive gate
//! beats a sharded or lock-free structure here; the expensive work (a
//! room's own state machine) lives behind the per-room worker channel, not
//! behind this lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use rand::Rng;

use crate::bus::OutboundSender;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::RegistryError;
use crate::ids::RoomCode;
use crate::room::worker::{self, WorkerHandle};
use crate::room::Room;

struct Entry {
    handle: WorkerHandle,
    _worker: tokio::task::JoinHandle<()>,
}

pub struct Registry {
    rooms: Mutex<HashMap<RoomCode, Entry>>,
    catalog: Arc<Catalog>,
    config: Config,
    outbound: OutboundSender,
    self_ref: Weak<Registry>,
}

impl Registry {
    /// Returns an `Arc` rather than a bare `Registry`: each room's worker
    /// holds a `Weak` back-reference so it can reclaim its own directory
    /// slot on teardown, which needs the registry to already be behind an
    /// `Arc` before any room exists.
    pub fn new(catalog: Arc<Catalog>, config: Config, outbound: OutboundSender) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            rooms: Mutex::new(HashMap::new()),
            catalog,
            config,
            outbound,
            self_ref: self_ref.clone(),
        })
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }

    /// Creates a new room with a fresh, non-colliding four digit code and
    /// spawns its worker. Fails once `max_rooms` is reached (spec §4.8).
    pub fn create_room(&self, seed: u64) -> Result<RoomCode, RegistryError> {
        let mut rooms = self.rooms.lock().unwrap();
        if rooms.len() >= self.config.max_rooms {
            return Err(RegistryError::Capacity);
        }

        let code = generate_unique_code(&rooms);
        let room = Room::new(
            code.clone(),
            self.catalog.clone(),
            self.config.min_players,
            self.config.reconnect_grace,
            seed,
        );
        let teardown_code = code.clone();
        let self_ref = self.self_ref.clone();
        let (handle, worker_handle) = worker::spawn(room, self.outbound.clone(), self.config.idle_room_timeout, move || {
            if let Some(registry) = self_ref.upgrade() {
                registry.remove(&teardown_code);
            }
        });
        rooms.insert(code.clone(), Entry { handle, _worker: worker_handle });
        Ok(code)
    }

    pub fn get(&self, code: &RoomCode) -> Result<WorkerHandle, RegistryError> {
        self.rooms
            .lock()
            .unwrap()
            .get(code)
            .map(|entry| entry.handle.clone())
            .ok_or(RegistryError::RoomNotFound)
    }

    /// Drops a room's entry once its worker has torn down (idle timeout or
    /// explicit shutdown). The worker itself decides when that happens;
    /// this just reclaims the slot in the directory.
    pub fn remove(&self, code: &RoomCode) {
        self.rooms.lock().unwrap().remove(code);
    }
}

fn generate_unique_code(existing: &HashMap<RoomCode, Entry>) -> RoomCode {
    let mut rng = rand::rng();
    loop {
        let candidate = RoomCode(format!("{:04}", rng.random_range(0..10_000)));
        if !existing.contains_key(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn registry(max_rooms: usize) -> Arc<Registry> {
        let mut config = Config::default();
        config.max_rooms = max_rooms;
        Registry::new(Arc::new(Catalog::default_catalog()), config, OutboundSender::new())
    }

    #[tokio::test]
    async fn create_room_assigns_a_four_digit_code() {
        let registry = registry(10);
        let code = registry.create_room(1).unwrap();
        assert_eq!(code.as_str().len(), 4);
        assert!(registry.get(&code).is_ok());
    }

    #[tokio::test]
    async fn create_room_respects_capacity() {
        let registry = registry(1);
        registry.create_room(1).unwrap();
        assert_eq!(registry.create_room(2), Err(RegistryError::Capacity));
    }

    #[tokio::test]
    async fn lookup_of_unknown_code_fails() {
        let registry = registry(10);
        assert_eq!(registry.get(&RoomCode("0000".into())), Err(RegistryError::RoomNotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_room_is_reclaimed_from_the_directory() {
        let mut config = Config::default();
        config.max_rooms = 10;
        config.idle_room_timeout = Duration::from_secs(1);
        let registry = Registry::new(Arc::new(Catalog::default_catalog()), config, OutboundSender::new());
        let code = registry.create_room(1).unwrap();
        assert_eq!(registry.room_count(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        // Let the now-elapsed worker task actually run its teardown.
        tokio::task::yield_now().await;

        assert_eq!(registry.get(&code), Err(RegistryError::RoomNotFound));
        assert_eq!(registry.room_count(), 0);
    }
}
