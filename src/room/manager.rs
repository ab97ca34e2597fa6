//! Rooms: two fixed seats, ready flags, and match lifecycle tied to occupancy.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::engine::MatchRegistry;
use crate::util::id::new_room_id;
use crate::ws::connection::ServerMessage;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RoomError {
    #[error("room not found")]
    NotFound,
    #[error("room full")]
    Full,
}

/// One connected player. The slot index (0 or 1) is fixed for as long as the
/// seat is held and doubles as the engine-side player identity.
pub struct Seat {
    pub name: String,
    pub ready: bool,
    pub tx: UnboundedSender<ServerMessage>,
}

pub struct Room {
    pub id: String,
    seats: Mutex<[Option<Seat>; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub slot: usize,
    pub name: String,
    pub ready: bool,
}

impl Room {
    fn new(id: String) -> Self {
        Self {
            id,
            seats: Mutex::new([None, None]),
        }
    }

    pub fn seat_views(&self) -> Vec<SeatView> {
        let seats = self.seats.lock();
        seats
            .iter()
            .enumerate()
            .filter_map(|(slot, seat)| {
                seat.as_ref().map(|s| SeatView {
                    slot,
                    name: s.name.clone(),
                    ready: s.ready,
                })
            })
            .collect()
    }

    pub fn broadcast(&self, msg: &ServerMessage) {
        let seats = self.seats.lock();
        for seat in seats.iter().flatten() {
            let _ = seat.tx.send(msg.clone());
        }
    }

    fn is_empty(&self) -> bool {
        self.seats.lock().iter().all(Option::is_none)
    }
}

/// Registry of rooms plus the match registry whose entries they own.
pub struct RoomManager {
    rooms: DashMap<String, Arc<Room>>,
    registry: MatchRegistry,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            registry: MatchRegistry::new(),
        }
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    pub fn create_room(&self) -> String {
        let id = new_room_id();
        self.rooms.insert(id.clone(), Arc::new(Room::new(id.clone())));
        info!(room_id = %id, "room created");
        id
    }

    pub fn get(&self, id: &str) -> Option<Arc<Room>> {
        self.rooms.get(id).map(|r| r.clone())
    }

    /// Take the lowest free seat in the room.
    pub fn join(
        &self,
        room_id: &str,
        name: String,
        tx: UnboundedSender<ServerMessage>,
    ) -> Result<(Arc<Room>, usize), RoomError> {
        let room = self.get(room_id).ok_or(RoomError::NotFound)?;
        let slot = {
            let mut seats = room.seats.lock();
            let slot = seats
                .iter()
                .position(Option::is_none)
                .ok_or(RoomError::Full)?;
            seats[slot] = Some(Seat {
                name,
                ready: false,
                tx,
            });
            slot
        };
        Ok((room, slot))
    }

    /// Mark a seat ready. Returns true once both seats are taken and ready.
    pub fn mark_ready(&self, room: &Room, slot: usize) -> bool {
        let mut seats = room.seats.lock();
        if let Some(seat) = seats[slot].as_mut() {
            seat.ready = true;
        }
        seats
            .iter()
            .all(|s| s.as_ref().map(|s| s.ready).unwrap_or(false))
    }

    /// Vacate a seat. When the room empties its match is discarded and the
    /// room itself is removed.
    pub fn leave(&self, room: &Room, slot: usize) {
        room.seats.lock()[slot] = None;
        if room.is_empty() {
            self.registry.end_match(&room.id);
            self.rooms.remove(&room.id);
            info!(room_id = %room.id, "room emptied, match discarded");
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use tokio::sync::mpsc;

    fn tx() -> UnboundedSender<ServerMessage> {
        mpsc::unbounded_channel().0
    }

    #[test]
    fn seats_fill_in_order_and_cap_at_two() {
        let mgr = RoomManager::new();
        let id = mgr.create_room();
        let (_, a) = mgr.join(&id, "ash".into(), tx()).unwrap();
        let (_, b) = mgr.join(&id, "gary".into(), tx()).unwrap();
        assert_eq!((a, b), (0, 1));
        assert!(matches!(
            mgr.join(&id, "misty".into(), tx()),
            Err(RoomError::Full)
        ));
    }

    #[test]
    fn join_unknown_room_fails() {
        let mgr = RoomManager::new();
        assert!(matches!(
            mgr.join("nope", "ash".into(), tx()),
            Err(RoomError::NotFound)
        ));
    }

    #[test]
    fn ready_gate_requires_both_seats() {
        let mgr = RoomManager::new();
        let id = mgr.create_room();
        let (room, a) = mgr.join(&id, "ash".into(), tx()).unwrap();
        assert!(!mgr.mark_ready(&room, a));
        let (_, b) = mgr.join(&id, "gary".into(), tx()).unwrap();
        assert!(!mgr.mark_ready(&room, a));
        assert!(mgr.mark_ready(&room, b));
    }

    #[test]
    fn emptying_a_room_discards_its_match() {
        let mgr = RoomManager::new();
        let id = mgr.create_room();
        let (room, a) = mgr.join(&id, "ash".into(), tx()).unwrap();
        let (_, b) = mgr.join(&id, "gary".into(), tx()).unwrap();
        mgr.registry().start_match(&id).unwrap();

        mgr.leave(&room, a);
        // One seat still held, the match survives.
        assert!(mgr.registry().step(&id).is_ok());

        mgr.leave(&room, b);
        assert!(mgr.get(&id).is_none());
        assert_eq!(mgr.registry().step(&id), Err(EngineError::NoMatchForRoom));
    }

    #[test]
    fn freed_seat_can_be_retaken() {
        let mgr = RoomManager::new();
        let id = mgr.create_room();
        let (room, a) = mgr.join(&id, "ash".into(), tx()).unwrap();
        let (_, _b) = mgr.join(&id, "gary".into(), tx()).unwrap();
        mgr.leave(&room, a);
        let (_, again) = mgr.join(&id, "brock".into(), tx()).unwrap();
        assert_eq!(again, 0);
    }
}
