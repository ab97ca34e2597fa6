//! Registry of live matches, one per room.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;

use crate::engine::game::Game;
use crate::engine::snapshot::Snapshot;
use crate::engine::EngineError;

/// Maps a room id to at most one match. Insert and remove are atomic with
/// respect to concurrent start/end requests for the same room; the per-match
/// mutex serializes steps so only one is in flight per room.
#[derive(Default)]
pub struct MatchRegistry {
    matches: DashMap<String, Mutex<Game>>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a match for the room. Fails if one is already active.
    pub fn start_match(&self, room_id: &str) -> Result<Snapshot, EngineError> {
        match self.matches.entry(room_id.to_string()) {
            Entry::Occupied(_) => Err(EngineError::MatchAlreadyActive),
            Entry::Vacant(slot) => {
                let game = Game::new();
                let snapshot = game.snapshot();
                slot.insert(Mutex::new(game));
                info!(%room_id, "match started");
                Ok(snapshot)
            }
        }
    }

    /// Advance the room's match one phase and return the new snapshot.
    pub fn step(&self, room_id: &str) -> Result<Snapshot, EngineError> {
        let entry = self.matches.get(room_id).ok_or(EngineError::NoMatchForRoom)?;
        let mut game = entry.lock();
        game.step(&mut rand::thread_rng())?;
        Ok(game.snapshot())
    }

    /// Remove and discard the room's match. Called when the room empties.
    pub fn end_match(&self, room_id: &str) -> bool {
        let removed = self.matches.remove(room_id).is_some();
        if removed {
            info!(%room_id, "match ended");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game::Stage;

    #[test]
    fn step_without_match_is_not_found() {
        let registry = MatchRegistry::new();
        assert_eq!(registry.step("nowhere"), Err(EngineError::NoMatchForRoom));
    }

    #[test]
    fn double_start_is_rejected() {
        let registry = MatchRegistry::new();
        registry.start_match("r1").unwrap();
        assert_eq!(
            registry.start_match("r1"),
            Err(EngineError::MatchAlreadyActive)
        );
    }

    #[test]
    fn rooms_do_not_share_matches() {
        let registry = MatchRegistry::new();
        registry.start_match("r1").unwrap();
        registry.start_match("r2").unwrap();
        for _ in 0..5 {
            registry.step("r1").unwrap();
        }
        let other = registry.step("r2").unwrap();
        assert_eq!(other.stage, Stage::Setup);
    }

    #[test]
    fn stepping_advances_through_setup() {
        let registry = MatchRegistry::new();
        let initial = registry.start_match("r1").unwrap();
        assert_eq!(initial.stage, Stage::Setup);

        let mut last = initial;
        for _ in 0..5 {
            last = registry.step("r1").unwrap();
        }
        assert_eq!(last.stage, Stage::Loop);
        assert_eq!(last.phase, 0);
        assert_eq!(last.shared_pool.len(), 8);
        assert_eq!(last.players[0].health_count, 11);
        assert_eq!(last.players[1].health_count, 11);
    }

    #[test]
    fn ended_match_is_gone() {
        let registry = MatchRegistry::new();
        registry.start_match("r1").unwrap();
        assert!(registry.end_match("r1"));
        assert!(!registry.end_match("r1"));
        assert_eq!(registry.step("r1"), Err(EngineError::NoMatchForRoom));
        // The room can host a fresh match afterwards.
        registry.start_match("r1").unwrap();
    }
}
