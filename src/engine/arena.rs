//! The shared pool both players feed and attack into.

use serde::Serialize;

use crate::engine::puck::Puck;

/// Target pool size during normal play.
pub const ARENA_TARGET: usize = 8;

/// One slot of the shared pool. A slammer appears here only as a tag naming
/// its owner; the piece itself stays on the player and is never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArenaEntry {
    Puck(Puck),
    Slammer { owner: usize },
}

/// The contested pile. `displaced` holds the pucks shoved aside when a
/// knockout isolates a slammer; they return once the pool empties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Arena {
    pub entries: Vec<ArenaEntry>,
    pub displaced: Vec<Puck>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens currently held by the pool, including the displaced ones.
    pub fn token_count(&self) -> usize {
        let in_play = self
            .entries
            .iter()
            .filter(|e| matches!(e, ArenaEntry::Puck(_)))
            .count();
        in_play + self.displaced.len()
    }

    /// True when the pool holds exactly one entry: the given player's slammer.
    pub fn is_sole_slammer(&self, owner: usize) -> bool {
        matches!(self.entries.as_slice(), [ArenaEntry::Slammer { owner: o }] if *o == owner)
    }

    /// Knockout: move every puck into the holding area and leave only the
    /// given player's slammer as the target.
    pub fn isolate_slammer(&mut self, owner: usize) {
        for entry in std::mem::take(&mut self.entries) {
            if let ArenaEntry::Puck(puck) = entry {
                self.displaced.push(puck);
            }
        }
        self.entries.push(ArenaEntry::Slammer { owner });
    }

    /// Drop a player's slammer tag from the pool, if present.
    pub fn remove_slammer(&mut self, owner: usize) {
        self.entries
            .retain(|e| !matches!(e, ArenaEntry::Slammer { owner: o } if *o == owner));
    }

    /// Return the held-aside pucks to the pool.
    pub fn restore_displaced(&mut self) {
        let held = std::mem::take(&mut self.displaced);
        self.entries.extend(held.into_iter().map(ArenaEntry::Puck));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolate_keeps_tokens_in_holding() {
        let mut arena = Arena::new();
        arena.entries.push(ArenaEntry::Puck(Puck::basic(0)));
        arena.entries.push(ArenaEntry::Puck(Puck::basic(1)));
        arena.isolate_slammer(1);

        assert!(arena.is_sole_slammer(1));
        assert_eq!(arena.displaced.len(), 2);
        assert_eq!(arena.token_count(), 2);
    }

    #[test]
    fn restore_returns_everything() {
        let mut arena = Arena::new();
        arena.entries.push(ArenaEntry::Puck(Puck::basic(0)));
        arena.isolate_slammer(0);
        arena.remove_slammer(0);
        arena.restore_displaced();

        assert_eq!(arena.entries.len(), 1);
        assert!(arena.displaced.is_empty());
        assert_eq!(arena.token_count(), 1);
    }

    #[test]
    fn sole_slammer_requires_single_entry() {
        let mut arena = Arena::new();
        arena.entries.push(ArenaEntry::Slammer { owner: 0 });
        arena.entries.push(ArenaEntry::Puck(Puck::basic(0)));
        assert!(!arena.is_sole_slammer(0));
        assert!(!arena.is_sole_slammer(1));
    }
}
