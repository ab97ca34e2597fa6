//! Per-player state: health stack, prize pile, slammer, attack budget.

use serde::Serialize;

use crate::engine::puck::{Puck, Slammer};

/// One of the two fixed seats in a match.
///
/// The health stack is LIFO: pucks enter and leave at the end of the vec.
/// `backup` is only populated while a knockout is in effect and is drained
/// back into `health` at the start of the owner's next top-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub health: Vec<Puck>,
    pub prize: Vec<Puck>,
    pub attacks: u8,
    pub slammer: Slammer,
    pub backup: Vec<Puck>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            health: Vec::new(),
            prize: Vec::new(),
            attacks: 0,
            slammer: Slammer::new(1),
            backup: Vec::new(),
        }
    }

    /// Tokens this player currently owns across all of their collections.
    pub fn token_count(&self) -> usize {
        self.health.len() + self.prize.len() + self.backup.len()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
