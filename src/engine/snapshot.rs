//! The serializable view broadcast to room members after every step.

use serde::{Deserialize, Serialize};

use crate::engine::game::Stage;
use crate::engine::puck::Side;

/// What the transport broadcasts verbatim. This is the only channel through
/// which rendering learns of state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stage: Stage,
    pub phase: u8,
    pub turn: usize,
    pub step_count: u64,
    pub shared_pool: Vec<PoolEntryView>,
    pub players: [PlayerView; 2],
    pub winner: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub health_count: usize,
    pub prize_count: usize,
    pub actor_face: Side,
}

/// Pool slots carry an explicit tag so clients never have to guess whether
/// an entry is a puck or a displaced slammer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolEntryView {
    Puck { face: Side },
    Slammer { owner: usize },
}
