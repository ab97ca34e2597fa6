//! The PokePucks match engine.
//!
//! A match advances in discrete units: the transport asks for one `step()`,
//! the engine moves through exactly one phase of its stage machine
//! (setup -> loop -> end) and hands back a serializable [`Snapshot`].
//! The engine itself is synchronous and single-threaded; the registry
//! serializes steps per room.

pub mod arena;
pub mod game;
pub mod player;
pub mod puck;
pub mod registry;
pub mod snapshot;

pub use arena::{Arena, ArenaEntry};
pub use game::{Game, Stage};
pub use player::Player;
pub use puck::{Puck, Side, Slammer};
pub use registry::MatchRegistry;
pub use snapshot::{PlayerView, PoolEntryView, Snapshot};

/// Errors surfaced to the transport through the step/start result channel.
///
/// None of these are fatal to the process. `InvalidPhaseTransition` is
/// defensive: the step that hits it is aborted without mutating the match.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no match found for this room")]
    NoMatchForRoom,
    #[error("match already started")]
    MatchAlreadyActive,
    #[error("invalid phase transition: stage {stage:?}, phase {phase}")]
    InvalidPhaseTransition { stage: Stage, phase: u8 },
}
