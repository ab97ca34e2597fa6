//! The match state machine: setup -> loop -> end, one phase per step.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::arena::{Arena, ArenaEntry, ARENA_TARGET};
use crate::engine::player::Player;
use crate::engine::puck::{Puck, Side, Slammer};
use crate::engine::snapshot::{PlayerView, PoolEntryView, Snapshot};
use crate::engine::EngineError;

/// Pucks dealt into each health stack at setup.
pub const DEAL_PER_PLAYER: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Setup,
    Loop,
    End,
}

/// One match between two fixed seats.
///
/// All mutation happens through [`Game::step`]; a step either completes a
/// whole phase or leaves the match untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    stage: Stage,
    phase: u8,
    turn: usize,
    arena: Arena,
    players: [Player; 2],
    winner: Option<usize>,
    step_count: u64,
}

impl Game {
    pub fn new() -> Self {
        Self {
            stage: Stage::Setup,
            phase: 0,
            turn: 0,
            arena: Arena::new(),
            players: [Player::new(), Player::new()],
            winner: None,
            step_count: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Advance one phase. The next state is computed on a copy and committed
    /// only on success, so a failed step never leaves tokens half-moved.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        let mut next = self.clone();
        next.advance(rng)?;
        if self.stage == Stage::Loop {
            debug_assert_eq!(next.token_census(), self.token_census());
        }
        *self = next;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let shared_pool = self
            .arena
            .entries
            .iter()
            .map(|entry| match entry {
                ArenaEntry::Puck(p) => PoolEntryView::Puck { face: p.side },
                ArenaEntry::Slammer { owner } => PoolEntryView::Slammer { owner: *owner },
            })
            .collect();
        let players = [0usize, 1].map(|i| PlayerView {
            health_count: self.players[i].health.len(),
            prize_count: self.players[i].prize.len(),
            actor_face: self.players[i].slammer.side,
        });
        Snapshot {
            stage: self.stage,
            phase: self.phase,
            turn: self.turn,
            step_count: self.step_count,
            shared_pool,
            players,
            winner: self.winner,
        }
    }

    /// Total tokens across health stacks, prize piles, and the pool
    /// (including its holding area). Constant after the deal.
    pub fn token_census(&self) -> usize {
        self.players.iter().map(Player::token_count).sum::<usize>() + self.arena.token_count()
    }

    fn advance<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        self.step_count += 1;
        match self.stage {
            Stage::Setup => self.setup_phase(rng),
            Stage::Loop => self.loop_phase(rng),
            // Terminal: accept the step, keep reporting the winner.
            Stage::End => Ok(()),
        }
    }

    fn setup_phase<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        match self.phase {
            0 => {
                // Decide turn order.
                self.turn = rng.gen_range(0..2);
                for player in &mut self.players {
                    player.backup.clear();
                }
            }
            1 => {
                // Reserved for house-rule negotiation.
            }
            2 => {
                // Deal, once: both stacks must be untouched.
                if self.players.iter().all(|p| p.health.is_empty()) {
                    let mut id = 0u32;
                    for player in &mut self.players {
                        for _ in 0..DEAL_PER_PLAYER {
                            player.health.push(Puck::basic(id));
                            id += 1;
                        }
                    }
                }
            }
            3 => {
                self.build_arena();
            }
            4 => {
                for player in &mut self.players {
                    player.slammer = Slammer::new(1);
                }
            }
            _ => {
                return Err(EngineError::InvalidPhaseTransition {
                    stage: self.stage,
                    phase: self.phase,
                })
            }
        }
        self.phase += 1;
        if self.phase > 4 {
            self.stage = Stage::Loop;
            self.phase = 0;
        }
        Ok(())
    }

    /// Alternately draw one puck from each seat into the pool until it holds
    /// eight. A seat with nothing left is skipped; if both run dry the pool
    /// stays short and play proceeds.
    fn build_arena(&mut self) {
        let mut contributor = 0;
        while self.arena.entries.len() < ARENA_TARGET {
            if self.players.iter().all(|p| p.health.is_empty()) {
                break;
            }
            if let Some(puck) = self.players[contributor].health.pop() {
                self.arena.entries.push(ArenaEntry::Puck(puck));
            }
            contributor = 1 - contributor;
        }
    }

    fn loop_phase<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        match self.phase {
            0 => self.top_off(),
            1 => self.knockout_check(),
            2 => self.count_attacks(),
            3 => self.make_attacks(rng),
            4 => {
                // Discard phase. The sole place the turn pointer moves.
                self.turn = 1 - self.turn;
            }
            5 => {
                self.check_for_winner();
            }
            _ => {
                return Err(EngineError::InvalidPhaseTransition {
                    stage: self.stage,
                    phase: self.phase,
                })
            }
        }
        if self.stage == Stage::End {
            self.phase = 0;
        } else {
            self.phase = (self.phase + 1) % 6;
        }
        Ok(())
    }

    /// Phase 0: replenish the pool toward eight from the acting player's
    /// stack, after restoring that stack from backup if a knockout emptied it.
    fn top_off(&mut self) {
        let acting = &mut self.players[self.turn];
        if acting.health.is_empty() && !acting.backup.is_empty() {
            acting.health = std::mem::take(&mut acting.backup);
        }
        while self.arena.entries.len() < ARENA_TARGET {
            match self.players[self.turn].health.pop() {
                Some(puck) => self.arena.entries.push(ArenaEntry::Puck(puck)),
                None => break,
            }
        }
    }

    /// Phase 1: if the non-acting player's stack is empty, their slammer
    /// becomes the pool's only target and the pucks wait in the holding area.
    fn knockout_check(&mut self) {
        let opponent = 1 - self.turn;
        if self.players[opponent].health.is_empty() && !self.arena.is_sole_slammer(opponent) {
            let stranded = std::mem::take(&mut self.players[opponent].health);
            self.players[opponent].backup = stranded;
            self.arena.isolate_slammer(opponent);
            debug!(seat = opponent, "knockout: slammer is the sole target");
        }
    }

    /// Phase 2: baseline of one attack. Item and ability effects that would
    /// raise this are a future hook.
    fn count_attacks(&mut self) {
        self.players[self.turn].attacks = 1;
    }

    /// Phase 3: spend the attack budget flipping pool pucks, duel the opposing
    /// slammer if it is the sole target, then tidy the pool.
    fn make_attacks<R: Rng>(&mut self, rng: &mut R) {
        let acting = self.turn;
        let opponent = 1 - acting;

        while self.players[acting].attacks > 0 {
            let power = self.players[acting].slammer.attack(rng);

            if self.arena.is_sole_slammer(opponent) && self.players[opponent].health.is_empty() {
                let resistance = self.players[opponent].slammer.attack(rng);
                if power > resistance {
                    self.players[opponent].slammer.side = Side::Up;
                    debug!(seat = opponent, "slammer flipped");
                }
            }

            let mut kept = Vec::with_capacity(self.arena.entries.len());
            for entry in self.arena.entries.drain(..) {
                match entry {
                    ArenaEntry::Puck(mut puck) => {
                        if power > puck.flip(rng) {
                            puck.side = Side::Up;
                            self.players[acting].prize.push(puck);
                        } else {
                            kept.push(ArenaEntry::Puck(puck));
                        }
                    }
                    slammer => kept.push(slammer),
                }
            }
            self.arena.entries = kept;

            self.players[acting].attacks -= 1;
        }

        // A player's own slammer is never a target for them.
        self.arena.remove_slammer(acting);

        // Bring displaced pucks back once the isolated target is gone, so the
        // pool never deadlocks empty.
        if self.arena.entries.is_empty() && !self.arena.displaced.is_empty() {
            self.arena.restore_displaced();
        }
    }

    /// Phase 5: a seat loses once its stack is empty and its slammer lies
    /// face up. Seat 0 is evaluated first, so a simultaneous wipe-out is
    /// deterministically a win for seat 1.
    fn check_for_winner(&mut self) {
        for seat in 0..2 {
            let player = &self.players[seat];
            if player.health.is_empty() && player.slammer.side == Side::Up {
                self.winner = Some(1 - seat);
                self.stage = Stage::End;
                debug!(winner = 1 - seat, "match over");
                return;
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
