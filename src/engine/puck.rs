//! Pucks and slammers, the two kinds of flippable piece.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which way a piece is lying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Down,
    Up,
}

/// A single puck. Identity is the `id` assigned at the initial deal and is
/// stable for the whole match; only `side` ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Puck {
    pub id: u32,
    pub name: String,
    pub weight: u8,
    pub side: Side,
}

impl Puck {
    pub fn new(id: u32, name: impl Into<String>, weight: u8) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            side: Side::Down,
        }
    }

    /// The plain puck dealt into health stacks.
    pub fn basic(id: u32) -> Self {
        Self::new(id, "pog", 1)
    }

    /// Resistance roll for one attack: uniform in [1,100] plus the puck's
    /// weight, capped at 100. Does not mutate `side`; the caller decides
    /// whether the puck flips.
    pub fn flip<R: Rng>(&self, rng: &mut R) -> u8 {
        let roll = rng.gen_range(1..=100u16) + u16::from(self.weight);
        roll.min(100) as u8
    }
}

/// A player's single persistent attacking/defending piece.
///
/// `side == Up` doubles as the defeated flag checked by win detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slammer {
    pub weight: u8,
    pub side: Side,
}

impl Slammer {
    pub fn new(weight: u8) -> Self {
        Self {
            weight,
            side: Side::Down,
        }
    }

    /// Attack strength for one throw: uniform in [0,100]. No mutation.
    pub fn attack<R: Rng>(&self, rng: &mut R) -> u8 {
        rng.gen_range(0..=100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn flip_stays_in_range_and_respects_weight_cap() {
        let mut rng = StdRng::seed_from_u64(7);
        let light = Puck::new(0, "pog", 0);
        let heavy = Puck::new(1, "pog", 100);
        for _ in 0..1000 {
            let r = light.flip(&mut rng);
            assert!((1..=100).contains(&r));
            // A weight of 100 always saturates the cap.
            assert_eq!(heavy.flip(&mut rng), 100);
        }
    }

    #[test]
    fn flip_does_not_mutate_side() {
        let mut rng = StdRng::seed_from_u64(7);
        let puck = Puck::basic(0);
        let _ = puck.flip(&mut rng);
        assert_eq!(puck.side, Side::Down);
    }

    #[test]
    fn attack_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let slammer = Slammer::new(1);
        for _ in 0..1000 {
            assert!(slammer.attack(&mut rng) <= 100);
        }
    }
}
