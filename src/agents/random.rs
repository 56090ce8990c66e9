//! Uniform-random baseline agent

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::Agent;
use crate::{Error, Result, tictactoe::BoardState};

/// Picks uniformly at random among the legal moves
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    /// Create an agent with a non-deterministic seed
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create an agent with a fixed seed for reproducible games
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        state
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| Error::NoActionsAvailable {
                state: state.encode(),
            })
    }

    fn name(&self) -> &str {
        "random"
    }
}
