//! Value Iteration solver

use std::collections::HashMap;

use serde::Serialize;

use super::{ValueTable, expected_return, validate_discount};
use crate::{
    Error, Result,
    mdp::TttMdp,
    policy::Policy,
    tictactoe::{BoardState, Move, Player, enumerate_decision_states},
};

/// Configuration for the Value Iteration solver
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValueIterationConfig {
    /// Discount factor applied to successor-state values
    pub discount: f64,
    /// Number of synchronous Bellman-optimality sweeps to perform.
    ///
    /// A fixed sweep count, not a convergence test: for the small state
    /// space here the backup contracts fast enough that a handful of
    /// sweeps reaches the fixed point to within policy-relevant precision.
    pub sweeps: usize,
}

impl ValueIterationConfig {
    /// Set the discount factor
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Set the sweep count
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an out-of-range discount
    /// or a zero sweep count.
    pub fn validate(&self) -> Result<()> {
        validate_discount(self.discount)?;
        if self.sweeps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "sweep count must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            sweeps: 10,
        }
    }
}

/// Summary of a completed Value Iteration run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValueIterationReport {
    /// Number of enumerated decision states (including terminals)
    pub states: usize,
    /// Sweeps performed
    pub sweeps: usize,
}

/// Computes the optimal state-value function by repeated Bellman-optimality
/// backups, then derives a greedy policy from the converged values.
#[derive(Debug, Clone)]
pub struct ValueIterationAgent {
    mdp: TttMdp,
    config: ValueIterationConfig,
    states: Vec<BoardState>,
    values: ValueTable,
}

impl ValueIterationAgent {
    /// Create a solver over the full X-perspective decision-state space,
    /// with every state's value initialized to 0.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration is
    /// invalid.
    pub fn new(mdp: TttMdp, config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;
        let states = enumerate_decision_states(Player::X);
        let values = states.iter().map(|s| (*s, 0.0)).collect();
        Ok(Self {
            mdp,
            config,
            states,
            values,
        })
    }

    /// The current value table
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Look up the value of a state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreachableState`] if the state was not enumerated.
    pub fn value_of(&self, state: &BoardState) -> Result<f64> {
        self.values
            .get(state)
            .copied()
            .ok_or_else(|| Error::UnreachableState {
                state: state.encode(),
            })
    }

    /// Summary of the configured run
    pub fn report(&self) -> ValueIterationReport {
        ValueIterationReport {
            states: self.states.len(),
            sweeps: self.config.sweeps,
        }
    }

    /// One synchronous Bellman-optimality sweep: a pure function from the
    /// table being read to a freshly built successor table.
    fn sweep(&self, current: &ValueTable) -> Result<ValueTable> {
        let mut next = ValueTable::with_capacity(current.len());

        for g in &self.states {
            // Terminal value stays pinned at exactly 0.0: the reward for
            // reaching the terminal was paid on the transition entering it.
            if g.is_terminal() {
                next.insert(*g, 0.0);
                continue;
            }

            let moves = g.legal_moves();
            if moves.is_empty() {
                return Err(Error::NoActionsAvailable { state: g.encode() });
            }

            let mut max = f64::NEG_INFINITY;
            for position in moves {
                let action = Move {
                    position,
                    player: g.to_move,
                };
                let transitions = self.mdp.generate_transitions(g, &action)?;
                let q = expected_return(&transitions, current, self.config.discount)?;
                if q > max {
                    max = q;
                }
            }
            next.insert(*g, max);
        }

        Ok(next)
    }

    /// Perform the configured number of sweeps, replacing the value table
    /// wholesale after each one.
    pub fn iterate(&mut self) -> Result<()> {
        for _ in 0..self.config.sweeps {
            self.values = self.sweep(&self.values)?;
        }
        Ok(())
    }

    /// Derive the greedy policy from the current value table.
    ///
    /// Each non-terminal state gets the move maximizing
    /// `Q(g,m) = Σ prob * (reward + discount * V(next))`. Ties are broken
    /// by a single left-to-right scan over the legal moves where an
    /// incumbent is replaced on `>=`, so the last move achieving the
    /// maximum wins. Downstream reproducibility depends on this convention.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActionsAvailable`] if a non-terminal state has no
    /// legal moves; no partial policy is produced.
    pub fn extract_policy(&self) -> Result<Policy> {
        let mut choices = HashMap::new();

        for g in &self.states {
            if g.is_terminal() {
                continue;
            }

            let mut max = f64::NEG_INFINITY;
            let mut best: Option<Move> = None;
            for position in g.legal_moves() {
                let action = Move {
                    position,
                    player: g.to_move,
                };
                let transitions = self.mdp.generate_transitions(g, &action)?;
                let q = expected_return(&transitions, &self.values, self.config.discount)?;
                if q >= max {
                    max = q;
                    best = Some(action);
                }
            }

            let chosen = best.ok_or_else(|| Error::NoActionsAvailable {
                state: g.encode(),
            })?;
            choices.insert(*g, chosen);
        }

        Ok(Policy::from_table(choices))
    }

    /// Run the sweeps and extract the resulting policy
    pub fn train(&mut self) -> Result<Policy> {
        self.iterate()?;
        self.extract_policy()
    }
}
