//! Dynamic-programming solvers for the Tic-Tac-Toe MDP
//!
//! Two classical algorithms over the same transition model: Value Iteration
//! (a fixed number of Bellman-optimality sweeps followed by greedy policy
//! extraction) and Policy Iteration (alternating policy evaluation and
//! greedy improvement until the policy is a fixed point).
//!
//! Both solvers rebuild their value table wholesale on every sweep. The
//! table being read is never mutated mid-sweep, which keeps the backups
//! synchronous: each sweep is exactly one application of the corresponding
//! Bellman operator.

pub mod policy_iteration;
pub mod value_iteration;

use std::collections::HashMap;

pub use policy_iteration::{PolicyIterationAgent, PolicyIterationConfig, PolicyIterationReport};
pub use value_iteration::{ValueIterationAgent, ValueIterationConfig, ValueIterationReport};

use crate::{
    Error, Result,
    mdp::TransitionProb,
    tictactoe::BoardState,
};

/// A state-value function over the enumerated decision states
pub type ValueTable = HashMap<BoardState, f64>;

/// Validate a discount factor for use in a fixed-point solver.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] unless `0.0 <= discount < 1.0`.
/// A discount of 1.0 or more is rejected outright because the evaluation
/// loops are only guaranteed to converge for a strictly contracting backup.
pub fn validate_discount(discount: f64) -> Result<()> {
    if !discount.is_finite() || !(0.0..1.0).contains(&discount) {
        return Err(Error::InvalidConfiguration {
            message: format!("discount must satisfy 0.0 <= discount < 1.0, got {discount}"),
        });
    }
    Ok(())
}

/// Expected return of a transition distribution against a value table:
/// `Σ prob * (reward + discount * V(next))`.
///
/// # Errors
///
/// Returns [`Error::UnreachableState`] if any successor state is missing
/// from the table. The state space is closed, so a miss means the caller's
/// enumeration and the transition model disagree; continuing would corrupt
/// the value function silently.
pub(crate) fn expected_return(
    transitions: &[TransitionProb],
    values: &ValueTable,
    discount: f64,
) -> Result<f64> {
    let mut sum = 0.0;
    for tp in transitions {
        let next_value =
            values
                .get(&tp.outcome.next_state)
                .ok_or_else(|| Error::UnreachableState {
                    state: tp.outcome.next_state.encode(),
                })?;
        sum += tp.prob * (tp.outcome.local_reward + discount * next_value);
    }
    Ok(sum)
}
