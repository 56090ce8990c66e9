//! Agent that plays a trained policy

use super::Agent;
use crate::{Error, Result, policy::Policy, tictactoe::BoardState};

/// Plays the move a trained [`Policy`] assigns to each decision state.
///
/// The policy is fixed at construction; the agent never mutates it.
#[derive(Debug, Clone)]
pub struct PolicyAgent {
    policy: Policy,
    name: String,
}

impl PolicyAgent {
    /// Wrap a trained policy
    pub fn new(policy: Policy, name: impl Into<String>) -> Self {
        Self {
            policy,
            name: name.into(),
        }
    }

    /// The wrapped policy
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl Agent for PolicyAgent {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        self.policy
            .action_for(state)
            .map(|m| m.position)
            .ok_or_else(|| Error::UnreachableState {
                state: state.encode(),
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tictactoe::{Move, Player};

    #[test]
    fn test_plays_policy_move() {
        let state = BoardState::new();
        let policy = Policy::from_table(HashMap::from([(
            state,
            Move {
                position: 4,
                player: Player::X,
            },
        )]));

        let mut agent = PolicyAgent::new(policy, "trained");
        assert_eq!(agent.select_move(&state).unwrap(), 4);
        assert_eq!(agent.name(), "trained");
    }

    #[test]
    fn test_missing_state_is_an_error() {
        let mut agent = PolicyAgent::new(Policy::from_table(HashMap::new()), "trained");
        assert!(matches!(
            agent.select_move(&BoardState::new()),
            Err(Error::UnreachableState { .. })
        ));
    }
}
