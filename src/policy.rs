//! The policy artifact produced by the solvers

use std::collections::HashMap;

use crate::tictactoe::{BoardState, Move};

/// A mapping from non-terminal decision state to the chosen move.
///
/// A `Policy` is built exactly once, by a solver that ran to convergence,
/// and is read-only thereafter. Terminal states have no entry: the game is
/// already decided there and the policy has nothing to say.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    choices: HashMap<BoardState, Move>,
}

impl Policy {
    /// Build a policy from a completed solver table
    pub fn from_table(choices: HashMap<BoardState, Move>) -> Self {
        Self { choices }
    }

    /// Look up the chosen move for a state
    pub fn action_for(&self, state: &BoardState) -> Option<Move> {
        self.choices.get(state).copied()
    }

    /// Number of states the policy covers
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Whether the policy covers no states
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Iterate over the (state, move) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &Move)> {
        self.choices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_lookup() {
        let state = BoardState::new();
        let chosen = Move {
            position: 4,
            player: Player::X,
        };
        let policy = Policy::from_table(HashMap::from([(state, chosen)]));

        assert_eq!(policy.len(), 1);
        assert_eq!(policy.action_for(&state), Some(chosen));

        let other = state.make_move(0).unwrap().make_move(1).unwrap();
        assert_eq!(policy.action_for(&other), None);
    }
}
