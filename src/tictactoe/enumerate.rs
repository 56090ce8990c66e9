//! Enumeration of the decision-state space
//!
//! The solvers operate over every state reachable from the standard opening
//! position where a fixed player (the mover being optimized for) is to move,
//! plus every reachable terminal state. The set is closed under the
//! transition model: each successor of an enumerated decision state is
//! itself enumerated.

use std::collections::{HashSet, VecDeque};

use super::board::{BoardState, Player};

/// Collect all reachable decision states for the given perspective.
///
/// Starting from the empty board with X to move, every position reachable
/// through alternating play is visited once; states where `perspective` is
/// to move, as well as terminal states, are kept. The result is sorted by
/// label encoding so iteration order is deterministic across runs.
pub fn enumerate_decision_states(perspective: Player) -> Vec<BoardState> {
    let mut decision_states = HashSet::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    let root = BoardState::new();
    queue.push_back(root);
    visited.insert(root);

    while let Some(state) = queue.pop_front() {
        if state.to_move == perspective || state.is_terminal() {
            decision_states.insert(state);
        }

        if state.is_terminal() {
            continue;
        }

        for pos in state.empty_positions() {
            let Ok(next) = state.make_move(pos) else {
                continue;
            };
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let mut states: Vec<BoardState> = decision_states.into_iter().collect();
    states.sort_by_key(|s| s.encode());
    states
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumeration_only_contains_perspective_or_terminal_states() {
        let states = enumerate_decision_states(Player::X);
        assert!(
            states
                .iter()
                .all(|s| s.to_move == Player::X || s.is_terminal())
        );
    }

    #[test]
    fn enumeration_is_deterministic() {
        let first = enumerate_decision_states(Player::X);
        let second = enumerate_decision_states(Player::X);
        assert_eq!(first, second);
    }

    #[test]
    fn enumeration_contains_opening_state() {
        let states = enumerate_decision_states(Player::X);
        assert!(states.contains(&BoardState::new()));
    }

    #[test]
    fn enumeration_is_closed_under_two_ply_expansion() {
        let states = enumerate_decision_states(Player::X);
        let index: HashSet<BoardState> = states.iter().copied().collect();

        for state in &states {
            if state.is_terminal() {
                continue;
            }
            for pos in state.legal_moves() {
                let mid = state.make_move(pos).unwrap();
                if mid.is_terminal() {
                    assert!(index.contains(&mid), "terminal successor not enumerated");
                    continue;
                }
                for reply in mid.legal_moves() {
                    let next = mid.make_move(reply).unwrap();
                    assert!(index.contains(&next), "two-ply successor not enumerated");
                }
            }
        }
    }
}
