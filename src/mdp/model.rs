//! Transition generation for the Tic-Tac-Toe MDP

use serde::{Deserialize, Serialize};

use super::rewards::RewardConfig;
use crate::tictactoe::{BoardState, LineAnalyzer, Move};

/// Tolerance for the probability normalization invariant
const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// A resulting state reached by applying an action, with the local reward
/// received for that transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// State the action was taken in
    pub state: BoardState,
    /// The action taken
    pub action: Move,
    /// Reward earned on this transition
    pub local_reward: f64,
    /// Decision state (or terminal state) reached
    pub next_state: BoardState,
}

/// The probability mass of reaching an outcome when an action is taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionProb {
    pub prob: f64,
    pub outcome: Outcome,
}

/// The Tic-Tac-Toe MDP transition model.
///
/// Transitions are a pure function of `(state, action)` and the reward
/// configuration: the agent's move is applied deterministically, and a
/// non-terminal intermediate position is expanded over every legal opponent
/// reply with uniform probability. The model is read-only after
/// construction and safe to share between any number of solvers.
#[derive(Debug, Clone, Copy)]
pub struct TttMdp {
    rewards: RewardConfig,
}

impl TttMdp {
    /// Create a model with the given reward configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if any reward value is
    /// not finite.
    pub fn new(rewards: RewardConfig) -> Result<Self, crate::Error> {
        rewards.validate()?;
        Ok(Self { rewards })
    }

    /// The reward configuration this model applies
    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Generate the full transition distribution for taking `action` in
    /// `state`.
    ///
    /// Entries are produced in ascending opponent-reply order, and their
    /// probabilities sum to 1.0 within floating tolerance.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::TerminalTransition`] if `state` is terminal
    /// - [`crate::Error::InvalidMove`] / [`crate::Error::InvalidPosition`]
    ///   if `action` is not legal in `state`
    /// - [`crate::Error::DegenerateDistribution`] if the generated
    ///   probabilities fail the normalization invariant
    pub fn generate_transitions(
        &self,
        state: &BoardState,
        action: &Move,
    ) -> Result<Vec<TransitionProb>, crate::Error> {
        if state.is_terminal() {
            return Err(crate::Error::TerminalTransition {
                state: state.encode(),
            });
        }
        if action.player != state.to_move {
            return Err(crate::Error::InvalidMove {
                position: action.position,
            });
        }

        let agent = state.to_move;
        let intermediate = state.make_move(action.position)?;

        // Agent's own move ends the game: a single deterministic transition.
        if intermediate.is_terminal() {
            let local_reward = if intermediate.winner() == Some(agent) {
                self.rewards.win_reward
            } else {
                self.rewards.draw_reward
            };
            return Ok(vec![TransitionProb {
                prob: 1.0,
                outcome: Outcome {
                    state: *state,
                    action: *action,
                    local_reward,
                    next_state: intermediate,
                },
            }]);
        }

        // Otherwise the opponent replies uniformly at random.
        let replies = intermediate.legal_moves();
        let prob = 1.0 / replies.len() as f64;
        let opponent = agent.opponent();

        let mut transitions = Vec::with_capacity(replies.len());
        for reply in replies {
            let next_state = intermediate.make_move(reply)?;
            let local_reward = if LineAnalyzer::completes_line(&intermediate.cells, opponent, reply)
            {
                self.rewards.lose_reward
            } else if next_state.is_draw() {
                self.rewards.draw_reward
            } else {
                self.rewards.living_reward
            };
            transitions.push(TransitionProb {
                prob,
                outcome: Outcome {
                    state: *state,
                    action: *action,
                    local_reward,
                    next_state,
                },
            });
        }

        let total: f64 = transitions.iter().map(|tp| tp.prob).sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(crate::Error::DegenerateDistribution {
                state: state.encode(),
                position: action.position,
                total,
            });
        }

        Ok(transitions)
    }
}

impl Default for TttMdp {
    fn default() -> Self {
        Self {
            rewards: RewardConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    fn mdp() -> TttMdp {
        TttMdp::new(RewardConfig::default()).unwrap()
    }

    fn x_move(position: usize) -> Move {
        Move {
            position,
            player: Player::X,
        }
    }

    #[test]
    fn test_winning_move_is_deterministic() {
        // X completes the top row immediately
        let state = BoardState::from_label("XX....OO._X").unwrap();
        let transitions = mdp().generate_transitions(&state, &x_move(2)).unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].prob, 1.0);
        assert_eq!(transitions[0].outcome.local_reward, 10.0);
        assert!(transitions[0].outcome.next_state.is_terminal());
    }

    #[test]
    fn test_opponent_replies_are_uniform() {
        let state = BoardState::new();
        let transitions = mdp().generate_transitions(&state, &x_move(4)).unwrap();

        // Eight empty cells remain for O's reply
        assert_eq!(transitions.len(), 8);
        for tp in &transitions {
            assert!((tp.prob - 1.0 / 8.0).abs() < 1e-12);
            assert_eq!(tp.outcome.local_reward, -1.0);
            assert_eq!(tp.outcome.next_state.to_move, Player::X);
        }
        let total: f64 = transitions.iter().map(|tp| tp.prob).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_losing_reply_earns_lose_reward() {
        // O threatens the bottom row; any X move that doesn't block lets O win
        let state = BoardState::from_label("XX....OO._X").unwrap();
        let transitions = mdp().generate_transitions(&state, &x_move(3)).unwrap();

        let losing: Vec<_> = transitions
            .iter()
            .filter(|tp| tp.outcome.local_reward == -50.0)
            .collect();
        assert_eq!(losing.len(), 1);
        assert_eq!(losing[0].outcome.next_state.winner(), Some(Player::O));
    }

    #[test]
    fn test_terminal_state_is_rejected() {
        let terminal = BoardState::from_label("XXX...OO._O").unwrap();
        let result = mdp().generate_transitions(&terminal, &x_move(3));
        assert!(matches!(
            result,
            Err(crate::Error::TerminalTransition { .. })
        ));
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let state = BoardState::new();
        // Wrong mover
        let bad_player = Move {
            position: 0,
            player: Player::O,
        };
        assert!(matches!(
            mdp().generate_transitions(&state, &bad_player),
            Err(crate::Error::InvalidMove { .. })
        ));

        // Occupied cell
        let occupied = state.make_move(0).unwrap().make_move(1).unwrap();
        assert!(matches!(
            mdp().generate_transitions(&occupied, &x_move(0)),
            Err(crate::Error::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_draw_by_agent_move() {
        // One empty cell left; X fills it for a draw
        let state = BoardState::from_label("XOXXOOOX._X").unwrap();
        let transitions = mdp().generate_transitions(&state, &x_move(8)).unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].outcome.local_reward, 0.0);
        assert!(transitions[0].outcome.next_state.is_draw());
    }
}
