//! Markov Decision Process model of Tic-Tac-Toe
//!
//! The model treats the optimized player's move as the action and folds the
//! opponent's uniformly random reply into the transition distribution, so a
//! single action leads to a probability distribution over next decision
//! states and local rewards.

pub mod model;
pub mod rewards;

pub use model::{Outcome, TransitionProb, TttMdp};
pub use rewards::RewardConfig;
