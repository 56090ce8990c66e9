//! Optimal Tic-Tac-Toe policies via dynamic programming
//!
//! This crate provides:
//! - A Markov Decision Process model of Tic-Tac-Toe with a stochastic
//!   opponent folded into the transition distribution
//! - Value Iteration and Policy Iteration solvers over the enumerated
//!   decision-state space
//! - An immutable policy artifact, playing agents, and a match runner
//! - Policy file serialization and CSV export

pub mod agents;
pub mod cli;
pub mod error;
pub mod export;
pub mod mdp;
pub mod play;
pub mod policy;
pub mod serialization;
pub mod solvers;
pub mod tictactoe;

pub use error::{Error, Result};
pub use mdp::{RewardConfig, TttMdp};
pub use policy::Policy;
pub use solvers::{
    PolicyIterationAgent, PolicyIterationConfig, ValueIterationAgent, ValueIterationConfig,
};
