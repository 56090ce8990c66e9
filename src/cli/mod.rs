//! CLI infrastructure for the ttt-mdp toolkit
//!
//! This module provides the command-line interface for training solvers,
//! playing against a trained policy, and exporting policies for analysis.

pub mod commands;
