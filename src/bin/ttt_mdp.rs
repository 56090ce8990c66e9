//! ttt-mdp CLI - optimal Tic-Tac-Toe policies via dynamic programming
//!
//! This CLI provides a unified interface for:
//! - Training a policy with value iteration or policy iteration
//! - Playing interactively against a trained policy
//! - Exporting policies to CSV for analysis

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ttt-mdp")]
#[command(version, about = "Optimal Tic-Tac-Toe policies via dynamic programming", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the MDP and save the resulting policy
    Train(ttt_mdp::cli::commands::train::TrainArgs),

    /// Play against a trained policy
    Play(ttt_mdp::cli::commands::play::PlayArgs),

    /// Export a trained policy to CSV
    Export(ttt_mdp::cli::commands::export::ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => ttt_mdp::cli::commands::train::execute(args),
        Commands::Play(args) => ttt_mdp::cli::commands::play::execute(args),
        Commands::Export(args) => ttt_mdp::cli::commands::export::execute(args),
    }
}
