//! Play command - human versus a trained policy

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agents::{HumanAgent, PolicyAgent},
    play::play_game,
    serialization::SavedPolicy,
    tictactoe::{GameOutcome, Player},
};

#[derive(Debug, Parser)]
pub struct PlayArgs {
    /// Path to a trained `.pol` policy file
    #[arg(long, default_value = "trained.pol")]
    pub policy: PathBuf,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let saved = SavedPolicy::load_from_file(&args.policy)
        .with_context(|| format!("failed to load policy from {}", args.policy.display()))?;
    let policy = saved.to_policy()?;

    println!(
        "loaded {} policy ({} states, discount {})",
        saved.solver,
        saved.len(),
        saved.discount
    );
    println!("the trained agent plays X; you play O");

    // The policy was trained for the X perspective, so the agent opens.
    let mut agent = PolicyAgent::new(policy, "trained");
    let mut human = HumanAgent::new();
    let outcome = play_game(&mut agent, &mut human, true)?;

    match outcome {
        GameOutcome::Win(Player::X) => println!("the trained agent wins"),
        GameOutcome::Win(Player::O) => println!("you win"),
        GameOutcome::Draw => println!("draw"),
    }

    Ok(())
}
