//! Export command - convert a policy file to CSV

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{export::write_policy_csv, serialization::SavedPolicy};

#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Path to a trained `.pol` policy file
    #[arg(long, default_value = "trained.pol")]
    pub policy: PathBuf,

    /// Where to write the CSV
    #[arg(long, default_value = "policy.csv")]
    pub output: PathBuf,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let saved = SavedPolicy::load_from_file(&args.policy)
        .with_context(|| format!("failed to load policy from {}", args.policy.display()))?;
    let policy = saved.to_policy()?;

    // State values are not stored in policy files; the value column is
    // only populated when exporting directly after training.
    write_policy_csv(&args.output, &policy, None)
        .with_context(|| format!("failed to write CSV to {}", args.output.display()))?;

    println!(
        "exported {} states from {} policy to {}",
        policy.len(),
        saved.solver,
        args.output.display()
    );

    Ok(())
}
