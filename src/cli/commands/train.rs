//! Train command - solve the MDP and save the resulting policy

use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    export::write_policy_csv,
    mdp::{RewardConfig, TttMdp},
    policy::Policy,
    serialization::{SavedPolicy, SolverKind},
    solvers::{
        PolicyIterationAgent, PolicyIterationConfig, ValueIterationAgent, ValueIterationConfig,
        ValueTable,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverChoice {
    /// Fixed number of Bellman-optimality sweeps, then greedy extraction
    ValueIteration,
    /// Alternate policy evaluation and improvement until a fixed point
    PolicyIteration,
}

#[derive(Debug, Parser)]
pub struct TrainArgs {
    /// Which solver to run
    #[arg(long, value_enum, default_value_t = SolverChoice::ValueIteration)]
    pub solver: SolverChoice,

    /// Discount factor (must be below 1.0)
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Number of sweeps (value iteration only)
    #[arg(long, default_value_t = 10)]
    pub sweeps: usize,

    /// Evaluation convergence threshold (policy iteration only)
    #[arg(long, default_value_t = 0.1)]
    pub delta: f64,

    /// Seed for the random initial policy (policy iteration only)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reward for a winning move
    #[arg(long, default_value_t = 10.0)]
    pub win_reward: f64,

    /// Reward when the opponent's reply wins
    #[arg(long, default_value_t = -50.0)]
    pub lose_reward: f64,

    /// Reward for a non-terminal transition
    #[arg(long, default_value_t = -1.0)]
    pub living_reward: f64,

    /// Reward for a drawing move
    #[arg(long, default_value_t = 0.0)]
    pub draw_reward: f64,

    /// Where to write the trained policy
    #[arg(long, default_value = "trained.pol")]
    pub output: PathBuf,

    /// Optional JSON training summary path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional CSV export of the trained policy and state values
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrainingSummary {
    solver: String,
    discount: f64,
    states: usize,
    policy_states: usize,
    sweeps: Option<usize>,
    outer_iterations: Option<usize>,
    evaluation_sweeps: Option<usize>,
}

struct TrainedRun {
    policy: Policy,
    values: ValueTable,
    summary: TrainingSummary,
}

fn run_value_iteration(mdp: TttMdp, args: &TrainArgs) -> Result<TrainedRun> {
    let config = ValueIterationConfig::default()
        .with_discount(args.discount)
        .with_sweeps(args.sweeps);
    let mut agent = ValueIterationAgent::new(mdp, config)?;
    let policy = agent.train()?;
    let report = agent.report();

    Ok(TrainedRun {
        summary: TrainingSummary {
            solver: SolverKind::ValueIteration.to_string(),
            discount: args.discount,
            states: report.states,
            policy_states: policy.len(),
            sweeps: Some(report.sweeps),
            outer_iterations: None,
            evaluation_sweeps: None,
        },
        values: agent.values().clone(),
        policy,
    })
}

fn run_policy_iteration(mdp: TttMdp, args: &TrainArgs) -> Result<TrainedRun> {
    let mut config = PolicyIterationConfig::default()
        .with_discount(args.discount)
        .with_delta(args.delta);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut agent = PolicyIterationAgent::new(mdp, config)?;
    let policy = agent.train()?;
    let report = agent.report();

    Ok(TrainedRun {
        summary: TrainingSummary {
            solver: SolverKind::PolicyIteration.to_string(),
            discount: args.discount,
            states: report.states,
            policy_states: policy.len(),
            sweeps: None,
            outer_iterations: Some(report.outer_iterations),
            evaluation_sweeps: Some(report.evaluation_sweeps),
        },
        values: agent.values().clone(),
        policy,
    })
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let rewards = RewardConfig::new(
        args.win_reward,
        args.lose_reward,
        args.living_reward,
        args.draw_reward,
    );
    let mdp = TttMdp::new(rewards)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .context("invalid progress template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("training with {:?}", args.solver));

    let run = match args.solver {
        SolverChoice::ValueIteration => run_value_iteration(mdp, &args)?,
        SolverChoice::PolicyIteration => run_policy_iteration(mdp, &args)?,
    };

    spinner.finish_with_message(format!(
        "trained {} decision states ({} in policy)",
        run.summary.states, run.summary.policy_states
    ));

    if let Some(sweeps) = run.summary.sweeps {
        println!("value iteration: {sweeps} sweeps");
    }
    if let (Some(outer), Some(evals)) = (
        run.summary.outer_iterations,
        run.summary.evaluation_sweeps,
    ) {
        println!("policy iteration: {outer} improvement rounds, {evals} evaluation sweeps");
    }

    let solver_kind = match args.solver {
        SolverChoice::ValueIteration => SolverKind::ValueIteration,
        SolverChoice::PolicyIteration => SolverKind::PolicyIteration,
    };
    SavedPolicy::from_policy(&run.policy, solver_kind, args.discount)
        .save_to_file(&args.output)
        .with_context(|| format!("failed to save policy to {}", args.output.display()))?;
    println!("policy written to {}", args.output.display());

    if let Some(path) = &args.summary {
        let file = File::create(path)
            .with_context(|| format!("failed to create summary file {}", path.display()))?;
        to_writer_pretty(file, &run.summary).context("failed to write training summary")?;
        println!("summary written to {}", path.display());
    }

    if let Some(path) = &args.csv {
        write_policy_csv(path, &run.policy, Some(&run.values))
            .with_context(|| format!("failed to write CSV export to {}", path.display()))?;
        println!("CSV export written to {}", path.display());
    }

    Ok(())
}
