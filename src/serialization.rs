//! Policy file serialization
//!
//! Trained policies are stored as `.pol` files in MessagePack format. The
//! on-disk form keys states by their label encoding so files stay readable
//! by external tooling and stable across internal type changes.

use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    policy::Policy,
    tictactoe::{BoardState, Move},
};

/// Which solver produced a saved policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    ValueIteration,
    PolicyIteration,
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverKind::ValueIteration => write!(f, "value-iteration"),
            SolverKind::PolicyIteration => write!(f, "policy-iteration"),
        }
    }
}

/// Serializable snapshot of a trained policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub version: u32,
    pub solver: SolverKind,
    pub discount: f64,
    /// State label -> chosen cell, sorted for stable output
    entries: BTreeMap<String, usize>,
}

impl SavedPolicy {
    pub const VERSION: u32 = 1;

    /// Snapshot a trained policy together with its provenance
    pub fn from_policy(policy: &Policy, solver: SolverKind, discount: f64) -> Self {
        let entries = policy
            .iter()
            .map(|(state, chosen)| (state.encode(), chosen.position))
            .collect();
        Self {
            version: Self::VERSION,
            solver,
            discount,
            entries,
        }
    }

    /// Number of stored state entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the in-memory policy, validating every entry.
    ///
    /// # Errors
    ///
    /// Fails if the format version is unsupported, a state label does not
    /// parse, or a stored move is not legal in its state.
    pub fn to_policy(&self) -> Result<Policy> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "unsupported policy file version: {} (expected {})",
                self.version,
                Self::VERSION
            ));
        }

        let mut table = HashMap::with_capacity(self.entries.len());
        for (label, &position) in &self.entries {
            let state = BoardState::from_label(label)
                .with_context(|| format!("invalid state label '{label}' in policy file"))?;
            if !state.legal_moves().contains(&position) {
                return Err(anyhow!(
                    "stored move {position} is not legal in state '{label}'"
                ));
            }
            table.insert(
                state,
                Move {
                    position,
                    player: state.to_move,
                },
            );
        }

        Ok(Policy::from_table(table))
    }

    /// Write the snapshot to a `.pol` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("failed to serialize policy")?;

        Ok(())
    }

    /// Read a snapshot from a `.pol` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("failed to deserialize policy")
    }
}
