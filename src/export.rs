//! CSV export of trained policies
//!
//! One row per non-terminal decision state: its label, the move the policy
//! chose, and (when the caller still holds the solver's table) the state
//! value. Rows are sorted by label so diffs between runs are meaningful.

use std::path::Path;

use serde::Serialize;

use crate::{Result, policy::Policy, solvers::ValueTable};

/// A single row in the policy CSV export
#[derive(Debug, Clone, Serialize)]
struct PolicyRow {
    state: String,
    player: char,
    position: usize,
    value: Option<f64>,
}

/// Write a trained policy as CSV.
///
/// `values` is optional because the solvers discard their value table once
/// the policy is extracted; exports made from a policy file alone leave the
/// value column empty.
///
/// # Errors
///
/// Returns a CSV or IO error if the file cannot be written.
pub fn write_policy_csv<P: AsRef<Path>>(
    path: P,
    policy: &Policy,
    values: Option<&ValueTable>,
) -> Result<()> {
    let mut rows: Vec<PolicyRow> = policy
        .iter()
        .map(|(state, chosen)| PolicyRow {
            state: state.encode(),
            player: state.to_move.to_cell().to_char(),
            position: chosen.position,
            value: values.and_then(|table| table.get(state).copied()),
        })
        .collect();
    rows.sort_by(|a, b| a.state.cmp(&b.state));

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| crate::Error::Io {
        operation: "flush CSV export".to_string(),
        source,
    })?;

    Ok(())
}
