//! # Commit Subcommand
//!
//! Commits every pending receipt into one or more snapshots and persists
//! them to `snapshots.json`.

use anyhow::Result;
use clap::Args;
use rmt_core::OperatorId;
use serde_json::{json, Value};

use crate::{emit, StateDir};

/// Arguments for `rmt commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Caller identity; must match the configured operator.
    #[arg(long)]
    pub operator: String,
}

/// Execute `rmt commit`.
pub fn run_commit(args: &CommitArgs, state: &StateDir) -> Result<u8> {
    emit(&cmd_commit(args, state)?)
}

fn cmd_commit(args: &CommitArgs, state: &StateDir) -> Result<Value> {
    let mut recorder = state.open_recorder()?;
    let indices = recorder.commit(&OperatorId::new(&args.operator))?;

    let snapshots: Vec<Value> = indices
        .iter()
        .filter_map(|&i| recorder.snapshot(i))
        .map(|s| {
            json!({
                "tree_index": s.tree_index,
                "first_id": s.tree.first_id,
                "count": s.tree.count,
                "root": s.tree.root,
            })
        })
        .collect();
    Ok(json!({
        "committed": indices,
        "next_unrecorded_id": recorder.next_unrecorded_id(),
        "snapshots": snapshots,
    }))
}
