//! # Capacity Subcommand
//!
//! Shows or changes the batch capacity. A change only affects snapshots
//! committed afterwards.

use anyhow::Result;
use clap::{Args, Subcommand};
use rmt_core::OperatorId;
use serde_json::{json, Value};

use crate::{emit, FileRecorder, StateDir};

/// Arguments for `rmt capacity`.
#[derive(Args, Debug)]
pub struct CapacityArgs {
    #[command(subcommand)]
    pub command: CapacityCommand,
}

/// Capacity subcommands.
#[derive(Subcommand, Debug)]
pub enum CapacityCommand {
    /// Set the path limit; snapshots then hold at most 2^N receipts.
    Set {
        /// New path limit (0..=10).
        path_limit: u8,
        /// Caller identity; must match the configured operator.
        #[arg(long)]
        operator: String,
    },
    /// Show the current capacity.
    Show,
}

/// Execute `rmt capacity`.
pub fn run_capacity(args: &CapacityArgs, state: &StateDir) -> Result<u8> {
    let out = match &args.command {
        CapacityCommand::Set {
            path_limit,
            operator,
        } => cmd_set(state, *path_limit, operator)?,
        CapacityCommand::Show => describe(&state.open_recorder()?),
    };
    emit(&out)
}

fn describe(recorder: &FileRecorder) -> Value {
    json!({
        "operator": recorder.operator(),
        "path_limit": recorder.capacity().path_limit(),
        "max_leaves": recorder.max_leaves(),
    })
}

fn cmd_set(state: &StateDir, path_limit: u8, operator: &str) -> Result<Value> {
    let mut recorder = state.open_recorder()?;
    recorder.set_capacity(&OperatorId::new(operator), path_limit)?;
    state.save_config(recorder.config())?;
    Ok(describe(&recorder))
}
