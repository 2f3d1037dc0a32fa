//! # Init Subcommand
//!
//! Creates the state directory: `config.yaml` and an empty `ledger.json`.

use anyhow::Result;
use clap::Args;
use rmt_core::OperatorId;
use rmt_state::{RecorderConfig, DEFAULT_PATH_LIMIT};
use serde_json::{json, Value};

use crate::{emit, StateDir};

/// Arguments for `rmt init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Operator allowed to commit and reconfigure.
    #[arg(long)]
    pub operator: String,

    /// Snapshot capacity exponent; each snapshot holds at most 2^N receipts.
    #[arg(long, default_value_t = DEFAULT_PATH_LIMIT)]
    pub path_limit: u8,
}

/// Execute `rmt init`.
pub fn run_init(args: &InitArgs, state: &StateDir) -> Result<u8> {
    emit(&cmd_init(args, state)?)
}

fn cmd_init(args: &InitArgs, state: &StateDir) -> Result<Value> {
    let config =
        RecorderConfig::new(OperatorId::new(&args.operator)).with_path_limit(args.path_limit)?;
    state.init(&config)?;
    tracing::info!(
        root = %state.root().display(),
        operator = %config.operator,
        "initialized state directory"
    );
    Ok(json!({
        "state_dir": state.root().display().to_string(),
        "operator": config.operator,
        "path_limit": config.capacity.path_limit(),
        "max_leaves": config.capacity.max_leaves(),
    }))
}
