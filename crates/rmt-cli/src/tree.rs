//! # Tree Subcommand
//!
//! Read-only tree queries: ad-hoc ranges over the live ledger, committed
//! snapshots, and the batch tree for a given ledger total.

use anyhow::Result;
use clap::{Args, Subcommand};
use rmt_query::QueryRouter;
use serde_json::{json, Value};

use crate::{emit, StateDir};

/// Arguments for `rmt tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub command: TreeCommand,
}

/// Tree subcommands.
#[derive(Subcommand, Debug)]
pub enum TreeCommand {
    /// Full tree over receipts START..=END.
    Range { start: u64, end: u64 },
    /// Root only, over receipts START..=END.
    Root { start: u64, end: u64 },
    /// Committed snapshot by index.
    Snapshot { index: u64 },
    /// Live batch tree as of a ledger total of N receipts, keyed by
    /// `batch_index` rather than a committed snapshot index.
    Total { n: u64 },
}

/// Execute `rmt tree`.
pub fn run_tree(args: &TreeArgs, state: &StateDir) -> Result<u8> {
    emit(&cmd_tree(&args.command, state)?)
}

fn cmd_tree(command: &TreeCommand, state: &StateDir) -> Result<Value> {
    let recorder = state.open_recorder()?;
    let router = QueryRouter::new(&recorder);
    let out = match *command {
        TreeCommand::Range { start, end } => serde_json::to_value(router.range_tree(start, end)?)?,
        TreeCommand::Root { start, end } => json!({
            "start": start,
            "end": end,
            "root": router.range_root(start, end)?,
        }),
        TreeCommand::Snapshot { index } => serde_json::to_value(router.snapshot(index)?)?,
        TreeCommand::Total { n } => serde_json::to_value(router.snapshot_by_total(n)?)?,
    };
    Ok(out)
}
