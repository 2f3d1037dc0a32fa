//! # Prove Subcommand
//!
//! Inclusion proofs for a receipt, either inside an ad-hoc range or against
//! the committed snapshot that holds it. Output includes the leaf and root
//! so it can be fed straight to `rmt verify`.

use anyhow::Result;
use clap::{Args, Subcommand};
use rmt_query::QueryRouter;
use rmt_state::ReceiptLedger;
use serde_json::{json, Value};

use crate::{emit, StateDir};

/// Arguments for `rmt prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    #[command(subcommand)]
    pub command: ProveCommand,
}

/// Prove subcommands.
#[derive(Subcommand, Debug)]
pub enum ProveCommand {
    /// Proof for receipt ID within the tree over START..=END.
    Range { id: u64, start: u64, end: u64 },
    /// Proof for receipt ID against its committed snapshot.
    Committed { id: u64 },
}

/// Execute `rmt prove`.
pub fn run_prove(args: &ProveArgs, state: &StateDir) -> Result<u8> {
    emit(&cmd_prove(&args.command, state)?)
}

fn cmd_prove(command: &ProveCommand, state: &StateDir) -> Result<Value> {
    let recorder = state.open_recorder()?;
    let router = QueryRouter::new(&recorder);
    let out = match *command {
        ProveCommand::Range { id, start, end } => {
            let proof = router.prove_range(id, start, end)?;
            json!({
                "id": id,
                "leaf": recorder.ledger().receipt_at(id)?.leaf_hash(),
                "root": router.range_root(start, end)?,
                "path_length": proof.path_length,
                "siblings": proof.siblings,
                "positions": proof.positions,
            })
        }
        ProveCommand::Committed { id } => {
            let committed = router.prove_committed(id)?;
            json!({
                "id": id,
                "tree_index": committed.tree_index,
                "leaf": recorder.ledger().receipt_at(id)?.leaf_hash(),
                "root": router.snapshot_root(committed.tree_index)?,
                "path_length": committed.proof.path_length,
                "siblings": committed.proof.siblings,
                "positions": committed.proof.positions,
            })
        }
    };
    Ok(out)
}
