//! # Receipt Subcommand
//!
//! Local stand-in for the external ledger: appends receipts to
//! `ledger.json` and reads them back with their leaf hashes.

use anyhow::Result;
use clap::{Args, Subcommand};
use rmt_core::Receipt;
use rmt_state::ReceiptLedger;
use serde_json::{json, Value};

use crate::{emit, StateDir};

/// Arguments for `rmt receipt`.
#[derive(Args, Debug)]
pub struct ReceiptArgs {
    #[command(subcommand)]
    pub command: ReceiptCommand,
}

/// Receipt subcommands.
#[derive(Subcommand, Debug)]
pub enum ReceiptCommand {
    /// Append a receipt; the ledger assigns the next id.
    Add {
        /// Locked amount.
        amount: u128,
        /// Destination identifier, hashed as UTF-8 bytes.
        target: String,
    },
    /// Show a receipt and its leaf hash.
    Show {
        /// Receipt id.
        id: u64,
    },
}

/// Execute `rmt receipt`.
pub fn run_receipt(args: &ReceiptArgs, state: &StateDir) -> Result<u8> {
    let out = match &args.command {
        ReceiptCommand::Add { amount, target } => cmd_add(state, *amount, target)?,
        ReceiptCommand::Show { id } => cmd_show(state, *id)?,
    };
    emit(&out)
}

/// Receipt fields as printed. Amounts are strings so values past `u64`
/// survive JSON consumers.
pub(crate) fn describe(receipt: &Receipt) -> Value {
    json!({
        "id": receipt.id,
        "amount": receipt.amount.to_string(),
        "target": String::from_utf8_lossy(&receipt.target),
        "leaf": receipt.leaf_hash(),
    })
}

fn cmd_add(state: &StateDir, amount: u128, target: &str) -> Result<Value> {
    // Requires an initialized directory even though only the ledger changes.
    state.load_config()?;
    let ledger = state.load_ledger()?;
    let id = ledger.create_receipt(amount, target);
    state.save_ledger(&ledger)?;
    let receipt = ledger.receipt_at(id)?;
    tracing::info!(id, amount = %amount, "created receipt");
    Ok(describe(&receipt))
}

fn cmd_show(state: &StateDir, id: u64) -> Result<Value> {
    let ledger = state.load_ledger()?;
    Ok(describe(&ledger.receipt_at(id)?))
}
