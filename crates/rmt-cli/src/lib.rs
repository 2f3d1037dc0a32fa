//! # rmt-cli: Receipt Merkle Tree Operator CLI
//!
//! Drives the recorder and query router against a local state directory.
//! Every command prints pretty JSON on stdout; logs go to stderr.
//!
//! ## Subcommands
//!
//! - `rmt init`: Create the state directory with an operator and capacity.
//! - `rmt receipt`: Add receipts to the local ledger or show one.
//! - `rmt commit`: Commit pending receipts into snapshots.
//! - `rmt capacity`: Show or change the batch capacity.
//! - `rmt tree`: Range trees, range roots, snapshots, batch-by-total.
//! - `rmt prove`: Inclusion proofs against a range or a committed snapshot.
//! - `rmt verify`: Check a proof offline.
//!
//! ```bash
//! rmt init --operator alice
//! rmt receipt add 100000 AAAAAAAAA
//! rmt commit --operator alice
//! rmt prove committed 0
//! ```

pub mod capacity;
pub mod commit;
pub mod init;
pub mod prove;
pub mod receipt;
pub mod state;
pub mod tree;
pub mod verify;

use anyhow::Result;
use serde::Serialize;

pub use state::{FileRecorder, StateDir};

/// Print `value` as pretty JSON on stdout.
pub fn emit<T: Serialize>(value: &T) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(0)
}
