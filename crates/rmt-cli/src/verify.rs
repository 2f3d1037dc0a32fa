//! # Verify Subcommand
//!
//! Recomputes a root from a leaf and its proof path without touching any
//! state. Exits with status 1 when the proof does not reproduce the root.

use anyhow::{bail, Result};
use clap::Args;
use rmt_core::NodeHash;
use rmt_tree::{compute_root_from_path, MerkleProof};
use serde_json::{json, Value};

use crate::emit;

/// Arguments for `rmt verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Leaf hash (64 hex chars).
    pub leaf: String,

    /// Expected root (64 hex chars).
    pub root: String,

    /// Sibling hashes, leaf level first, comma separated.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub siblings: Vec<String>,

    /// Position bits matching `--siblings`; `true` puts the sibling on the left.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub positions: Vec<bool>,
}

/// Execute `rmt verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let out = cmd_verify(args)?;
    let valid = out["valid"].as_bool().unwrap_or(false);
    emit(&out)?;
    Ok(if valid { 0 } else { 1 })
}

fn cmd_verify(args: &VerifyArgs) -> Result<Value> {
    if args.siblings.len() != args.positions.len() {
        bail!(
            "{} siblings but {} positions",
            args.siblings.len(),
            args.positions.len()
        );
    }
    let leaf = NodeHash::from_hex(&args.leaf)?;
    let root = NodeHash::from_hex(&args.root)?;
    let siblings = args
        .siblings
        .iter()
        .map(|s| NodeHash::from_hex(s))
        .collect::<Result<Vec<_>, _>>()?;
    let proof = MerkleProof {
        path_length: siblings.len() as u32,
        siblings,
        positions: args.positions.clone(),
    };

    let computed = compute_root_from_path(&leaf, &proof);
    let valid = computed == Some(root);
    tracing::debug!(valid, path_length = proof.path_length, "verified proof");
    Ok(json!({
        "valid": valid,
        "root": root,
        "computed_root": computed,
    }))
}
