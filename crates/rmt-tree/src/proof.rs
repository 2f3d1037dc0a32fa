//! # Inclusion Proofs
//!
//! A proof is the list of sibling hashes on the path from a leaf slot to the
//! root, with one position bit per level.
//!
//! ## Position Bits
//!
//! `positions[i] == true` means the sibling at level `i` is the LEFT operand
//! (the path node is a right child). `false` means the sibling is the RIGHT
//! operand.
//!
//! ```text
//! cur = leaf
//! for i in 0..path_length:
//!     cur = if positions[i] { H(siblings[i] || cur) } else { H(cur || siblings[i]) }
//! assert cur == root
//! ```

use rmt_core::{node_hash, CommitmentError, NodeHash};
use serde::{Deserialize, Serialize};

use crate::tree::{value_at, MerkleTree};

/// Sibling path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Number of levels traversed, `log2(N)`.
    pub path_length: u32,
    /// Sibling hash at each level, leaf level first.
    pub siblings: Vec<NodeHash>,
    /// Whether the sibling at each level is the left operand.
    pub positions: Vec<bool>,
}

impl MerkleProof {
    /// Whether the three parallel fields agree in length.
    pub fn is_consistent(&self) -> bool {
        self.siblings.len() == self.path_length as usize
            && self.positions.len() == self.path_length as usize
    }
}

/// Generate the inclusion proof for receipt `id` in `tree`.
///
/// Fails with `OutOfRange` if `id` is not one of the tree's real receipts.
pub fn generate_proof(tree: &MerkleTree, id: u64) -> Result<MerkleProof, CommitmentError> {
    if !tree.contains(id) {
        return Err(CommitmentError::OutOfRange {
            id,
            count: tree.first_id + tree.count,
        });
    }

    let depth = tree.depth();
    let mut idx = (id - tree.first_id) as usize;
    let mut siblings = Vec::with_capacity(depth as usize);
    let mut positions = Vec::with_capacity(depth as usize);

    for level in 0..depth {
        let nodes = tree.level(level).ok_or_else(|| {
            CommitmentError::NotFound(format!("level {level} missing from tree layout"))
        })?;
        let sibling = value_at(nodes, idx ^ 1).ok_or_else(|| {
            CommitmentError::NotFound(format!("level {level} of tree layout is empty"))
        })?;
        siblings.push(sibling);
        positions.push(idx & 1 == 1);
        idx /= 2;
    }

    Ok(MerkleProof {
        path_length: depth,
        siblings,
        positions,
    })
}

/// Recombine `leaf` with its path. Returns `None` if the proof is
/// internally inconsistent.
pub fn compute_root_from_path(leaf: &NodeHash, proof: &MerkleProof) -> Option<NodeHash> {
    if !proof.is_consistent() {
        return None;
    }
    let root = proof
        .siblings
        .iter()
        .zip(&proof.positions)
        .fold(*leaf, |cur, (sibling, left)| {
            if *left {
                node_hash(sibling, &cur)
            } else {
                node_hash(&cur, sibling)
            }
        });
    Some(root)
}

/// Verify that `leaf` is included under `root` via `proof`.
pub fn verify_proof(leaf: &NodeHash, proof: &MerkleProof, root: &NodeHash) -> bool {
    compute_root_from_path(leaf, proof).as_ref() == Some(root)
}
