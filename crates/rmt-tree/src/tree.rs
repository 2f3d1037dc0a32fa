//! # Tree Builder
//!
//! Builds the full level-order node layout of a padded binary Merkle tree.
//!
//! ## Layout
//!
//! For `count` real leaves, `N` is the smallest power of two with
//! `N >= max(count, 2)`, and the tree has `size = 2N - 1` nodes:
//!
//! ```text
//! nodes = [ leaf 0 .. leaf count-1, dup .. dup,   // level 0, N slots
//!           level 1 (N/2 nodes),
//!           ...,
//!           root ]                                // nodes[size - 1]
//! ```
//!
//! Level `k` has `N >> k` slots and starts at offset `2N - 2(N >> k)`.
//! Every virtual slot at level 0 takes the hash of the last real leaf;
//! above level 0 every level is even-sized, so no further padding exists.

use rmt_core::{node_hash, CommitmentError, LeafPreimage, NodeHash};
use serde::{Deserialize, Serialize};

/// A built Merkle tree over a contiguous receipt range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    /// Root node; equal to `nodes[size - 1]`.
    pub root: NodeHash,
    /// Id of the first receipt covered.
    pub first_id: u64,
    /// Number of real receipts covered.
    pub count: u64,
    /// Total node count, `2N - 1`.
    pub size: u64,
    /// All nodes in level order, root last.
    pub nodes: Vec<NodeHash>,
}

/// Number of level-0 slots for a tree over `count` leaves.
///
/// The smallest power of two that is at least `max(count, 2)`. A lone leaf
/// is always paired.
pub fn leaf_slots(count: u64) -> u64 {
    count.max(2).next_power_of_two()
}

/// Value of slot `slot` in a level whose first `materialized.len()` slots
/// are real.
///
/// Slots past the materialized prefix take the value of the last real node.
/// Returns `None` only for an empty level.
pub fn value_at(materialized: &[NodeHash], slot: usize) -> Option<NodeHash> {
    materialized
        .get(slot)
        .or_else(|| materialized.last())
        .copied()
}

/// Build a tree over a contiguous run of receipt preimages starting at
/// `first_id`.
///
/// Fails with `InvalidRange` if `preimages` is empty or its ids are not
/// exactly `first_id, first_id + 1, ...`.
pub fn build_tree(
    first_id: u64,
    preimages: &[LeafPreimage<'_>],
) -> Result<MerkleTree, CommitmentError> {
    for (offset, preimage) in preimages.iter().enumerate() {
        if preimage.id != first_id + offset as u64 {
            return Err(CommitmentError::InvalidRange {
                start: first_id,
                end: preimage.id,
                count: preimages.len() as u64,
            });
        }
    }
    let leaves = preimages.iter().map(LeafPreimage::hash).collect();
    build_tree_from_leaves(first_id, leaves)
}

/// Build a tree from already-hashed leaves.
///
/// Fails with `InvalidRange` if `leaves` is empty.
pub fn build_tree_from_leaves(
    first_id: u64,
    leaves: Vec<NodeHash>,
) -> Result<MerkleTree, CommitmentError> {
    let count = leaves.len() as u64;
    if count == 0 {
        return Err(CommitmentError::InvalidRange {
            start: first_id,
            end: first_id.saturating_sub(1),
            count,
        });
    }

    let slots = leaf_slots(count) as usize;
    let size = 2 * slots - 1;
    let mut nodes = Vec::with_capacity(size);

    for slot in 0..slots {
        if let Some(value) = value_at(&leaves, slot) {
            nodes.push(value);
        }
    }

    let mut start = 0usize;
    let mut width = slots;
    while width > 1 {
        for i in (start..start + width).step_by(2) {
            let parent = node_hash(&nodes[i], &nodes[i + 1]);
            nodes.push(parent);
        }
        start += width;
        width /= 2;
    }

    let root = nodes[size - 1];
    Ok(MerkleTree {
        root,
        first_id,
        count,
        size: size as u64,
        nodes,
    })
}

/// Compute only the root of the tree over `leaves`, reusing the leaf buffer
/// for every level.
///
/// Returns the same value as `build_tree_from_leaves(_, leaves)?.root`.
pub fn fold_root(mut leaves: Vec<NodeHash>) -> Result<NodeHash, CommitmentError> {
    let count = leaves.len() as u64;
    let last = match leaves.last() {
        Some(last) => *last,
        None => {
            return Err(CommitmentError::InvalidRange {
                start: 0,
                end: 0,
                count,
            })
        }
    };
    leaves.resize(leaf_slots(count) as usize, last);

    let mut width = leaves.len();
    while width > 1 {
        for i in 0..width / 2 {
            leaves[i] = node_hash(&leaves[2 * i], &leaves[2 * i + 1]);
        }
        width /= 2;
    }
    Ok(leaves[0])
}

impl MerkleTree {
    /// Number of level-0 slots, `N`.
    pub fn leaf_slots(&self) -> u64 {
        (self.size + 1) / 2
    }

    /// Number of levels below the root, `log2(N)`.
    pub fn depth(&self) -> u32 {
        self.leaf_slots().trailing_zeros()
    }

    /// Id of the last real receipt covered.
    pub fn last_id(&self) -> u64 {
        self.first_id + self.count - 1
    }

    /// Whether `id` is one of the real receipts in this tree.
    pub fn contains(&self, id: u64) -> bool {
        id >= self.first_id && id <= self.last_id()
    }

    /// The nodes of level `level` (0 = leaves), or `None` above the root.
    pub fn level(&self, level: u32) -> Option<&[NodeHash]> {
        if level > self.depth() {
            return None;
        }
        let slots = self.leaf_slots() as usize;
        let width = slots >> level;
        let offset = 2 * slots - 2 * width;
        self.nodes.get(offset..offset + width)
    }

    /// Leaf hash of receipt `id`, if covered.
    pub fn leaf(&self, id: u64) -> Option<NodeHash> {
        if !self.contains(id) {
            return None;
        }
        self.nodes.get((id - self.first_id) as usize).copied()
    }

    /// Check the layout invariants: `size = 2N - 1` for `N = leaf_slots(count)`,
    /// `nodes.len() == size`, and the last node is the root.
    pub fn is_well_formed(&self) -> bool {
        let expected_size = self
            .count
            .max(2)
            .checked_next_power_of_two()
            .and_then(|n| n.checked_mul(2))
            .map(|n| n - 1);
        self.count > 0
            && expected_size == Some(self.size)
            && self.nodes.len() as u64 == self.size
            && self.nodes.last() == Some(&self.root)
    }
}
