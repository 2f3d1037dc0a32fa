//! # rmt-tree: Padded Merkle Trees and Inclusion Proofs
//!
//! - **Tree building** ([`tree`]): given the leaves of a contiguous receipt
//!   range, lays out a binary tree of `N = 2^ceil(log2(max(count, 2)))`
//!   leaf slots in level order. Slots past the last real leaf take that
//!   leaf's hash.
//! - **Proof generation** ([`proof`]): walks from a leaf slot to the root,
//!   collecting the sibling at each level and whether it sits on the left.
//! - **Verification** ([`proof::verify_proof`]): recombines a leaf with its
//!   path and compares against a root.
//!
//! Everything here is a pure function of its inputs. Capacity limits are a
//! recorder concern; this crate builds trees of any non-zero size.

pub mod proof;
pub mod tree;

pub use proof::{compute_root_from_path, generate_proof, verify_proof, MerkleProof};
pub use tree::{build_tree, build_tree_from_leaves, fold_root, leaf_slots, value_at, MerkleTree};
