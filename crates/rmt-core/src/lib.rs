//! # rmt-core: Foundational Types for Receipt Merkle Commitments
//!
//! This crate is the leaf of the workspace DAG. It defines the hash
//! primitive every tree, proof, and snapshot is built from, plus the
//! value types shared by the upper layers.
//!
//! ## Key Design Principles
//!
//! 1. **One hash primitive.** Leaf hashing (`H_leaf`) and internal node
//!    hashing (`H_node`) live in [`digest`] and nowhere else. Operand order
//!    is positional; nothing is sorted or canonicalized.
//!
//! 2. **Fixed-width everything.** Integers are hashed as 32-byte big-endian
//!    words, digests are `[u8; 32]` newtypes. No truncation between levels.
//!
//! 3. **Explicit authority.** Mutating operations take an [`OperatorId`]
//!    and compare it against configuration. There is no ambient owner.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rmt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod receipt;

// Re-export primary types for ergonomic imports.
pub use digest::{be32, leaf_hash, node_hash, sha256, NodeHash};
pub use error::CommitmentError;
pub use identity::OperatorId;
pub use receipt::{LeafPreimage, Receipt};
