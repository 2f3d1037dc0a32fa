//! # Receipts and Leaf Preimages
//!
//! A [`Receipt`] is owned by the external ledger; this workspace only reads
//! it. Ids are dense, start at 0, and follow creation order.
//!
//! A [`LeafPreimage`] is the borrowed `(amount, target, id)` triple that the
//! hash primitive consumes. It is never stored on its own.

use serde::{Deserialize, Serialize};

use crate::digest::{leaf_hash, NodeHash};

/// A ledger receipt as reported by the ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Sequential id assigned by the ledger.
    pub id: u64,
    /// Locked amount.
    pub amount: u128,
    /// Opaque destination identifier, hashed verbatim.
    pub target: Vec<u8>,
}

impl Receipt {
    /// Create a receipt.
    pub fn new(id: u64, amount: u128, target: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            amount,
            target: target.into(),
        }
    }

    /// Borrow the fields that make up this receipt's leaf.
    pub fn preimage(&self) -> LeafPreimage<'_> {
        LeafPreimage {
            amount: self.amount,
            target: &self.target,
            id: self.id,
        }
    }

    /// The leaf hash committing to this receipt.
    pub fn leaf_hash(&self) -> NodeHash {
        leaf_hash(&self.preimage())
    }
}

/// The hashed fields of one receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafPreimage<'a> {
    /// Locked amount.
    pub amount: u128,
    /// Destination identifier bytes.
    pub target: &'a [u8],
    /// Receipt id.
    pub id: u64,
}

impl LeafPreimage<'_> {
    /// Hash this preimage into a leaf node.
    pub fn hash(&self) -> NodeHash {
        leaf_hash(self)
    }
}
