//! # Ledger Collaborator
//!
//! The receipt ledger is external: it creates receipts, assigns ids, and
//! holds custody of value. The recorder only needs two reads from it.
//!
//! ## Contract
//!
//! - `count()` is monotonically non-decreasing.
//! - Ids are dense in `0..count()`; `receipt_at(id)` fails with
//!   `OutOfRange` for `id >= count()`.

use std::sync::Arc;

use parking_lot::RwLock;
use rmt_core::{CommitmentError, Receipt};

/// Read access to an append-only receipt ledger.
pub trait ReceiptLedger {
    /// Total number of receipts created so far.
    fn count(&self) -> u64;

    /// The receipt with the given id.
    fn receipt_at(&self, id: u64) -> Result<Receipt, CommitmentError>;

    /// Receipts `start..=end`. Fails on the first missing id.
    fn receipts_in(&self, start: u64, end: u64) -> Result<Vec<Receipt>, CommitmentError> {
        (start..=end).map(|id| self.receipt_at(id)).collect()
    }
}

impl<T: ReceiptLedger + ?Sized> ReceiptLedger for &T {
    fn count(&self) -> u64 {
        (**self).count()
    }

    fn receipt_at(&self, id: u64) -> Result<Receipt, CommitmentError> {
        (**self).receipt_at(id)
    }
}

impl<T: ReceiptLedger + ?Sized> ReceiptLedger for Arc<T> {
    fn count(&self) -> u64 {
        (**self).count()
    }

    fn receipt_at(&self, id: u64) -> Result<Receipt, CommitmentError> {
        (**self).receipt_at(id)
    }
}

/// An in-memory ledger with interior mutability, so it can be shared with
/// a recorder while receipts keep arriving.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    receipts: RwLock<Vec<Receipt>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a ledger from stored receipts. Ids must be exactly
    /// `0, 1, 2, ...`.
    pub fn from_receipts(receipts: Vec<Receipt>) -> Result<Self, CommitmentError> {
        for (expected, receipt) in receipts.iter().enumerate() {
            if receipt.id != expected as u64 {
                return Err(CommitmentError::OutOfRange {
                    id: receipt.id,
                    count: expected as u64,
                });
            }
        }
        Ok(Self {
            receipts: RwLock::new(receipts),
        })
    }

    /// Create a receipt and return its id.
    pub fn create_receipt(&self, amount: u128, target: impl Into<Vec<u8>>) -> u64 {
        let mut receipts = self.receipts.write();
        let id = receipts.len() as u64;
        receipts.push(Receipt::new(id, amount, target));
        id
    }

    /// Copy of every receipt, in id order.
    pub fn receipts(&self) -> Vec<Receipt> {
        self.receipts.read().clone()
    }
}

impl ReceiptLedger for InMemoryLedger {
    fn count(&self) -> u64 {
        self.receipts.read().len() as u64
    }

    fn receipt_at(&self, id: u64) -> Result<Receipt, CommitmentError> {
        let receipts = self.receipts.read();
        usize::try_from(id)
            .ok()
            .and_then(|i| receipts.get(i))
            .cloned()
            .ok_or(CommitmentError::OutOfRange {
                id,
                count: receipts.len() as u64,
            })
    }

    fn receipts_in(&self, start: u64, end: u64) -> Result<Vec<Receipt>, CommitmentError> {
        let receipts = self.receipts.read();
        let count = receipts.len() as u64;
        if end >= count {
            return Err(CommitmentError::OutOfRange { id: end, count });
        }
        if start > end {
            return Ok(Vec::new());
        }
        Ok(receipts[start as usize..=end as usize].to_vec())
    }
}
