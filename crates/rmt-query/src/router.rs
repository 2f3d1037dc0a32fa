//! # Query Router
//!
//! Read-only access to both kinds of tree:
//!
//! - **Ad-hoc range trees**, built on demand over any `[start, end]` of the
//!   ledger. Nothing is stored.
//! - **Committed snapshots**, read from the recorder's append-only sequence.
//!
//! Every query validates its arguments before touching the ledger and never
//! mutates recorder state, so any number of routers may read concurrently.

use rmt_core::{CommitmentError, NodeHash, Receipt};
use rmt_state::{BatchRecorder, MemoryStore, ReceiptLedger, Snapshot, SnapshotStore};
use rmt_tree::{build_tree, fold_root, generate_proof, MerkleProof, MerkleTree};
use serde::{Deserialize, Serialize};

/// An inclusion proof against a committed snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedProof {
    /// Snapshot the proof verifies against.
    pub tree_index: u64,
    /// Path from the receipt's leaf to that snapshot's root.
    #[serde(flatten)]
    pub proof: MerkleProof,
}

/// The live tree of one capacity-aligned batch.
///
/// `batch_index` counts batches of the current `max_leaves` from id 0. It is
/// not a committed `tree_index`: once a partially filled batch has been
/// committed, its receipts can span several snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTree {
    /// `(n - 1) / max_leaves` for the requested total `n`.
    pub batch_index: u64,
    /// Tree over the batch's receipts present at that total.
    #[serde(flatten)]
    pub tree: MerkleTree,
}

/// Query facade over a [`BatchRecorder`] and its ledger.
#[derive(Debug)]
pub struct QueryRouter<'a, L, S = MemoryStore> {
    recorder: &'a BatchRecorder<L, S>,
}

impl<'a, L, S> Clone for QueryRouter<'a, L, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, L, S> Copy for QueryRouter<'a, L, S> {}

impl<'a, L: ReceiptLedger, S: SnapshotStore> QueryRouter<'a, L, S> {
    /// Route queries through `recorder`.
    pub fn new(recorder: &'a BatchRecorder<L, S>) -> Self {
        Self { recorder }
    }

    /// Receipts currently in the ledger.
    pub fn ledger_count(&self) -> u64 {
        self.recorder.ledger().count()
    }

    /// Current batch capacity.
    pub fn max_leaves(&self) -> u64 {
        self.recorder.max_leaves()
    }

    fn check_range(&self, start: u64, end: u64) -> Result<(), CommitmentError> {
        let count = self.ledger_count();
        if end < start || end >= count {
            return Err(CommitmentError::InvalidRange { start, end, count });
        }
        Ok(())
    }

    fn receipts(&self, start: u64, end: u64) -> Result<Vec<Receipt>, CommitmentError> {
        self.check_range(start, end)?;
        self.recorder.ledger().receipts_in(start, end)
    }

    // ── Ad-hoc ranges ───────────────────────────────────────────────

    /// Build the full tree over receipts `start..=end`.
    pub fn range_tree(&self, start: u64, end: u64) -> Result<MerkleTree, CommitmentError> {
        let receipts = self.receipts(start, end)?;
        let preimages: Vec<_> = receipts.iter().map(Receipt::preimage).collect();
        let tree = build_tree(start, &preimages)?;
        tracing::debug!(start, end, size = tree.size, root = %tree.root, "built range tree");
        Ok(tree)
    }

    /// Root of the tree over receipts `start..=end`, without keeping the
    /// intermediate levels.
    pub fn range_root(&self, start: u64, end: u64) -> Result<NodeHash, CommitmentError> {
        let leaves = self
            .receipts(start, end)?
            .iter()
            .map(Receipt::leaf_hash)
            .collect();
        fold_root(leaves)
    }

    /// Proof for receipt `id` within the tree over `start..=end`.
    pub fn prove_range(&self, id: u64, start: u64, end: u64) -> Result<MerkleProof, CommitmentError> {
        self.check_range(start, end)?;
        if id < start || id > end {
            return Err(CommitmentError::InvalidRange {
                start,
                end,
                count: self.ledger_count(),
            });
        }
        let tree = self.range_tree(start, end)?;
        let proof = generate_proof(&tree, id)?;
        tracing::debug!(id, start, end, path_length = proof.path_length, "generated range proof");
        Ok(proof)
    }

    // ── Committed snapshots ─────────────────────────────────────────

    /// Committed snapshot `tree_index`.
    pub fn snapshot(&self, tree_index: u64) -> Result<&'a Snapshot, CommitmentError> {
        self.recorder.snapshot(tree_index).ok_or_else(|| {
            CommitmentError::NotFound(format!(
                "snapshot {tree_index} (committed: {})",
                self.recorder.snapshots().len()
            ))
        })
    }

    /// Root of committed snapshot `tree_index`.
    pub fn snapshot_root(&self, tree_index: u64) -> Result<NodeHash, CommitmentError> {
        Ok(self.snapshot(tree_index)?.tree.root)
    }

    /// The batch tree as it stands once the ledger holds `n` receipts.
    ///
    /// The batch is the one receipt `n - 1` falls in under the current
    /// capacity. The tree is rebuilt from the live ledger over
    /// `[batch_start, min(n - 1, count - 1)]`, so it reflects receipts that
    /// have not been committed yet. The result carries a batch number, not a
    /// committed `tree_index`; use [`QueryRouter::snapshot`] for committed
    /// snapshots. Fails with `NotFound` for `n = 0` or when the batch has no
    /// receipts.
    pub fn snapshot_by_total(&self, n: u64) -> Result<BatchTree, CommitmentError> {
        let Some(last) = n.checked_sub(1) else {
            return Err(CommitmentError::NotFound("batch for total 0".to_string()));
        };
        let max_leaves = self.max_leaves();
        let batch_index = last / max_leaves;
        let batch_start = batch_index * max_leaves;
        let count = self.ledger_count();
        if batch_start >= count {
            return Err(CommitmentError::NotFound(format!(
                "batch {batch_index} has no receipts (ledger holds {count})"
            )));
        }
        let end = last.min(count - 1);
        Ok(BatchTree {
            batch_index,
            tree: self.range_tree(batch_start, end)?,
        })
    }

    /// Proof for receipt `id` against the committed snapshot containing it.
    pub fn prove_committed(&self, id: u64) -> Result<CommittedProof, CommitmentError> {
        let snapshot = self.recorder.snapshot_containing(id).ok_or_else(|| {
            CommitmentError::NotFound(format!(
                "receipt {id} is not committed (next unrecorded: {})",
                self.recorder.next_unrecorded_id()
            ))
        })?;
        let proof = generate_proof(&snapshot.tree, id)?;
        tracing::debug!(
            id,
            tree_index = snapshot.tree_index,
            path_length = proof.path_length,
            "generated committed proof"
        );
        Ok(CommittedProof {
            tree_index: snapshot.tree_index,
            proof,
        })
    }
}
