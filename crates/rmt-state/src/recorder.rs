//! # Batch Recorder
//!
//! Consumes receipts from the ledger collaborator in capacity-bounded
//! batches and appends one immutable [`Snapshot`] per batch.
//!
//! ## Batch Boundaries
//!
//! Batches are cut on multiples of `max_leaves` counted from id 0. A commit
//! over a partially filled batch closes that batch at whatever the ledger
//! holds; the next commit starts a new snapshot at the next id and still
//! ends on the same boundary:
//!
//! ```text
//! max_leaves = 16, ledger grows 15 -> 17, commit after each step
//!   commit #1: [0, 14]                   (tree 0)
//!   commit #2: [15, 15], [16, 16]        (trees 1, 2)
//! ```
//!
//! ## Invariants
//!
//! - Snapshots are append-only; `(first_id, count, root)` never changes.
//! - `tree_index` equals position in the sequence.
//! - Snapshot ranges are contiguous and disjoint, starting at id 0.
//! - `next_unrecorded_id` is one past the last committed id.

use rmt_core::{CommitmentError, OperatorId};
use rmt_tree::{build_tree, MerkleTree};
use serde::{Deserialize, Serialize};

use crate::config::{BatchCapacity, RecorderConfig};
use crate::error::RecorderError;
use crate::event::RecorderEvent;
use crate::ledger::ReceiptLedger;
use crate::store::{validate_sequence, MemoryStore, SnapshotStore};

/// A committed tree and its position in the snapshot sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 0-based commit order.
    pub tree_index: u64,
    /// The committed tree.
    #[serde(flatten)]
    pub tree: MerkleTree,
}

/// Owner of the committed snapshot sequence and the capacity configuration.
#[derive(Debug)]
pub struct BatchRecorder<L, S = MemoryStore> {
    config: RecorderConfig,
    ledger: L,
    store: S,
    snapshots: Vec<Snapshot>,
    next_unrecorded_id: u64,
    events: Vec<RecorderEvent>,
}

impl<L: ReceiptLedger> BatchRecorder<L, MemoryStore> {
    /// A recorder with no history and a volatile store.
    pub fn new(config: RecorderConfig, ledger: L) -> Self {
        Self {
            config,
            ledger,
            store: MemoryStore::new(),
            snapshots: Vec::new(),
            next_unrecorded_id: 0,
            events: Vec::new(),
        }
    }
}

impl<L: ReceiptLedger, S: SnapshotStore> BatchRecorder<L, S> {
    /// Restore a recorder from `store`, validating the stored sequence.
    pub fn open(config: RecorderConfig, ledger: L, store: S) -> Result<Self, RecorderError> {
        let snapshots = store.load()?;
        let next_unrecorded_id = validate_sequence(&snapshots)?;
        tracing::debug!(
            snapshots = snapshots.len(),
            next_unrecorded_id,
            "restored batch recorder"
        );
        Ok(Self {
            config,
            ledger,
            store,
            snapshots,
            next_unrecorded_id,
            events: Vec::new(),
        })
    }

    // ── Read accessors ──────────────────────────────────────────────

    /// Current configuration.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// The operator allowed to mutate this recorder.
    pub fn operator(&self) -> &OperatorId {
        &self.config.operator
    }

    /// Current batch capacity.
    pub fn capacity(&self) -> BatchCapacity {
        self.config.capacity
    }

    /// Maximum receipts per snapshot formed from now on.
    pub fn max_leaves(&self) -> u64 {
        self.config.capacity.max_leaves()
    }

    /// The ledger collaborator.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The persistence backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All committed snapshots in commit order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Snapshot by index, if committed.
    pub fn snapshot(&self, tree_index: u64) -> Option<&Snapshot> {
        usize::try_from(tree_index)
            .ok()
            .and_then(|i| self.snapshots.get(i))
    }

    /// The committed snapshot whose range contains receipt `id`.
    pub fn snapshot_containing(&self, id: u64) -> Option<&Snapshot> {
        let after = self
            .snapshots
            .partition_point(|s| s.tree.first_id <= id);
        let candidate = self.snapshots.get(after.checked_sub(1)?)?;
        candidate.tree.contains(id).then_some(candidate)
    }

    /// One past the last committed receipt id.
    pub fn next_unrecorded_id(&self) -> u64 {
        self.next_unrecorded_id
    }

    /// Receipts in the ledger that no snapshot covers yet.
    pub fn pending(&self) -> u64 {
        self.ledger.count().saturating_sub(self.next_unrecorded_id)
    }

    /// Every state change so far, oldest first.
    pub fn events(&self) -> &[RecorderEvent] {
        &self.events
    }

    // ── Mutations (operator only) ───────────────────────────────────

    fn authorize(&self, caller: &OperatorId) -> Result<(), CommitmentError> {
        if caller != &self.config.operator {
            tracing::warn!(%caller, operator = %self.config.operator, "rejected unauthorized caller");
            return Err(CommitmentError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// Last id of the aligned batch that contains `id`.
    fn batch_end(&self, id: u64) -> u64 {
        let max_leaves = self.max_leaves();
        id - id % max_leaves + max_leaves - 1
    }

    /// Commit every pending receipt, one snapshot per batch.
    ///
    /// Returns the indices of the new snapshots. Fails with
    /// `NothingPending` if the ledger has no receipts past the last
    /// snapshot. Nothing is written unless every batch builds and the store
    /// accepts the whole commit.
    pub fn commit(&mut self, caller: &OperatorId) -> Result<Vec<u64>, RecorderError> {
        self.authorize(caller)?;

        let total = self.ledger.count();
        if total <= self.next_unrecorded_id {
            return Err(CommitmentError::NothingPending {
                recorded: self.next_unrecorded_id,
                total,
            }
            .into());
        }

        let mut batch = Vec::new();
        let mut next = self.next_unrecorded_id;
        while next < total {
            let end = self.batch_end(next).min(total - 1);
            let receipts = self.ledger.receipts_in(next, end)?;
            let preimages: Vec<_> = receipts.iter().map(|r| r.preimage()).collect();
            let tree = build_tree(next, &preimages)?;
            batch.push(Snapshot {
                tree_index: (self.snapshots.len() + batch.len()) as u64,
                tree,
            });
            next = end + 1;
        }

        self.store.append(&batch)?;

        let mut indices = Vec::with_capacity(batch.len());
        for snapshot in batch {
            tracing::info!(
                tree_index = snapshot.tree_index,
                first_id = snapshot.tree.first_id,
                count = snapshot.tree.count,
                root = %snapshot.tree.root,
                "committed receipt tree"
            );
            self.events.push(RecorderEvent::TreeCommitted {
                tree_index: snapshot.tree_index,
                first_id: snapshot.tree.first_id,
                count: snapshot.tree.count,
                root: snapshot.tree.root,
            });
            indices.push(snapshot.tree_index);
            self.snapshots.push(snapshot);
        }
        self.next_unrecorded_id = next;

        Ok(indices)
    }

    /// Change the batch capacity to `2^path_limit`. Existing snapshots are
    /// unaffected.
    pub fn set_capacity(
        &mut self,
        caller: &OperatorId,
        path_limit: u8,
    ) -> Result<(), CommitmentError> {
        self.authorize(caller)?;
        let capacity = BatchCapacity::new(path_limit)?;
        self.config.capacity = capacity;

        tracing::info!(
            path_limit,
            max_leaves = capacity.max_leaves(),
            "changed batch capacity"
        );
        self.events.push(RecorderEvent::CapacityChanged {
            path_limit,
            max_leaves: capacity.max_leaves(),
        });
        Ok(())
    }

    /// Swap the ledger collaborator, returning the previous one.
    pub fn replace_ledger(&mut self, caller: &OperatorId, ledger: L) -> Result<L, CommitmentError> {
        self.authorize(caller)?;
        let count = ledger.count();
        let previous = std::mem::replace(&mut self.ledger, ledger);

        tracing::info!(count, "replaced receipt ledger");
        self.events.push(RecorderEvent::LedgerReplaced { count });
        Ok(previous)
    }

    /// Hand operator authority to `new_operator`.
    pub fn transfer_operator(
        &mut self,
        caller: &OperatorId,
        new_operator: OperatorId,
    ) -> Result<(), CommitmentError> {
        self.authorize(caller)?;
        let from = std::mem::replace(&mut self.config.operator, new_operator.clone());

        tracing::info!(%from, to = %new_operator, "transferred operator authority");
        self.events.push(RecorderEvent::OperatorTransferred {
            from,
            to: new_operator,
        });
        Ok(())
    }

    /// Release the ledger and store.
    pub fn into_parts(self) -> (L, S) {
        (self.ledger, self.store)
    }
}
