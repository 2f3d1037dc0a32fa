//! # Recorder Events
//!
//! Append-only notification log. One entry per committed snapshot and per
//! administrative change, in the order they happened.

use rmt_core::{NodeHash, OperatorId};
use serde::{Deserialize, Serialize};

/// A state change made by the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecorderEvent {
    /// A new snapshot was appended.
    TreeCommitted {
        /// Index of the new snapshot.
        tree_index: u64,
        /// First receipt id in the snapshot.
        first_id: u64,
        /// Number of receipts in the snapshot.
        count: u64,
        /// Snapshot root.
        root: NodeHash,
    },
    /// Batch capacity was reconfigured.
    CapacityChanged {
        /// New path limit.
        path_limit: u8,
        /// New maximum receipts per snapshot.
        max_leaves: u64,
    },
    /// The ledger collaborator was swapped.
    LedgerReplaced {
        /// Receipt count reported by the new ledger.
        count: u64,
    },
    /// Authority moved to a new operator.
    OperatorTransferred {
        /// Previous operator.
        from: OperatorId,
        /// New operator.
        to: OperatorId,
    },
}

impl RecorderEvent {
    /// The committed tree index, for `TreeCommitted` events.
    pub fn tree_index(&self) -> Option<u64> {
        match self {
            Self::TreeCommitted { tree_index, .. } => Some(*tree_index),
            _ => None,
        }
    }
}
