//! # rmt-query: Range and Snapshot Queries
//!
//! [`QueryRouter`] answers every read against a [`BatchRecorder`]:
//!
//! | Query                 | Source          | Fails with                   |
//! |-----------------------|-----------------|------------------------------|
//! | `range_tree`          | live ledger     | `InvalidRange`               |
//! | `range_root`          | live ledger     | `InvalidRange`               |
//! | `prove_range`         | live ledger     | `InvalidRange`, `OutOfRange` |
//! | `snapshot`            | committed       | `NotFound`                   |
//! | `snapshot_root`       | committed       | `NotFound`                   |
//! | `snapshot_by_total`   | live ledger     | `NotFound`                   |
//! | `prove_committed`     | committed       | `NotFound`                   |
//!
//! [`BatchRecorder`]: rmt_state::BatchRecorder

pub mod router;

pub use router::{BatchTree, CommittedProof, QueryRouter};
