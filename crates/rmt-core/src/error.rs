//! # Error Types
//!
//! The failure taxonomy shared by tree building, proof generation, batch
//! recording, and queries. All errors are reported immediately to the
//! caller; nothing is retried or silently corrected, and every check runs
//! before any state is mutated.

use thiserror::Error;

/// Errors from commitment operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    /// Malformed or out-of-bounds `[start, end]` range.
    #[error("invalid range [{start}, {end}] for ledger of {count} receipts")]
    InvalidRange {
        /// Requested first id.
        start: u64,
        /// Requested last id (inclusive).
        end: u64,
        /// Ledger receipt count (or range size, for id-in-range checks).
        count: u64,
    },

    /// Receipt id beyond the ledger's current count.
    #[error("receipt {id} out of range (ledger holds {count})")]
    OutOfRange {
        /// The requested receipt id.
        id: u64,
        /// Ledger receipt count.
        count: u64,
    },

    /// Unknown snapshot index, or id not covered by any committed snapshot.
    #[error("not found: {0}")]
    NotFound(String),

    /// Commit requested while no receipts are pending.
    #[error("nothing pending: {recorded} receipts recorded, ledger holds {total}")]
    NothingPending {
        /// One past the last committed id.
        recorded: u64,
        /// Ledger receipt count.
        total: u64,
    },

    /// Capacity reconfiguration beyond the absolute ceiling.
    #[error("path limit {requested} exceeds maximum {max}")]
    LimitExceeded {
        /// The requested path limit.
        requested: u8,
        /// The absolute ceiling.
        max: u8,
    },

    /// Non-operator attempted a mutating operation.
    #[error("unauthorized caller: {caller}")]
    Unauthorized {
        /// The rejected caller identity.
        caller: String,
    },

    /// Malformed digest input.
    #[error("digest error: {0}")]
    Digest(String),
}
