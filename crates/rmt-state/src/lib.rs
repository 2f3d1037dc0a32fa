//! # rmt-state: Batch Recording
//!
//! Owns the only mutable state in the workspace: the append-only sequence
//! of committed snapshots and the batch capacity configuration.
//!
//! ## Modules
//!
//! - **Ledger** (`ledger.rs`): the collaborator contract (`count`,
//!   `receipt_at`) and an in-memory ledger for tests and the CLI.
//! - **Config** (`config.rs`): operator identity and `path_limit`, YAML
//!   loadable.
//! - **Recorder** (`recorder.rs`): `commit()` consumes pending receipts in
//!   capacity-bounded, aligned batches and appends one snapshot per batch.
//! - **Events** (`event.rs`): append-only log of every mutation.
//! - **Store** (`store.rs`): durable snapshot persistence.
//!
//! ## Mutation Model
//!
//! Every mutating operation takes `&mut self` and the caller's
//! [`OperatorId`](rmt_core::OperatorId). All validation and all tree
//! building happen before the first write, so a failed call leaves the
//! recorder untouched and a reader can never observe half a commit.

pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod recorder;
pub mod store;

pub use config::{BatchCapacity, RecorderConfig, DEFAULT_PATH_LIMIT, MAX_PATH_LIMIT};
pub use error::{ConfigError, RecorderError, StoreError};
pub use event::RecorderEvent;
pub use ledger::{InMemoryLedger, ReceiptLedger};
pub use recorder::{BatchRecorder, Snapshot};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
