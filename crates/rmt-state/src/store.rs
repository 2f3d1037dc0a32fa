//! # Snapshot Persistence
//!
//! Durable, ordered storage for committed snapshots. A store only ever
//! grows: `append` takes a whole commit's worth of snapshots and either
//! persists all of them or none.
//!
//! ## Stored Invariants (checked on load)
//!
//! - `tree_index` is dense from 0.
//! - Snapshot `i + 1` starts right after snapshot `i` ends; snapshot 0
//!   starts at id 0.
//! - Every tree is well formed (`nodes.len() == size == 2N - 1`, root last).
//! - Every tree rebuilds from its own leaves to the stored nodes and root,
//!   so virtual slots hold the last real leaf.

use std::fs;
use std::path::{Path, PathBuf};

use rmt_tree::build_tree_from_leaves;

use crate::error::StoreError;
use crate::recorder::Snapshot;

/// Ordered, append-only snapshot storage.
pub trait SnapshotStore {
    /// All stored snapshots in `tree_index` order.
    fn load(&self) -> Result<Vec<Snapshot>, StoreError>;

    /// Persist a batch of new snapshots, all-or-nothing.
    fn append(&mut self, batch: &[Snapshot]) -> Result<(), StoreError>;
}

/// Check the stored invariants and return one past the last covered id.
pub fn validate_sequence(snapshots: &[Snapshot]) -> Result<u64, StoreError> {
    let mut next_id = 0u64;
    for (expected, snapshot) in snapshots.iter().enumerate() {
        if snapshot.tree_index != expected as u64 {
            return Err(StoreError::Corrupt(format!(
                "expected tree index {expected}, found {}",
                snapshot.tree_index
            )));
        }
        if snapshot.tree.first_id != next_id {
            return Err(StoreError::Corrupt(format!(
                "tree {expected} starts at id {}, expected {next_id}",
                snapshot.tree.first_id
            )));
        }
        if !snapshot.tree.is_well_formed() {
            return Err(StoreError::Corrupt(format!(
                "tree {expected} has a malformed node layout"
            )));
        }
        let leaves = snapshot.tree.nodes[..snapshot.tree.count as usize].to_vec();
        let rebuilt = build_tree_from_leaves(snapshot.tree.first_id, leaves)
            .map_err(|e| StoreError::Corrupt(format!("tree {expected}: {e}")))?;
        if rebuilt != snapshot.tree {
            return Err(StoreError::Corrupt(format!(
                "tree {expected} does not match the hashes of its leaves"
            )));
        }
        next_id = snapshot.tree.first_id + snapshot.tree.count;
    }
    Ok(next_id)
}

/// Volatile store. Useful for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshots: Vec<Snapshot>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Vec<Snapshot>, StoreError> {
        Ok(self.snapshots.clone())
    }

    fn append(&mut self, batch: &[Snapshot]) -> Result<(), StoreError> {
        self.snapshots.extend_from_slice(batch);
        Ok(())
    }
}

/// Snapshots kept as a JSON array in a single file.
///
/// Appends write the full array to a sibling temporary file and rename it
/// over the original, so the file on disk always holds a complete sequence.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    snapshots: Vec<Snapshot>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`, validating any existing
    /// content.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshots = if path.exists() {
            let bytes = fs::read(&path)?;
            let snapshots: Vec<Snapshot> = serde_json::from_slice(&bytes)?;
            validate_sequence(&snapshots)?;
            snapshots
        } else {
            Vec::new()
        };
        Ok(Self { path, snapshots })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Snapshot>, StoreError> {
        Ok(self.snapshots.clone())
    }

    fn append(&mut self, batch: &[Snapshot]) -> Result<(), StoreError> {
        let mut next = self.snapshots.clone();
        next.extend_from_slice(batch);
        validate_sequence(&next)?;

        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_vec_pretty(&next)?)?;
        fs::rename(&tmp, &self.path)?;

        self.snapshots = next;
        Ok(())
    }
}
