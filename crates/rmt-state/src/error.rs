//! # Recorder Error Types
//!
//! Persistence and configuration failures layered over the shared
//! [`CommitmentError`] taxonomy.

use rmt_core::CommitmentError;
use thiserror::Error;

/// Errors from snapshot persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored snapshots violate the sequence or layout invariants.
    #[error("corrupt snapshot store: {0}")]
    Corrupt(String),
}

/// Errors from recorder operations that may touch persistence.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Validation or authorization failure.
    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    /// Persistence failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RecorderError {
    /// The underlying commitment error, if this is one.
    pub fn as_commitment(&self) -> Option<&CommitmentError> {
        match self {
            Self::Commitment(e) => Some(e),
            Self::Store(_) => None,
        }
    }
}

/// Errors loading or saving recorder configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration values out of bounds.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] CommitmentError),
}
