//! # Recorder Configuration
//!
//! Operator identity and batch capacity. The capacity is expressed as a
//! `path_limit`: each committed snapshot holds at most `2^path_limit`
//! receipts, so every committed proof has at most `path_limit` steps.
//!
//! ```yaml
//! operator: alice
//! path_limit: 4
//! ```

use std::path::Path;

use rmt_core::{CommitmentError, OperatorId};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Absolute ceiling on `path_limit` (1024 leaves per snapshot).
pub const MAX_PATH_LIMIT: u8 = 10;

/// `path_limit` used when none is configured (16 leaves per snapshot).
pub const DEFAULT_PATH_LIMIT: u8 = 4;

/// Validated batch capacity, `max_leaves = 2^path_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BatchCapacity {
    path_limit: u8,
}

impl BatchCapacity {
    /// Validate a path limit. Fails with `LimitExceeded` above
    /// [`MAX_PATH_LIMIT`].
    pub fn new(path_limit: u8) -> Result<Self, CommitmentError> {
        if path_limit > MAX_PATH_LIMIT {
            return Err(CommitmentError::LimitExceeded {
                requested: path_limit,
                max: MAX_PATH_LIMIT,
            });
        }
        Ok(Self { path_limit })
    }

    /// The configured path limit.
    pub fn path_limit(&self) -> u8 {
        self.path_limit
    }

    /// Maximum receipts per snapshot.
    pub fn max_leaves(&self) -> u64 {
        1u64 << self.path_limit
    }
}

impl Default for BatchCapacity {
    fn default() -> Self {
        Self {
            path_limit: DEFAULT_PATH_LIMIT,
        }
    }
}

impl TryFrom<u8> for BatchCapacity {
    type Error = CommitmentError;

    fn try_from(path_limit: u8) -> Result<Self, Self::Error> {
        Self::new(path_limit)
    }
}

impl From<BatchCapacity> for u8 {
    fn from(capacity: BatchCapacity) -> Self {
        capacity.path_limit
    }
}

/// Configuration held by a batch recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// The only identity allowed to mutate the recorder.
    pub operator: OperatorId,
    /// Batch capacity for snapshots formed from now on.
    #[serde(rename = "path_limit", default)]
    pub capacity: BatchCapacity,
}

impl RecorderConfig {
    /// Configuration with the default capacity.
    pub fn new(operator: OperatorId) -> Self {
        Self {
            operator,
            capacity: BatchCapacity::default(),
        }
    }

    /// Replace the capacity, validating the path limit.
    pub fn with_path_limit(mut self, path_limit: u8) -> Result<Self, CommitmentError> {
        self.capacity = BatchCapacity::new(path_limit)?;
        Ok(self)
    }

    /// Parse from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Render as YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Write to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }
}
