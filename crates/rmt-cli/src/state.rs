//! # State Directory
//!
//! Everything the CLI persists lives under one directory (default `.rmt`):
//!
//! ```text
//! .rmt/
//!   config.yaml      operator and path_limit
//!   ledger.json      receipts in id order
//!   snapshots.json   committed snapshots, tree_index order
//! ```
//!
//! The ledger file stands in for the external receipt ledger. Snapshots go
//! through [`JsonFileStore`], which validates the sequence on open.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rmt_core::Receipt;
use rmt_state::{BatchRecorder, InMemoryLedger, JsonFileStore, RecorderConfig};

/// A recorder over the file-backed ledger and snapshot store.
pub type FileRecorder = BatchRecorder<InMemoryLedger, JsonFileStore>;

/// Paths of the CLI state files.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.join("ledger.json")
    }

    pub fn snapshots_path(&self) -> PathBuf {
        self.root.join("snapshots.json")
    }

    /// Create the directory with `config` and an empty ledger. Fails if a
    /// configuration already exists.
    pub fn init(&self, config: &RecorderConfig) -> Result<()> {
        if self.config_path().exists() {
            bail!("already initialized: {}", self.config_path().display());
        }
        fs::create_dir_all(&self.root).with_context(|| {
            format!("failed to create state directory {}", self.root.display())
        })?;
        self.save_config(config)?;
        self.save_ledger(&InMemoryLedger::new())?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<RecorderConfig> {
        let path = self.config_path();
        if !path.exists() {
            bail!(
                "no configuration at {} (run `rmt init` first)",
                path.display()
            );
        }
        RecorderConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn save_config(&self, config: &RecorderConfig) -> Result<()> {
        let path = self.config_path();
        config
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Load the ledger. A missing file is an empty ledger.
    pub fn load_ledger(&self) -> Result<InMemoryLedger> {
        let path = self.ledger_path();
        if !path.exists() {
            return Ok(InMemoryLedger::new());
        }
        let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let receipts: Vec<Receipt> = serde_json::from_slice(&bytes)
            .with_context(|| format!("malformed ledger {}", path.display()))?;
        Ok(InMemoryLedger::from_receipts(receipts)?)
    }

    /// Write the ledger through a temporary file.
    pub fn save_ledger(&self, ledger: &InMemoryLedger) -> Result<()> {
        let path = self.ledger_path();
        let tmp = self.root.join("ledger.json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&ledger.receipts())?)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }

    /// Restore the recorder from config, ledger, and snapshot files.
    pub fn open_recorder(&self) -> Result<FileRecorder> {
        let config = self.load_config()?;
        let ledger = self.load_ledger()?;
        let store = JsonFileStore::open(self.snapshots_path())
            .with_context(|| format!("failed to open {}", self.snapshots_path().display()))?;
        let recorder = BatchRecorder::open(config, ledger, store)?;
        tracing::debug!(
            root = %self.root.display(),
            snapshots = recorder.snapshots().len(),
            "opened state directory"
        );
        Ok(recorder)
    }
}
