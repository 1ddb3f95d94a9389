//! File-based ledger storage.
//!
//! The ledger is stored as one versioned JSON snapshot, written atomically
//! via temp file + rename. Loading is fail-open: a missing or unreadable
//! snapshot yields an empty ledger rather than blocking the drill.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::default_ledger_path;
use crate::error::{FailOpen, Result, SimileError};
use crate::ledger::PerformanceLedger;
use crate::storage::LedgerStore;

/// Current snapshot schema version.
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk envelope around the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerSnapshot {
    /// Schema version for forward migrations.
    v: u32,
    /// When the snapshot was written.
    saved_at: DateTime<Utc>,
    /// The counters themselves.
    ledger: PerformanceLedger,
}

/// File-backed ledger store.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    /// Create a store at the default location (`~/.simile/ledger.json`).
    pub fn new() -> Result<Self> {
        Self::with_path(default_ledger_path())
    }

    /// Create a store at a custom path, creating parent directories.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SimileError::storage(parent, e))?;
            }
        }
        Ok(Self { path })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ledger.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn read_snapshot(&self) -> Result<Option<LedgerSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| SimileError::storage(&self.path, e))?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&content)?;
        if snapshot.v > SNAPSHOT_VERSION {
            return Err(SimileError::serde(format!(
                "ledger snapshot version {} is newer than supported {}",
                snapshot.v, SNAPSHOT_VERSION
            )));
        }
        Ok(Some(snapshot))
    }
}

impl LedgerStore for FileLedgerStore {
    fn load(&self) -> Result<PerformanceLedger> {
        // Corrupt or unreadable snapshots degrade to an empty ledger; the
        // next save overwrites them.
        let snapshot = self.read_snapshot().fail_open_default("loading ledger");
        Ok(snapshot.map(|s| s.ledger).unwrap_or_default())
    }

    fn save(&self, ledger: &PerformanceLedger) -> Result<()> {
        let snapshot = LedgerSnapshot {
            v: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            ledger: ledger.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let temp_path = self.temp_path();
        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| SimileError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| SimileError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| SimileError::storage(&temp_path, e))?;
        }
        // Rename is atomic on POSIX.
        fs::rename(&temp_path, &self.path).map_err(|e| SimileError::storage(&self.path, e))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| SimileError::storage(&self.path, e))?;
        }
        let temp_path = self.temp_path();
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        Ok(())
    }
}
