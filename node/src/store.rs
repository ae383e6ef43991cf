//! Snapshot persistence

use anyhow::{Context, Result};
use ledger_state::Snapshot;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Single-file snapshot store
///
/// Writes go to a sibling `.tmp` file that is renamed over the previous
/// snapshot, so a crash never leaves a half-written file behind.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Last persisted snapshot, `None` if nothing was saved yet
    pub fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)
            .context(format!("Failed to open snapshot {}", self.path.display()))?;
        let snapshot: Snapshot = bincode::deserialize_from(BufReader::new(file))
            .context(format!("Failed to decode snapshot {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .context(format!("Failed to create directory {}", dir.display()))?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        {
            let file = File::create(&tmp)
                .context(format!("Failed to create {}", tmp.display()))?;
            let mut writer = BufWriter::new(file);
            bincode::serialize_into(&mut writer, snapshot).context("Failed to encode snapshot")?;
            writer.flush().context("Failed to flush snapshot")?;
        }
        fs::rename(&tmp, &self.path)
            .context(format!("Failed to move snapshot into {}", self.path.display()))?;

        log::debug!("Saved snapshot at height {} to {}", snapshot.height, self.path.display());
        Ok(())
    }
}
