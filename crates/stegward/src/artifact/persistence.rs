//! Snapshot persistence for the artifact store - save/load JSON files.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::RwLock;

use crate::error::{Result, StegwardError};

use super::store::MemoryStore;
use super::Artifact;

impl MemoryStore {
    /// Load a store from a JSON snapshot file. Future mutations snapshot
    /// back to the same path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use stegward::MemoryStore;
    /// let store = MemoryStore::load("stegward.store.json").unwrap();
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            StegwardError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        let reader = BufReader::new(file);
        let artifacts: Vec<Artifact> = serde_json::from_reader(reader).map_err(|e| {
            StegwardError::Persistence(format!(
                "Failed to parse store snapshot '{}': {}",
                path.display(),
                e
            ))
        })?;

        let table: HashMap<String, Artifact> = artifacts
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        Ok(Self {
            artifacts: RwLock::new(table),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    /// Write the current table to the configured snapshot path, if any.
    pub(super) fn persist(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let mut artifacts: Vec<Artifact> = {
            let table = self.artifacts.read().map_err(|_| {
                StegwardError::Persistence("artifact table lock poisoned".to_string())
            })?;
            table.values().cloned().collect()
        };
        // Stable snapshot ordering keeps diffs readable.
        artifacts.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then(a.id.cmp(&b.id)));

        write_snapshot(&artifacts, path)
    }
}

/// Serialize artifacts to a pretty JSON snapshot file.
fn write_snapshot(artifacts: &[Artifact], path: &Path) -> Result<()> {
    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                StegwardError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        StegwardError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
    })?;

    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, artifacts).map_err(|e| {
        StegwardError::Persistence(format!("Failed to serialize store snapshot: {e}"))
    })?;

    Ok(())
}
