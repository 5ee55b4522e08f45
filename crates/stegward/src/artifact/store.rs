//! Artifact store trait and in-memory implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{Result, StegwardError};

use super::{Artifact, ArtifactStatus, DecisionMeta, StatusCounts};

/// Storage contract for artifact records.
///
/// Implementations must be thread-safe (Send + Sync), and
/// `compare_and_set_status` must be atomic with respect to concurrent
/// callers: it is the mechanism that closes the read-modify-write race
/// between two decisions on the same artifact.
pub trait ArtifactStore: Send + Sync {
    /// Insert a new artifact record.
    fn create(&self, artifact: Artifact) -> Result<()>;

    /// Fetch an artifact by id.
    fn get(&self, id: &str) -> Result<Option<Artifact>>;

    /// All artifacts with the given status, newest first (pending by
    /// submission time, decided by decision time with submission time as
    /// the tiebreak — rejections carry no decision time, so they order by
    /// submission alone).
    fn list_by_status(&self, status: ArtifactStatus) -> Result<Vec<Artifact>>;

    /// Conditional status write: succeeds only if the artifact's current
    /// status equals `expected` at write time. Returns `Ok(false)` when it
    /// does not; the record is left untouched.
    fn compare_and_set_status(
        &self,
        id: &str,
        expected: ArtifactStatus,
        new_status: ArtifactStatus,
        meta: DecisionMeta,
    ) -> Result<bool>;

    /// Remove an artifact. Returns whether a record existed.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Artifact counts by status.
    fn counts(&self) -> Result<StatusCounts> {
        Ok(StatusCounts {
            pending: self.list_by_status(ArtifactStatus::Pending)?.len(),
            approved: self.list_by_status(ArtifactStatus::Approved)?.len(),
            rejected: self.list_by_status(ArtifactStatus::Rejected)?.len(),
        })
    }
}

/// In-memory artifact store with optional JSON snapshot persistence.
///
/// Reads proceed concurrently with writes; the compare-and-set runs under
/// the write lock, so at most one decision wins for a given artifact.
#[derive(Debug)]
pub struct MemoryStore {
    pub(super) artifacts: RwLock<HashMap<String, Artifact>>,
    pub(super) snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store with no snapshot persistence.
    pub fn new() -> Self {
        Self {
            artifacts: RwLock::new(HashMap::new()),
            snapshot_path: None,
        }
    }

    /// Create an empty store that snapshots to `path` after each mutation.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Self {
        Self {
            artifacts: RwLock::new(HashMap::new()),
            snapshot_path: Some(path.into()),
        }
    }

    fn read_table(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Artifact>>> {
        self.artifacts
            .read()
            .map_err(|_| StegwardError::Persistence("artifact table lock poisoned".to_string()))
    }

    fn write_table(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Artifact>>> {
        self.artifacts
            .write()
            .map_err(|_| StegwardError::Persistence("artifact table lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactStore for MemoryStore {
    fn create(&self, artifact: Artifact) -> Result<()> {
        {
            let mut table = self.write_table()?;
            if table.contains_key(&artifact.id) {
                return Err(StegwardError::InvalidInput(format!(
                    "duplicate artifact id: '{}'",
                    artifact.id
                )));
            }
            table.insert(artifact.id.clone(), artifact);
        }
        self.persist()
    }

    fn get(&self, id: &str) -> Result<Option<Artifact>> {
        Ok(self.read_table()?.get(id).cloned())
    }

    fn list_by_status(&self, status: ArtifactStatus) -> Result<Vec<Artifact>> {
        let table = self.read_table()?;
        let mut artifacts: Vec<Artifact> = table
            .values()
            .filter(|a| a.status == status)
            .cloned()
            .collect();
        drop(table);

        if status.is_terminal() {
            artifacts.sort_by(|a, b| {
                b.decided_at
                    .cmp(&a.decided_at)
                    .then(b.submitted_at.cmp(&a.submitted_at))
            });
        } else {
            artifacts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        }
        Ok(artifacts)
    }

    fn compare_and_set_status(
        &self,
        id: &str,
        expected: ArtifactStatus,
        new_status: ArtifactStatus,
        meta: DecisionMeta,
    ) -> Result<bool> {
        {
            let mut table = self.write_table()?;
            let Some(artifact) = table.get_mut(id) else {
                return Err(StegwardError::NotFound(id.to_string()));
            };
            if artifact.status != expected {
                return Ok(false);
            }
            artifact.status = new_status;
            artifact.decided_at = meta.decided_at;
            artifact.decided_by = meta.decided_by;
        }
        self.persist()?;
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.write_table()?.remove(id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
