//! Moderation state machine coordinating store, staging, and detection.
//!
//! States: `pending → approved` and `pending → rejected`, both terminal.
//! Approvals pass through the policy gate: a suspicious steganalysis
//! verdict refuses the transition. The commit itself is a compare-and-set
//! on the store, so two racing decisions for the same artifact produce
//! exactly one winner.

use std::sync::Arc;

use tracing::{info, warn};

use crate::artifact::{Artifact, ArtifactStatus, ArtifactStore, DecisionMeta, StatusCounts};
use crate::detector::Detector;
use crate::error::{Result, StegwardError};

/// The moderation pipeline: submissions, decisions, and listings.
pub struct ModerationQueue {
    store: Arc<dyn ArtifactStore>,
    detector: Arc<dyn Detector>,
}

impl ModerationQueue {
    /// Create a queue over the given store and detector.
    pub fn new(store: Arc<dyn ArtifactStore>, detector: Arc<dyn Detector>) -> Self {
        Self { store, detector }
    }

    /// Store a new pending artifact from raw image bytes.
    pub fn submit(&self, bytes: &[u8], mime: &str) -> Result<Artifact> {
        let artifact = Artifact::submit(bytes, mime)?;
        self.store.create(artifact.clone())?;
        info!(id = %artifact.id, size = bytes.len(), "artifact submitted");
        Ok(artifact)
    }

    /// Decide a pending artifact's terminal status, returning the updated
    /// record.
    ///
    /// Approvals are gated on a clean steganalysis verdict; rejections are
    /// never blocked by the verdict. Deciding an already-terminal artifact
    /// short-circuits without re-scanning: requesting the stored status is
    /// an idempotent no-op, requesting the other terminal status is
    /// [`StegwardError::AlreadyDecided`].
    pub fn decide(
        &self,
        id: &str,
        requested: ArtifactStatus,
        moderator: &str,
    ) -> Result<Artifact> {
        if !requested.is_terminal() {
            return Err(StegwardError::InvalidInput(
                "requested status must be approved or rejected".to_string(),
            ));
        }

        let artifact = self
            .store
            .get(id)?
            .ok_or_else(|| StegwardError::NotFound(id.to_string()))?;

        // Terminal artifacts are never re-scanned.
        if artifact.status.is_terminal() {
            if artifact.status == requested {
                return Ok(artifact);
            }
            return Err(StegwardError::AlreadyDecided(format!(
                "artifact '{}' is already {}",
                id, artifact.status
            )));
        }

        let payload = artifact.decode_payload()?;
        let verdict = self.detector.scan(&payload, &artifact.staging_name())?;

        // Policy gate: a suspicious verdict blocks approval, never rejection.
        if requested == ArtifactStatus::Approved && verdict.suspicious {
            warn!(id, "approval refused by suspicious verdict");
            return Err(StegwardError::PolicyRejected {
                report: verdict.raw_details,
            });
        }

        let meta = if requested == ArtifactStatus::Approved {
            DecisionMeta::approval(moderator)
        } else {
            DecisionMeta::none()
        };

        let committed =
            self.store
                .compare_and_set_status(id, ArtifactStatus::Pending, requested, meta)?;
        if !committed {
            return Err(StegwardError::AlreadyDecided(format!(
                "artifact '{id}' was decided concurrently"
            )));
        }

        let updated = self
            .store
            .get(id)?
            .ok_or_else(|| StegwardError::NotFound(id.to_string()))?;
        info!(id, status = %updated.status, moderator, "moderation decision committed");
        Ok(updated)
    }

    /// All pending artifacts, newest submission first.
    pub fn list_pending(&self) -> Result<Vec<Artifact>> {
        self.store.list_by_status(ArtifactStatus::Pending)
    }

    /// All approved artifacts, newest decision first.
    pub fn list_approved(&self) -> Result<Vec<Artifact>> {
        self.store.list_by_status(ArtifactStatus::Approved)
    }

    /// Delete an artifact outright.
    pub fn remove(&self, id: &str) -> Result<()> {
        if self.store.delete(id)? {
            info!(id, "artifact removed");
            Ok(())
        } else {
            Err(StegwardError::NotFound(id.to_string()))
        }
    }

    /// Artifact counts by status.
    pub fn counts(&self) -> Result<StatusCounts> {
        self.store.counts()
    }
}
