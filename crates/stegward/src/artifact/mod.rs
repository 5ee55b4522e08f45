//! Image artifact model and lifecycle status.

mod persistence;
mod store;

pub use store::{ArtifactStore, MemoryStore};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, StegwardError};

/// Lifecycle status of a submitted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    /// Awaiting a moderation decision.
    Pending,
    /// Approved for the public gallery.
    Approved,
    /// Rejected by a moderator.
    Rejected,
}

impl ArtifactStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactStatus::Pending => "pending",
            ArtifactStatus::Approved => "approved",
            ArtifactStatus::Rejected => "rejected",
        }
    }

    /// Check if this status is terminal. No transition is defined out of
    /// a terminal status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ArtifactStatus::Pending)
    }
}

impl std::str::FromStr for ArtifactStatus {
    type Err = StegwardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ArtifactStatus::Pending),
            "approved" => Ok(ArtifactStatus::Approved),
            "rejected" => Ok(ArtifactStatus::Rejected),
            other => Err(StegwardError::InvalidInput(format!(
                "unknown status: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision metadata recorded together with a status transition.
///
/// Only approvals carry a moderator identity and timestamp; rejections
/// record nothing beyond the status itself.
#[derive(Debug, Clone, Default)]
pub struct DecisionMeta {
    /// When the decision was made.
    pub decided_at: Option<DateTime<Utc>>,
    /// Identity of the deciding moderator.
    pub decided_by: Option<String>,
}

impl DecisionMeta {
    /// Metadata for an approval by the given moderator.
    pub fn approval(moderator: impl Into<String>) -> Self {
        Self {
            decided_at: Some(Utc::now()),
            decided_by: Some(moderator.into()),
        }
    }

    /// Empty metadata, used for rejections.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Counts of artifacts by lifecycle status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Awaiting a decision.
    pub pending: usize,
    /// In the public gallery.
    pub approved: usize,
    /// Rejected by a moderator.
    pub rejected: usize,
}

impl StatusCounts {
    /// Total number of artifacts.
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }

    /// Number of decided artifacts (not pending).
    pub fn decided(&self) -> usize {
        self.approved + self.rejected
    }
}

/// A submitted image record with lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier, assigned at creation.
    pub id: String,

    /// Image content, stored as a base64 data URL
    /// (`data:<mime>;base64,<data>`). Immutable once stored.
    pub payload: String,

    /// Current lifecycle status.
    pub status: ArtifactStatus,

    /// When the image was submitted.
    pub submitted_at: DateTime<Utc>,

    /// When the image was approved. `None` unless `status` is approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,

    /// Who approved the image. `None` unless `status` is approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl Artifact {
    /// Create a pending artifact from raw image bytes.
    pub fn submit(bytes: &[u8], mime: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(StegwardError::InvalidInput(
                "empty image payload".to_string(),
            ));
        }
        if !mime.starts_with("image/") {
            return Err(StegwardError::InvalidInput(format!(
                "unsupported media type: '{mime}'"
            )));
        }

        let submitted_at = Utc::now();
        Ok(Self {
            id: generate_artifact_id(bytes, submitted_at),
            payload: encode_data_url(bytes, mime),
            status: ArtifactStatus::Pending,
            submitted_at,
            decided_at: None,
            decided_by: None,
        })
    }

    /// Decode the stored data URL back into raw image bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        decode_data_url(&self.payload)
    }

    /// Filename the payload is staged under for a detector run.
    pub fn staging_name(&self) -> String {
        format!("{}.jpg", self.id)
    }
}

/// Encode image bytes as a base64 data URL.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Decode a base64 data URL into raw bytes.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let Some((_prefix, data)) = url.split_once(',') else {
        return Err(StegwardError::CorruptArtifact(
            "payload is not a data URL".to_string(),
        ));
    };
    if data.is_empty() {
        return Err(StegwardError::CorruptArtifact(
            "data URL carries no payload".to_string(),
        ));
    }
    BASE64
        .decode(data)
        .map_err(|e| StegwardError::CorruptArtifact(format!("invalid base64 payload: {e}")))
}

/// Derive a unique artifact id from payload bytes and submission time.
fn generate_artifact_id(bytes: &[u8], submitted_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.update(submitted_at.timestamp_micros().to_le_bytes());
    hasher.update(fastrand::u64(..).to_le_bytes());
    let digest = hasher.finalize();

    let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
    format!("img_{hex}")
}
