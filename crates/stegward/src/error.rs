//! Error types for the stegward library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for moderation pipeline operations.
#[derive(Debug, Error)]
pub enum StegwardError {
    /// Malformed request data: empty payload, unsafe staging name,
    /// or an invalid requested status.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown artifact id.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// Stored payload could not be decoded back into image bytes.
    #[error("Corrupt artifact payload: {0}")]
    CorruptArtifact(String),

    /// The external detector tool is missing or misconfigured.
    /// Operator-fixable; fatal for the request, not for the process.
    #[error("Detector unavailable: {0}")]
    ToolUnavailable(String),

    /// The detector crashed, timed out, or could not be launched.
    #[error("Detector failed: {0}")]
    DetectorFailed(String),

    /// A suspicious verdict blocked an approval. The artifact's status is
    /// unchanged; the raw detector report is carried for the caller.
    #[error("Approval blocked by steganalysis verdict")]
    PolicyRejected {
        /// Full trimmed detector output.
        report: String,
    },

    /// A concurrent decision reached a terminal state first.
    #[error("Artifact already decided: {0}")]
    AlreadyDecided(String),

    /// Store write failed after the scan completed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for stegward operations.
pub type Result<T> = std::result::Result<T, StegwardError>;
