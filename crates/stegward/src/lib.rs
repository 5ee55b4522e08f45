//! Stegward: steganalysis-gated image moderation pipeline.
//!
//! Anonymous submissions enter the moderation queue as pending artifacts;
//! a moderator approves or rejects each one, and approved images make up
//! the public gallery.
//!
//! # Core Principles
//!
//! - **Gated approvals**: an approval commits only after a clean verdict
//!   from an external steganalysis detector
//! - **One decision per artifact**: status transitions go through a
//!   compare-and-set write, so racing decisions produce exactly one winner
//! - **No staging residue**: detector payloads live in exclusively-owned
//!   scratch directories released on every exit path
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stegward::{ArtifactStatus, MemoryStore, MockDetector, ModerationQueue};
//!
//! let queue = ModerationQueue::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MockDetector::clean()),
//! );
//!
//! let artifact = queue.submit(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap();
//! let decided = queue
//!     .decide(&artifact.id, ArtifactStatus::Approved, "mod@example.com")
//!     .unwrap();
//! assert_eq!(decided.status, ArtifactStatus::Approved);
//! ```

pub mod artifact;
pub mod detector;
pub mod error;
pub mod moderation;
pub mod scratch;

pub use artifact::{
    Artifact, ArtifactStatus, ArtifactStore, DecisionMeta, MemoryStore, StatusCounts,
};
pub use detector::{
    Detector, DetectorConfig, MockDetector, MockFailure, StegExposeDetector, SUSPICIOUS_MARKER,
    Verdict,
};
pub use error::{Result, StegwardError};
pub use moderation::ModerationQueue;
pub use scratch::ScratchDir;
