//! Steganalysis detectors.
//!
//! The moderation pipeline talks to a [`Detector`] implementation. The real
//! one shells out to a StegExpose-style external tool; tests use
//! [`MockDetector`].

mod mock;
mod stegexpose;

pub use mock::{MockDetector, MockFailure};
pub use stegexpose::{DetectorConfig, StegExposeDetector};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StegwardError};

/// Marker substring a detector report contains for a positive detection.
/// Matching is case-sensitive.
pub const SUSPICIOUS_MARKER: &str = "SUSPECTED";

/// Structured outcome of one steganalysis scan.
///
/// Produced once per invocation and never cached; every decision that needs
/// a verdict re-derives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the detector flagged the image.
    pub suspicious: bool,

    /// Full trimmed detector output, kept for audit regardless of verdict.
    pub raw_details: String,
}

impl Verdict {
    /// Classify raw detector output. Absence of the marker, including
    /// empty output, is a clean verdict.
    pub fn from_report(output: &str) -> Self {
        let raw_details = output.trim().to_string();
        Self {
            suspicious: raw_details.contains(SUSPICIOUS_MARKER),
            raw_details,
        }
    }
}

/// Trait for steganalysis detectors.
///
/// Implementations must be thread-safe (Send + Sync); concurrent scans
/// operate on independent scratch areas and never share state.
pub trait Detector: Send + Sync {
    /// Scan one image payload, staged under `name`, and return a verdict.
    ///
    /// Blocking: does not return until the detector has exited and its
    /// output has been fully captured.
    fn scan(&self, payload: &[u8], name: &str) -> Result<Verdict>;

    /// Name of this detector (for logging/debugging).
    fn name(&self) -> &str;
}

/// Validate scan preconditions shared by all detectors. Violations are
/// caller errors; nothing is staged.
pub(crate) fn check_scan_input(payload: &[u8], name: &str) -> Result<()> {
    if payload.is_empty() {
        return Err(StegwardError::InvalidInput(
            "empty scan payload".to_string(),
        ));
    }
    if name.is_empty() {
        return Err(StegwardError::InvalidInput(
            "empty staging filename".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(StegwardError::InvalidInput(format!(
            "unsafe staging filename: '{name}'"
        )));
    }
    Ok(())
}
