//! Mock detector for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, StegwardError};

use super::{Detector, Verdict, check_scan_input};

/// Failure mode a [`MockDetector`] can be programmed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// The tool is missing or misconfigured.
    ToolUnavailable,
    /// The tool crashed or timed out.
    DetectorFailed,
}

/// Mock detector that returns canned reports for testing.
///
/// Enforces the same scan preconditions as the real detector and counts
/// the scans it performs, so tests can assert that terminal artifacts are
/// never re-scanned.
pub struct MockDetector {
    report: Mutex<String>,
    failure: Mutex<Option<MockFailure>>,
    scans: AtomicUsize,
}

impl MockDetector {
    /// Detector that reports clean output for every payload.
    pub fn clean() -> Self {
        Self::with_report("clean, nothing found")
    }

    /// Detector that flags every payload.
    pub fn suspicious() -> Self {
        Self::with_report("staged.jpg SUSPECTED: embedded payload likely")
    }

    /// Detector with a fixed report.
    pub fn with_report(report: impl Into<String>) -> Self {
        Self {
            report: Mutex::new(report.into()),
            failure: Mutex::new(None),
            scans: AtomicUsize::new(0),
        }
    }

    /// Detector that fails every scan with the given mode.
    pub fn failing(failure: MockFailure) -> Self {
        let detector = Self::clean();
        *lock(&detector.failure) = Some(failure);
        detector
    }

    /// Replace the canned report for subsequent scans.
    pub fn set_report(&self, report: impl Into<String>) {
        *lock(&self.report) = report.into();
    }

    /// Number of scans performed so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::clean()
    }
}

impl Detector for MockDetector {
    fn scan(&self, payload: &[u8], name: &str) -> Result<Verdict> {
        check_scan_input(payload, name)?;
        self.scans.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = *lock(&self.failure) {
            return Err(match failure {
                MockFailure::ToolUnavailable => {
                    StegwardError::ToolUnavailable("mock detector configured absent".to_string())
                }
                MockFailure::DetectorFailed => {
                    StegwardError::DetectorFailed("mock detector crash".to_string())
                }
            });
        }

        Ok(Verdict::from_report(&lock(&self.report)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_mock_verdict() {
        let detector = MockDetector::clean();
        let verdict = detector.scan(&[1, 2, 3], "img.jpg").unwrap();
        assert!(!verdict.suspicious);
        assert_eq!(detector.scan_count(), 1);
    }

    #[test]
    fn test_suspicious_mock_verdict() {
        let detector = MockDetector::suspicious();
        let verdict = detector.scan(&[1, 2, 3], "img.jpg").unwrap();
        assert!(verdict.suspicious);
        assert!(verdict.raw_details.contains("SUSPECTED"));
    }

    #[test]
    fn test_mock_enforces_preconditions() {
        let detector = MockDetector::clean();
        assert!(detector.scan(&[], "img.jpg").is_err());
        assert!(detector.scan(&[1], "../img.jpg").is_err());
        // Failed precondition checks are not counted as scans.
        assert_eq!(detector.scan_count(), 0);
    }

    #[test]
    fn test_mock_failure_modes() {
        let unavailable = MockDetector::failing(MockFailure::ToolUnavailable);
        assert!(matches!(
            unavailable.scan(&[1], "img.jpg").unwrap_err(),
            StegwardError::ToolUnavailable(_)
        ));

        let crashed = MockDetector::failing(MockFailure::DetectorFailed);
        assert!(matches!(
            crashed.scan(&[1], "img.jpg").unwrap_err(),
            StegwardError::DetectorFailed(_)
        ));
    }

    #[test]
    fn test_set_report_switches_verdict() {
        let detector = MockDetector::clean();
        assert!(!detector.scan(&[1], "img.jpg").unwrap().suspicious);

        detector.set_report("now SUSPECTED by the tool");
        assert!(detector.scan(&[1], "img.jpg").unwrap().suspicious);
    }
}
