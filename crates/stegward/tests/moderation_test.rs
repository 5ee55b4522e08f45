//! Integration tests for the moderation pipeline.

use std::sync::Arc;

use stegward::{
    ArtifactStatus, ArtifactStore, MemoryStore, MockDetector, ModerationQueue, StegwardError,
};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

/// Helper to build a queue over a fresh in-memory store.
fn make_queue(detector: MockDetector) -> (Arc<MemoryStore>, Arc<MockDetector>, ModerationQueue) {
    let store = Arc::new(MemoryStore::new());
    let detector = Arc::new(detector);
    let queue = ModerationQueue::new(store.clone(), detector.clone());
    (store, detector, queue)
}

// =============================================================================
// Decision Scenarios
// =============================================================================

#[test]
fn test_approve_clean_image() {
    let (_, _, queue) = make_queue(MockDetector::clean());

    let artifact = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    assert_eq!(artifact.status, ArtifactStatus::Pending);

    let decided = queue
        .decide(&artifact.id, ArtifactStatus::Approved, "mod1")
        .unwrap();

    assert_eq!(decided.status, ArtifactStatus::Approved);
    assert_eq!(decided.decided_by.as_deref(), Some("mod1"));
    assert!(decided.decided_at.is_some());
}

#[test]
fn test_suspicious_verdict_blocks_approval() {
    let (store, _, queue) = make_queue(MockDetector::suspicious());

    let artifact = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    let err = queue
        .decide(&artifact.id, ArtifactStatus::Approved, "mod1")
        .unwrap_err();

    let StegwardError::PolicyRejected { report } = err else {
        panic!("expected PolicyRejected, got {err:?}");
    };
    assert!(report.contains("SUSPECTED"));

    // The refused transition leaves the artifact untouched.
    let stored = store.get(&artifact.id).unwrap().unwrap();
    assert_eq!(stored.status, ArtifactStatus::Pending);
    assert!(stored.decided_at.is_none());
    assert!(stored.decided_by.is_none());
}

#[test]
fn test_suspicious_verdict_does_not_block_rejection() {
    let (store, _, queue) = make_queue(MockDetector::suspicious());

    let artifact = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    let decided = queue
        .decide(&artifact.id, ArtifactStatus::Rejected, "mod1")
        .unwrap();

    assert_eq!(decided.status, ArtifactStatus::Rejected);

    let stored = store.get(&artifact.id).unwrap().unwrap();
    assert_eq!(stored.status, ArtifactStatus::Rejected);
    // Rejections carry no decision metadata.
    assert!(stored.decided_at.is_none());
    assert!(stored.decided_by.is_none());
}

#[test]
fn test_gate_retry_after_policy_rejection() {
    let (_, detector, queue) = make_queue(MockDetector::suspicious());

    let artifact = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    assert!(queue
        .decide(&artifact.id, ArtifactStatus::Approved, "mod1")
        .is_err());

    // Still pending, so a later rejection re-derives the verdict.
    let decided = queue
        .decide(&artifact.id, ArtifactStatus::Rejected, "mod1")
        .unwrap();
    assert_eq!(decided.status, ArtifactStatus::Rejected);
    assert_eq!(detector.scan_count(), 2);
}

#[test]
fn test_decide_unknown_id_is_not_found() {
    let (_, _, queue) = make_queue(MockDetector::clean());
    let err = queue
        .decide("img_000000000000", ArtifactStatus::Approved, "mod1")
        .unwrap_err();
    assert!(matches!(err, StegwardError::NotFound(_)));
}

#[test]
fn test_corrupt_payload_is_reported_before_scanning() {
    let (store, detector, queue) = make_queue(MockDetector::clean());

    let mut artifact = stegward::Artifact::submit(JPEG_BYTES, "image/jpeg").unwrap();
    artifact.payload = "not a data url".to_string();
    let id = artifact.id.clone();
    store.create(artifact).unwrap();

    let err = queue.decide(&id, ArtifactStatus::Approved, "mod1").unwrap_err();
    assert!(matches!(err, StegwardError::CorruptArtifact(_)));
    assert_eq!(detector.scan_count(), 0);
}

// =============================================================================
// Listing and Removal
// =============================================================================

#[test]
fn test_listings_track_decisions() {
    let (_, _, queue) = make_queue(MockDetector::clean());

    let a = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    let b = queue.submit(&[0x89, 0x50, 0x4E, 0x47], "image/png").unwrap();

    assert_eq!(queue.list_pending().unwrap().len(), 2);
    assert!(queue.list_approved().unwrap().is_empty());

    queue.decide(&a.id, ArtifactStatus::Approved, "mod1").unwrap();
    queue.decide(&b.id, ArtifactStatus::Rejected, "mod1").unwrap();

    assert!(queue.list_pending().unwrap().is_empty());
    let approved = queue.list_approved().unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, a.id);

    let counts = queue.counts().unwrap();
    assert_eq!(counts.approved, 1);
    assert_eq!(counts.rejected, 1);
    assert_eq!(counts.pending, 0);
}

#[test]
fn test_remove_deletes_artifact() {
    let (store, _, queue) = make_queue(MockDetector::clean());

    let artifact = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    queue.remove(&artifact.id).unwrap();

    assert!(store.get(&artifact.id).unwrap().is_none());
    assert!(matches!(
        queue.remove(&artifact.id).unwrap_err(),
        StegwardError::NotFound(_)
    ));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_decides_have_exactly_one_winner() {
    let (store, _, queue) = make_queue(MockDetector::clean());
    let queue = Arc::new(queue);

    let artifact = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();

    let barrier = Arc::new(std::sync::Barrier::new(2));
    let requests = [ArtifactStatus::Approved, ArtifactStatus::Rejected];

    let handles: Vec<_> = requests
        .into_iter()
        .map(|requested| {
            let queue = queue.clone();
            let barrier = barrier.clone();
            let id = artifact.id.clone();
            std::thread::spawn(move || {
                barrier.wait();
                queue.decide(&id, requested, "mod1")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, Err(StegwardError::AlreadyDecided(_))))
        .count();
    assert_eq!(winners, 1, "exactly one decision must commit");
    assert_eq!(losers, 1, "the other must lose the compare-and-set");

    // The stored state matches the winning request, with decision metadata
    // present iff the winner approved.
    let stored = store.get(&artifact.id).unwrap().unwrap();
    let won = results
        .iter()
        .flatten()
        .next()
        .expect("one result must be Ok");
    assert_eq!(stored.status, won.status);
    assert_eq!(
        stored.decided_at.is_some(),
        stored.status == ArtifactStatus::Approved
    );
    assert_eq!(
        stored.decided_by.is_some(),
        stored.status == ArtifactStatus::Approved
    );
}

#[test]
fn test_concurrent_submissions_are_independent() {
    let (_, _, queue) = make_queue(MockDetector::clean());
    let queue = Arc::new(queue);

    let handles: Vec<_> = (0u8..6)
        .map(|i| {
            let queue = queue.clone();
            std::thread::spawn(move || queue.submit(&[0xFF, 0xD8, i], "image/jpeg").unwrap())
        })
        .collect();

    let mut ids: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().id)
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(queue.list_pending().unwrap().len(), total);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_decisions_survive_snapshot_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let queue = ModerationQueue::new(
        Arc::new(MemoryStore::with_snapshot(&path)),
        Arc::new(MockDetector::clean()),
    );
    let a = queue.submit(JPEG_BYTES, "image/jpeg").unwrap();
    let b = queue.submit(&[0x89, 0x50], "image/png").unwrap();
    queue.decide(&a.id, ArtifactStatus::Approved, "mod1").unwrap();

    // A fresh process loads the snapshot and sees the same queue.
    let reloaded = ModerationQueue::new(
        Arc::new(MemoryStore::load(&path).unwrap()),
        Arc::new(MockDetector::clean()),
    );
    let approved = reloaded.list_approved().unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, a.id);
    assert_eq!(approved[0].decided_by.as_deref(), Some("mod1"));

    let pending = reloaded.list_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, b.id);
}
