//! Scratch staging areas for detector invocations.
//!
//! Each scan stages its payload in an exclusively-owned temporary directory.
//! The directory gets a collision-free name at acquisition, holds exactly one
//! payload copy, and is removed on every exit path: `Drop` runs the release,
//! so normal returns, error returns, and abandonment all clean up without any
//! call-site bookkeeping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, StegwardError};

/// Attempts before giving up on finding a free directory name.
const ACQUIRE_RETRIES: usize = 8;

/// An exclusively-owned temporary directory for one detector invocation.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    released: bool,
}

impl ScratchDir {
    /// Create a fresh, collision-free staging directory under the OS temp
    /// root. Failure is fatal to the request and is not retried beyond
    /// name collisions.
    pub fn acquire() -> Result<Self> {
        Self::acquire_in(std::env::temp_dir())
    }

    /// Create a staging directory under a specific root.
    pub fn acquire_in(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();

        for _ in 0..ACQUIRE_RETRIES {
            let name = format!(
                "stegward-{}-{:08x}",
                chrono::Utc::now().timestamp_millis(),
                fastrand::u32(..)
            );
            let path = root.join(name);

            // create_dir, not create_dir_all: an existing directory must
            // surface as a collision instead of being silently reused.
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Self {
                    path,
                    released: false,
                }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StegwardError::Io { path, source: e }),
            }
        }

        Err(StegwardError::Io {
            path: root.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "exhausted scratch directory name attempts",
            ),
        })
    }

    /// Write a payload file into the staging area, returning its path.
    pub fn stage(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dest = self.path.join(name);
        fs::write(&dest, bytes).map_err(|e| StegwardError::Io {
            path: dest.clone(),
            source: e,
        })?;
        Ok(dest)
    }

    /// Addressable path handed to the external detector.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staging directory and everything under it.
    ///
    /// Idempotent: safe to call after a partial or complete cleanup.
    /// Deletion failure is logged and swallowed; scratch leakage is a
    /// degraded condition, and name uniqueness already prevents a later
    /// scan from observing stale contents.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove scratch directory"
                );
            }
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::acquire_in(root.path()).unwrap();

        assert!(scratch.path().is_dir());
        assert!(scratch.path().starts_with(root.path()));
    }

    #[test]
    fn test_stage_writes_payload() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::acquire_in(root.path()).unwrap();

        let staged = scratch.stage("img_abc.jpg", &[1, 2, 3]).unwrap();

        assert_eq!(staged, scratch.path().join("img_abc.jpg"));
        assert_eq!(fs::read(&staged).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_drop_removes_directory_and_contents() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchDir::acquire_in(root.path()).unwrap();
            scratch.stage("payload.jpg", &[0u8; 64]).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_release_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let mut scratch = ScratchDir::acquire_in(root.path()).unwrap();
        let path = scratch.path().to_path_buf();

        scratch.release();
        assert!(!path.exists());
        scratch.release();
        scratch.release();
    }

    #[test]
    fn test_release_after_external_cleanup() {
        let root = tempfile::tempdir().unwrap();
        let mut scratch = ScratchDir::acquire_in(root.path()).unwrap();

        // Someone else removed the directory first.
        fs::remove_dir_all(scratch.path()).unwrap();
        scratch.release();
    }

    #[test]
    fn test_concurrent_acquires_are_distinct() {
        let root = tempfile::tempdir().unwrap();
        let root_path = root.path().to_path_buf();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let root = root_path.clone();
                std::thread::spawn(move || {
                    let scratch = ScratchDir::acquire_in(&root).unwrap();
                    scratch.stage("img.jpg", &[i as u8; 16]).unwrap();
                    let path = scratch.path().to_path_buf();
                    let content = fs::read(path.join("img.jpg")).unwrap();
                    // Only this thread's payload is visible in its area.
                    assert_eq!(content, vec![i as u8; 16]);
                    drop(scratch);
                    path
                })
            })
            .collect();

        let mut paths: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total);

        // All areas are gone once every scan has completed.
        for path in &paths {
            assert!(!path.exists());
        }
    }
}
