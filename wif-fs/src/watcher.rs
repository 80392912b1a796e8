//! Model file change detection.
//!
//! A periodic timer asks a `ChangeDetector` once per tick whether the watched
//! model file changed. `FileModificationChecker` answers that by comparing the
//! file's modification time with the last one it saw.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::filesystem::{Filesystem, FsError};

/// Something that can tell whether a watched resource changed since the last check.
pub trait ChangeDetector: Send {
    /// Returns true once per observed change.
    fn is_change_detected(&mut self) -> bool;
}

/// Watches a single file through a `Filesystem`.
#[derive(Debug)]
pub struct FileModificationChecker<F: Filesystem> {
    fs: F,
    path: PathBuf,
    last_modified: SystemTime,
}

impl<F: Filesystem> FileModificationChecker<F> {
    /// Start watching `path`. The current modification time becomes the baseline,
    /// so the file must exist.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Result<Self, FsError> {
        let path = path.into();
        let last_modified = fs.modified_time(&path)?;
        Ok(Self {
            fs,
            path,
            last_modified,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time recorded at the last detected change (or at creation).
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}

impl<F: Filesystem> ChangeDetector for FileModificationChecker<F> {
    fn is_change_detected(&mut self) -> bool {
        let modified = match self.fs.modified_time(&self.path) {
            Ok(modified) => modified,
            Err(e) => {
                // Files are often replaced by rename; a missing file is retried next tick.
                warn!(path = %self.path.display(), error = %e, "cannot stat watched file");
                return false;
            }
        };

        if modified > self.last_modified {
            debug!(path = %self.path.display(), "watched file changed");
            self.last_modified = modified;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MockFilesystem;
    use std::sync::Arc;

    fn watched(modified_sec: u64) -> (Arc<MockFilesystem>, PathBuf) {
        let fs = Arc::new(MockFilesystem::new());
        let path = PathBuf::from("/models/model.json");
        fs.add_file(path.clone(), b"{}".to_vec(), modified_sec);
        (fs, path)
    }

    // ===========================================
    // FileModificationChecker
    // ===========================================

    #[test]
    fn test_new_requires_existing_file() {
        let fs = MockFilesystem::new();
        let result = FileModificationChecker::new(fs, "/missing.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_change_without_touch() {
        let (fs, path) = watched(100);
        let mut checker = FileModificationChecker::new(fs, path).expect("checker");
        assert!(!checker.is_change_detected());
        assert!(!checker.is_change_detected());
    }

    #[test]
    fn test_change_reported_once() {
        let (fs, path) = watched(100);
        let mut checker = FileModificationChecker::new(Arc::clone(&fs), path.clone()).expect("checker");

        fs.touch(&path, 200);
        assert!(checker.is_change_detected());
        assert!(!checker.is_change_detected());
    }

    #[test]
    fn test_older_timestamp_is_not_a_change() {
        let (fs, path) = watched(100);
        let mut checker = FileModificationChecker::new(Arc::clone(&fs), path.clone()).expect("checker");

        fs.touch(&path, 50);
        assert!(!checker.is_change_detected());
    }

    #[test]
    fn test_every_newer_timestamp_is_reported() {
        let (fs, path) = watched(100);
        let mut checker = FileModificationChecker::new(Arc::clone(&fs), path.clone()).expect("checker");

        fs.touch(&path, 200);
        assert!(checker.is_change_detected());
        fs.touch(&path, 300);
        assert!(checker.is_change_detected());
        assert_eq!(
            checker.last_modified(),
            std::time::UNIX_EPOCH + std::time::Duration::from_secs(300)
        );
    }

    #[test]
    fn test_missing_file_is_not_a_change() {
        let (fs, path) = watched(100);
        let mut checker = FileModificationChecker::new(Arc::clone(&fs), path.clone()).expect("checker");

        fs.remove(&path);
        assert!(!checker.is_change_detected());

        // Reappearing with a newer timestamp counts as a change.
        fs.add_file(path.clone(), b"{}".to_vec(), 150);
        assert!(checker.is_change_detected());
    }

    #[test]
    fn test_path_accessor() {
        let (fs, path) = watched(1);
        let checker = FileModificationChecker::new(fs, path.clone()).expect("checker");
        assert_eq!(checker.path(), path.as_path());
    }

    #[test]
    fn test_change_detector_trait_object() {
        let (fs, path) = watched(1);
        let mut detector: Box<dyn ChangeDetector> =
            Box::new(FileModificationChecker::new(Arc::clone(&fs), path.clone()).expect("checker"));
        fs.touch(&path, 2);
        assert!(detector.is_change_detected());
    }
}
