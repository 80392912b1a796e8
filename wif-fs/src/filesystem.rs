//! Filesystem access used by classifiers.
//!
//! Models and blocklists are read through the `Filesystem` trait so that loading
//! and change detection can be exercised against an in-memory mock.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Errors from filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("path error: {0}")]
    Path(String),
}

/// Trait for the filesystem operations WIF needs.
pub trait Filesystem: Send + Sync {
    /// Read file contents as a string.
    fn read_file(&self, path: &Path) -> Result<String, FsError>;

    /// Last modification time of a file.
    fn modified_time(&self, path: &Path) -> Result<SystemTime, FsError>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

impl<F: Filesystem + ?Sized> Filesystem for Arc<F> {
    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        (**self).read_file(path)
    }

    fn modified_time(&self, path: &Path) -> Result<SystemTime, FsError> {
        (**self).modified_time(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        Ok(fs::read_to_string(path)?)
    }

    fn modified_time(&self, path: &Path) -> Result<SystemTime, FsError> {
        Ok(fs::metadata(path)?.modified()?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[derive(Debug, Clone)]
struct MockFile {
    data: Vec<u8>,
    modified: SystemTime,
}

/// Mock filesystem for testing.
/// Cloning creates a new handle to the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MockFilesystem {
    files: Arc<RwLock<HashMap<PathBuf, MockFile>>>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file with a modification time of `modified_sec`
    /// seconds after the Unix epoch.
    pub fn add_file(&self, path: PathBuf, data: Vec<u8>, modified_sec: u64) {
        let file = MockFile {
            data,
            modified: UNIX_EPOCH + Duration::from_secs(modified_sec),
        };
        self.files.write().unwrap().insert(path, file);
    }

    /// Change only the modification time of an existing file.
    /// Returns false if the file does not exist.
    pub fn touch(&self, path: &Path, modified_sec: u64) -> bool {
        match self.files.write().unwrap().get_mut(path) {
            Some(file) => {
                file.modified = UNIX_EPOCH + Duration::from_secs(modified_sec);
                true
            }
            None => false,
        }
    }

    /// Remove a file, returning whether it existed.
    pub fn remove(&self, path: &Path) -> bool {
        self.files.write().unwrap().remove(path).is_some()
    }

    fn not_found(path: &Path) -> FsError {
        FsError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        ))
    }
}

impl Filesystem for MockFilesystem {
    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(file) => String::from_utf8(file.data.clone())
                .map_err(|e| FsError::Path(format!("invalid utf8: {}", e))),
            None => Err(Self::not_found(path)),
        }
    }

    fn modified_time(&self, path: &Path) -> Result<SystemTime, FsError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| Self::not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }
}
