//! Filesystem abstraction for WIF.
//!
//! This crate provides:
//! - Filesystem trait for reading model/blocklist files and their modification times
//! - Change detection used to decide when a model on disk has to be reloaded

pub mod filesystem;
pub mod watcher;

pub use filesystem::{Filesystem, FsError, MockFilesystem, RealFilesystem};
pub use watcher::{ChangeDetector, FileModificationChecker};
