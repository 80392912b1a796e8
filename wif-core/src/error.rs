//! Error types for WIF.

use thiserror::Error;
use wif_fs::FsError;

/// Errors raised by storage types, combinators and classifiers.
#[derive(Debug, Error)]
pub enum WifError {
    /// Text could not be parsed as an IP address.
    #[error("invalid IP address: {0}")]
    Format(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A combinator received no values.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A component is missing a collaborator it cannot work without.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A stored value was read as a different variant.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("feature id {id} out of range (record holds {size} features)")]
    FeatureOutOfRange { id: usize, size: usize },

    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("reporting failed: {0}")]
    Report(String),

    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for WIF operations.
pub type Result<T> = std::result::Result<T, WifError>;
