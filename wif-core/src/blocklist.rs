//! Blocklist file loader.
//!
//! Format:
//! - One entry per line
//! - Lines starting with # are comments
//! - Empty lines are ignored
//! - Addresses (`10.0.0.1`, `2001:db8::1`) become single-host prefixes
//! - Prefixes: `192.168.0.0/24`, `2001:db8::/32`

use std::path::Path;

use thiserror::Error;
use tracing::info;
use wif_fs::{Filesystem, FsError};

use crate::error::WifError;
use crate::utils::IpPrefix;

/// Errors from blocklist loading.
#[derive(Debug, Error)]
pub enum BlocklistLoadError {
    #[error("failed to read blocklist file: {0}")]
    Read(#[from] FsError),

    #[error("invalid entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: WifError,
    },
}

/// Load a blocklist from a file.
pub fn load_blocklist<F: Filesystem>(fs: &F, path: &Path) -> Result<Vec<IpPrefix>, BlocklistLoadError> {
    let content = fs.read_file(path)?;
    let prefixes = parse_blocklist(&content)?;
    info!(path = %path.display(), prefixes = prefixes.len(), "blocklist loaded");
    Ok(prefixes)
}

/// Parse blocklist content, keeping file order.
pub fn parse_blocklist(content: &str) -> Result<Vec<IpPrefix>, BlocklistLoadError> {
    let mut prefixes = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let prefix = trimmed
            .parse::<IpPrefix>()
            .map_err(|e| BlocklistLoadError::Parse {
                line: line_num + 1,
                source: e,
            })?;
        prefixes.push(prefix);
    }

    Ok(prefixes)
}

impl From<BlocklistLoadError> for WifError {
    fn from(err: BlocklistLoadError) -> Self {
        match err {
            BlocklistLoadError::Read(e) => WifError::Fs(e),
            BlocklistLoadError::Parse { line, source } => {
                WifError::InvalidArgument(format!("blocklist line {}: {}", line, source))
            }
        }
    }
}
