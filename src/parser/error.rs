//! Error types for asset extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning a downloaded bundle.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bundle could not be read (missing after a failed seed download, permissions, ...).
    #[error("cannot read {path} for asset extraction: {source}")]
    Read {
        /// Path of the bundle.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
