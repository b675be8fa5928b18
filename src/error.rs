//! Error types for component discovery.
//!
//! Only `ContextResolution` is fatal to a scan. `SourceUnavailable` is
//! recovered by the loader (the failing source contributes nothing) and
//! `MalformedEntry` is recovered inside the scanners (the entry is skipped).

use std::path::PathBuf;
use thiserror::Error;

/// Error type for discovery operations.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Source unavailable: {path}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed entry {entry}: {reason}")]
    MalformedEntry { entry: String, reason: String },

    #[error("Could not resolve scan context: {0}")]
    ContextResolution(String),
}

impl DiscoveryError {
    /// Create a SourceUnavailable error from a path and IO error.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a SourceUnavailable error for a root that exists but cannot be
    /// used as a whole (truncated archive index, unsupported archive layout).
    pub fn unusable_source(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, message.into()),
        }
    }

    /// Create a MalformedEntry error for a single undecodable entry.
    pub fn malformed_entry(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create a ContextResolution error.
    pub fn context_resolution(message: impl Into<String>) -> Self {
        Self::ContextResolution(message.into())
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
