//! Symbol scanners for the discovery engine.
//!
//! A scanner enumerates candidate symbols from one kind of source root and
//! resolves each candidate through the injected introspector. Scanners never
//! filter; the loader applies filters after deduplication.
//!
//! Available scanners:
//! - `ArchiveScanner` - Enumerates entries of a compressed archive package
//! - `DirectoryScanner` - Enumerates files of a loose directory tree

pub mod archive;
pub mod directory;

pub use archive::ArchiveScanner;
pub use directory::DirectoryScanner;

use crate::error::Result;
use crate::introspect::Introspector;
use crate::symbol::SymbolDescriptor;
use std::path::Path;

/// Default extension of compiled symbol artifacts.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "class";

/// Configuration shared by the built-in scanners.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Extension of artifact entries to enumerate (without the dot).
    pub artifact_extension: String,
    /// Maximum traversal depth for directory roots. None means unlimited.
    pub max_depth: Option<usize>,
    /// Whether to follow symbolic links in directory roots.
    pub follow_symlinks: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            max_depth: None,
            follow_symlinks: false,
        }
    }
}

impl ScannerConfig {
    /// Create a new scanner config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the artifact extension to enumerate.
    pub fn with_artifact_extension(mut self, extension: impl Into<String>) -> Self {
        self.artifact_extension = extension.into();
        self
    }

    /// Set maximum traversal depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set whether to follow symlinks.
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Trait for symbol scanners.
///
/// Each scanner handles one kind of source root. Scanners are consulted in
/// registration order; `supports` gates which roots a scanner claims, and
/// `scan` enumerates every discoverable symbol under a claimed root.
pub trait SymbolScanner: Send + Sync {
    /// Get the name of this scanner.
    fn name(&self) -> &str;

    /// Check if this scanner can enumerate the given root.
    fn supports(&self, root: &Path) -> bool;

    /// Enumerate all discoverable symbols under `root`.
    ///
    /// Malformed or undescribable entries are skipped; an error means the
    /// root itself could not be read as this scanner's source kind.
    fn scan(&self, root: &Path, introspector: &dyn Introspector) -> Result<Vec<SymbolDescriptor>>;
}

/// Derive a qualified symbol name from a `/`-separated entry path.
///
/// Strips the artifact extension and converts path separators to name
/// separators. Returns `None` for entries that do not represent discoverable
/// symbols: wrong extension, nested or synthetic artifacts (`$` in the final
/// segment), and compiler metadata descriptors (`module-info`,
/// `package-info`).
pub fn qualified_name_for_entry(entry: &str, extension: &str) -> Option<String> {
    let entry = entry.trim_start_matches('/');
    let stem = entry.strip_suffix(extension)?.strip_suffix('.')?;
    if stem.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for segment in stem.split('/') {
        if segment.is_empty() {
            return None;
        }
        segments.push(segment);
    }

    let simple = segments[segments.len() - 1];
    if simple.contains('$') || simple == "module-info" || simple == "package-info" {
        return None;
    }

    Some(segments.join("."))
}
