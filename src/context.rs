//! Scan context resolution.
//!
//! The scan context describes where discovery looks and with what: one entry
//! location plus the ordered scanners to run against it. A resolver derives
//! the context exactly once and hands out the cached value afterwards, so a
//! process inspects its own packaging a single time no matter how many scans
//! run.

use crate::error::{DiscoveryError, Result};
use crate::scanner::{ArchiveScanner, DirectoryScanner, ScannerConfig, SymbolScanner};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Resolved scan context: entry location plus active scanners.
///
/// Read-only once built; scanner order is registration order and decides
/// which source wins when several report the same symbol.
pub struct ScanContext {
    entry_location: PathBuf,
    scanners: Vec<Arc<dyn SymbolScanner>>,
}

impl ScanContext {
    /// Create a context for an entry location with no scanners registered.
    pub fn new(entry_location: impl Into<PathBuf>) -> Self {
        Self {
            entry_location: entry_location.into(),
            scanners: Vec::new(),
        }
    }

    /// Create a context with the built-in archive and directory scanners.
    pub fn with_default_scanners(entry_location: impl Into<PathBuf>) -> Self {
        Self::new(entry_location)
            .with_scanner(ArchiveScanner::new())
            .with_scanner(DirectoryScanner::new())
    }

    /// Register a scanner at the end of the scanner order.
    pub fn with_scanner(mut self, scanner: impl SymbolScanner + 'static) -> Self {
        self.scanners.push(Arc::new(scanner));
        self
    }

    /// Register an already shared scanner at the end of the scanner order.
    pub fn with_shared_scanner(mut self, scanner: Arc<dyn SymbolScanner>) -> Self {
        self.scanners.push(scanner);
        self
    }

    /// The root location this context scans.
    pub fn entry_location(&self) -> &Path {
        &self.entry_location
    }

    /// The registered scanners, in registration order.
    pub fn scanners(&self) -> &[Arc<dyn SymbolScanner>] {
        &self.scanners
    }

    /// Names of the registered scanners, in registration order.
    pub fn scanner_names(&self) -> Vec<&str> {
        self.scanners.iter().map(|s| s.name()).collect()
    }
}

impl fmt::Debug for ScanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanContext")
            .field("entry_location", &self.entry_location)
            .field("scanners", &self.scanner_names())
            .finish()
    }
}

/// Trait for scan context resolvers.
///
/// Resolution is idempotent: after the first successful call the same
/// context is returned without re-deriving it.
pub trait ContextResolver: Send + Sync {
    /// Resolve the scan context, or fail when no usable entry location can
    /// be determined.
    fn resolve(&self) -> Result<&ScanContext>;
}

/// Resolver that returns a preassembled context.
///
/// Hosts use this to pin discovery to known roots; tests use it as the
/// substitute for the execution-derived resolver.
#[derive(Debug)]
pub struct FixedContextResolver {
    context: ScanContext,
}

impl FixedContextResolver {
    /// Create a resolver around an already built context.
    pub fn new(context: ScanContext) -> Self {
        Self { context }
    }
}

impl ContextResolver for FixedContextResolver {
    fn resolve(&self) -> Result<&ScanContext> {
        Ok(&self.context)
    }
}

/// Resolver that derives the context from the running executable.
///
/// Packaged execution (the executable is itself an archive package) scans
/// the package; unpacked execution scans the directory the executable sits
/// in. Both built-in scanners are registered either way, so mixed layouts
/// contribute from whichever sources match.
#[derive(Debug, Default)]
pub struct ExecutionContextResolver {
    config: ScannerConfig,
    resolved: OnceLock<ScanContext>,
}

impl ExecutionContextResolver {
    /// Create a resolver with default scanner configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver whose scanners use the given configuration.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            config,
            resolved: OnceLock::new(),
        }
    }

    fn derive(&self) -> Result<ScanContext> {
        let executable = std::env::current_exe().map_err(|e| {
            DiscoveryError::context_resolution(format!(
                "cannot determine executable location: {e}"
            ))
        })?;

        let archive_scanner = ArchiveScanner::with_config(self.config.clone());
        let entry_location = if archive_scanner.supports(&executable) {
            executable
        } else {
            executable
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    DiscoveryError::context_resolution(format!(
                        "executable location {} has no parent directory",
                        executable.display()
                    ))
                })?
        };

        debug!(entry = %entry_location.display(), "resolved scan context from executable");
        Ok(ScanContext::new(entry_location)
            .with_scanner(archive_scanner)
            .with_scanner(DirectoryScanner::with_config(self.config.clone())))
    }
}

impl ContextResolver for ExecutionContextResolver {
    fn resolve(&self) -> Result<&ScanContext> {
        if let Some(context) = self.resolved.get() {
            return Ok(context);
        }
        let context = self.derive()?;
        Ok(self.resolved.get_or_init(|| context))
    }
}
