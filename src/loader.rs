//! Component loader: the discovery orchestrator.

use crate::context::{ContextResolver, ExecutionContextResolver, FixedContextResolver, ScanContext};
use crate::error::Result;
use crate::filter::SymbolFilter;
use crate::introspect::Introspector;
use crate::symbol::SymbolDescriptor;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Discovers components by running every active scanner against the resolved
/// entry location and filtering the merged result.
///
/// A failed scanner contributes nothing and the scan proceeds; only a failed
/// context resolution aborts the call. Results are deduplicated by qualified
/// name before filtering; the first discovery of a name wins and result
/// order follows discovery order.
pub struct ComponentLoader {
    resolver: Box<dyn ContextResolver>,
    introspector: Arc<dyn Introspector>,
}

impl ComponentLoader {
    /// Create a loader from a resolver and an introspector.
    pub fn new(
        resolver: impl ContextResolver + 'static,
        introspector: impl Introspector + 'static,
    ) -> Self {
        Self {
            resolver: Box::new(resolver),
            introspector: Arc::new(introspector),
        }
    }

    /// Create a loader that derives its context from the running executable.
    pub fn from_execution_environment(introspector: impl Introspector + 'static) -> Self {
        Self::new(ExecutionContextResolver::new(), introspector)
    }

    /// Create a loader bound to an already assembled context.
    pub fn with_context(context: ScanContext, introspector: impl Introspector + 'static) -> Self {
        Self::new(FixedContextResolver::new(context), introspector)
    }

    /// Discover all symbols matching `filter`.
    ///
    /// An empty result is a valid outcome, not an error.
    pub fn scan(&self, filter: &dyn SymbolFilter) -> Result<Vec<SymbolDescriptor>> {
        let context = self.resolver.resolve()?;
        let root = context.entry_location();
        debug!(
            root = %root.display(),
            scanners = ?context.scanner_names(),
            filter = filter.name(),
            "starting discovery scan"
        );

        let mut seen = FxHashSet::default();
        let mut discovered = Vec::new();
        for scanner in context.scanners() {
            if !scanner.supports(root) {
                debug!(
                    scanner = scanner.name(),
                    root = %root.display(),
                    "scanner does not support root, skipping"
                );
                continue;
            }
            let symbols = match scanner.scan(root, self.introspector.as_ref()) {
                Ok(symbols) => symbols,
                Err(err) => {
                    warn!(
                        scanner = scanner.name(),
                        root = %root.display(),
                        error = %err,
                        "scanner failed, treating its contribution as empty"
                    );
                    continue;
                }
            };
            for symbol in symbols {
                if seen.insert(symbol.qualified_name().to_string()) {
                    discovered.push(symbol);
                } else {
                    trace!(
                        symbol = %symbol.qualified_name(),
                        scanner = scanner.name(),
                        "duplicate symbol dropped"
                    );
                }
            }
        }

        let total = discovered.len();
        let matched: Vec<_> = discovered
            .into_iter()
            .filter(|symbol| filter.matches(symbol))
            .collect();
        debug!(
            discovered = total,
            matched = matched.len(),
            "discovery scan complete"
        );
        Ok(matched)
    }
}
