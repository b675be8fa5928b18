//! Symbol introspection.
//!
//! Scanners enumerate candidate names; an [`Introspector`] turns each name
//! into the metadata the filters evaluate. The engine never inspects symbol
//! internals itself, so hosts decide where metadata comes from (a bytecode
//! reader, a build-time index, a fixture table).

use crate::symbol::SymbolMetadata;
use rustc_hash::FxHashMap;

/// Trait for resolving the declared metadata of a symbol.
///
/// Implementations must be cheap to call repeatedly: the loader invokes
/// `describe` once per candidate name per scan.
pub trait Introspector: Send + Sync {
    /// Resolve the markers and contracts declared on `qualified_name`.
    ///
    /// Returns `None` when the symbol is unknown or cannot be described;
    /// the candidate is then skipped without failing the scan.
    fn describe(&self, qualified_name: &str) -> Option<SymbolMetadata>;
}

/// Map-backed introspector over precomputed metadata.
///
/// Suits hosts that index their symbols ahead of time, and doubles as the
/// fixture introspector in tests.
#[derive(Debug, Clone, Default)]
pub struct TableIntrospector {
    table: FxHashMap<String, SymbolMetadata>,
}

impl TableIntrospector {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol entry, replacing any previous metadata for the name.
    pub fn with_symbol(
        mut self,
        qualified_name: impl Into<String>,
        metadata: SymbolMetadata,
    ) -> Self {
        self.insert(qualified_name, metadata);
        self
    }

    /// Insert a symbol entry in place.
    pub fn insert(&mut self, qualified_name: impl Into<String>, metadata: SymbolMetadata) {
        self.table.insert(qualified_name.into(), metadata);
    }

    /// Number of known symbols.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Introspector for TableIntrospector {
    fn describe(&self, qualified_name: &str) -> Option<SymbolMetadata> {
        self.table.get(qualified_name).cloned()
    }
}
