//! Conjunction of symbol filters.

use crate::filter::SymbolFilter;
use crate::symbol::SymbolDescriptor;
use tracing::trace;

/// Matches symbols that pass every child filter.
///
/// Children are evaluated in registration order and evaluation stops at the
/// first rejection. An empty composite accepts everything.
#[derive(Default)]
pub struct CompositeFilter {
    children: Vec<Box<dyn SymbolFilter>>,
}

impl CompositeFilter {
    /// Create an empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child filter.
    pub fn with(mut self, filter: impl SymbolFilter + 'static) -> Self {
        self.children.push(Box::new(filter));
        self
    }

    /// Append a boxed child filter in place.
    pub fn push(&mut self, filter: Box<dyn SymbolFilter>) {
        self.children.push(filter);
    }

    /// Number of child filters.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check whether the composite has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl SymbolFilter for CompositeFilter {
    fn matches(&self, symbol: &SymbolDescriptor) -> bool {
        for child in &self.children {
            if !child.matches(symbol) {
                trace!(
                    symbol = %symbol.qualified_name(),
                    rejected_by = child.name(),
                    "composite filter short-circuited"
                );
                return false;
            }
        }
        true
    }

    fn name(&self) -> &str {
        "composite"
    }
}
