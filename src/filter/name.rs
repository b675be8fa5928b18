//! Name-pattern symbol filter.

use crate::filter::SymbolFilter;
use crate::symbol::SymbolDescriptor;
use regex::Regex;
use tracing::trace;

/// Matches symbols whose qualified name matches a regex.
///
/// Useful for scoping discovery to a package prefix (`^bot\.commands\.`)
/// or a naming convention (`Builder$`) without touching metadata.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Regex,
}

impl NameFilter {
    /// Compile a filter from a regex pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// The source pattern this filter matches against.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl SymbolFilter for NameFilter {
    fn matches(&self, symbol: &SymbolDescriptor) -> bool {
        let matched = self.pattern.is_match(symbol.qualified_name());
        trace!(
            symbol = %symbol.qualified_name(),
            pattern = self.pattern.as_str(),
            matched,
            "name filter evaluated"
        );
        matched
    }

    fn name(&self) -> &str {
        "name"
    }
}
