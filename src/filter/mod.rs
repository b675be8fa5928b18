//! Structural filters over discovered symbols.
//!
//! Filters are pure predicates: they read a [`SymbolDescriptor`] and answer
//! yes or no, with no side effects and no mutation of the descriptor. The
//! loader applies one filter per discovery call; use [`CompositeFilter`] to
//! express a conjunction.
//!
//! Available filters:
//! - `AnnotationFilter` - Matches symbols carrying a marker
//! - `InterfaceFilter` - Matches symbols implementing a contract
//! - `NameFilter` - Matches qualified names against a pattern
//! - `CompositeFilter` - Conjunction of other filters

pub mod annotation;
pub mod composite;
pub mod interface;
pub mod name;

pub use annotation::AnnotationFilter;
pub use composite::CompositeFilter;
pub use interface::InterfaceFilter;
pub use name::NameFilter;

use crate::symbol::SymbolDescriptor;

/// Trait for symbol predicates.
///
/// Implementations must be stateless with respect to evaluation: calling
/// `matches` twice on the same descriptor returns the same answer.
pub trait SymbolFilter: Send + Sync {
    /// Decide whether the symbol passes the filter.
    fn matches(&self, symbol: &SymbolDescriptor) -> bool;

    /// Get the name of this filter, used in trace output.
    fn name(&self) -> &str;
}
