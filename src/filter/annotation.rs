//! Marker-based symbol filter.

use crate::filter::SymbolFilter;
use crate::symbol::{MarkerId, SymbolDescriptor};
use tracing::trace;

/// Matches symbols that carry a specific marker annotation.
///
/// Only direct presence counts: the filter does not chase meta-markers or
/// any other indirection.
#[derive(Debug, Clone)]
pub struct AnnotationFilter {
    marker: MarkerId,
}

impl AnnotationFilter {
    /// Create a filter for the given marker.
    pub fn new(marker: impl Into<MarkerId>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The marker this filter requires.
    pub fn marker(&self) -> &MarkerId {
        &self.marker
    }
}

impl SymbolFilter for AnnotationFilter {
    fn matches(&self, symbol: &SymbolDescriptor) -> bool {
        let matched = symbol.has_annotation(&self.marker);
        trace!(
            symbol = %symbol.qualified_name(),
            marker = %self.marker,
            matched,
            "annotation filter evaluated"
        );
        matched
    }

    fn name(&self) -> &str {
        "annotation"
    }
}
