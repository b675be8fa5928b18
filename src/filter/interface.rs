//! Contract-based symbol filter.

use crate::filter::SymbolFilter;
use crate::symbol::{ContractId, SymbolDescriptor};
use tracing::trace;

/// Matches symbols that implement a specific contract.
///
/// Inherited contracts count: the introspector reports the full contract set
/// of a symbol, so a match here covers transitive implementation.
#[derive(Debug, Clone)]
pub struct InterfaceFilter {
    contract: ContractId,
}

impl InterfaceFilter {
    /// Create a filter for the given contract.
    pub fn new(contract: impl Into<ContractId>) -> Self {
        Self {
            contract: contract.into(),
        }
    }

    /// The contract this filter requires.
    pub fn contract(&self) -> &ContractId {
        &self.contract
    }
}

impl SymbolFilter for InterfaceFilter {
    fn matches(&self, symbol: &SymbolDescriptor) -> bool {
        let matched = symbol.implements(&self.contract);
        trace!(
            symbol = %symbol.qualified_name(),
            contract = %self.contract,
            matched,
            "interface filter evaluated"
        );
        matched
    }

    fn name(&self) -> &str {
        "interface"
    }
}
