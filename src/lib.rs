pub mod context;
pub mod error;
pub mod filter;
pub mod introspect;
pub mod loader;
pub mod scanner;
pub mod symbol;
pub mod test_utils;

pub use context::{ContextResolver, ExecutionContextResolver, FixedContextResolver, ScanContext};
pub use error::{DiscoveryError, Result};
pub use filter::{AnnotationFilter, CompositeFilter, InterfaceFilter, NameFilter, SymbolFilter};
pub use introspect::{Introspector, TableIntrospector};
pub use loader::ComponentLoader;
pub use scanner::{ArchiveScanner, DirectoryScanner, ScannerConfig, SymbolScanner};
pub use symbol::{ContractId, MarkerId, SourceOrigin, SymbolDescriptor, SymbolMetadata};
