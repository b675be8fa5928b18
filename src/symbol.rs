//! Symbol descriptors and the identifier newtypes they are built from.
//!
//! A [`SymbolDescriptor`] is the unit produced by scanning: one class-like
//! artifact, its declared markers and contracts, and the source that produced
//! it. Descriptors are immutable once produced; scanning never touches a
//! descriptor after yielding it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker (annotation/attribute) identifier.
///
/// Wraps a string to provide type safety when passing marker names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    /// Create a new MarkerId from any string-like type.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for MarkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MarkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for MarkerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract (interface/supertype) identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    /// Create a new ContractId from any string-like type.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for ContractId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContractId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ContractId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared metadata of a symbol: its markers and implemented contracts.
///
/// Produced by an [`Introspector`](crate::introspect::Introspector), consumed
/// by filters. Contract sets include inherited contracts; the engine does not
/// walk type hierarchies itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMetadata {
    annotations: BTreeSet<MarkerId>,
    contracts: BTreeSet<ContractId>,
}

impl SymbolMetadata {
    /// Create empty metadata (no markers, no contracts).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a marker annotation.
    pub fn with_annotation(mut self, marker: impl Into<MarkerId>) -> Self {
        self.annotations.insert(marker.into());
        self
    }

    /// Add an implemented contract.
    pub fn with_contract(mut self, contract: impl Into<ContractId>) -> Self {
        self.contracts.insert(contract.into());
        self
    }

    /// Check whether a marker is present.
    pub fn has_annotation(&self, marker: &MarkerId) -> bool {
        self.annotations.contains(marker)
    }

    /// Check whether a contract is implemented.
    pub fn implements(&self, contract: &ContractId) -> bool {
        self.contracts.contains(contract)
    }

    /// All declared markers, in stable order.
    pub fn annotations(&self) -> &BTreeSet<MarkerId> {
        &self.annotations
    }

    /// All implemented contracts, in stable order.
    pub fn contracts(&self) -> &BTreeSet<ContractId> {
        &self.contracts
    }
}

/// The source a descriptor was produced from (scanner kind plus root).
///
/// This is a descriptive back-reference, not ownership of the scanner: the
/// descriptor stays valid after the scanner is gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    /// Produced from a compressed archive package.
    Archive(PathBuf),
    /// Produced from a loose directory tree.
    Directory(PathBuf),
}

impl SourceOrigin {
    /// The root location the symbol was enumerated from.
    pub fn root(&self) -> &Path {
        match self {
            SourceOrigin::Archive(path) => path,
            SourceOrigin::Directory(path) => path,
        }
    }

    /// Short label for the producing scanner kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceOrigin::Archive(_) => "archive",
            SourceOrigin::Directory(_) => "directory",
        }
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.root().display())
    }
}

/// A discovered class-like symbol.
///
/// Fields are private on purpose: a descriptor is immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    qualified_name: String,
    #[serde(flatten)]
    metadata: SymbolMetadata,
    origin: SourceOrigin,
}

impl SymbolDescriptor {
    /// Create a new descriptor.
    pub fn new(
        qualified_name: impl Into<String>,
        metadata: SymbolMetadata,
        origin: SourceOrigin,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            metadata,
            origin,
        }
    }

    /// Fully qualified symbol name, unique within a scan.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Check whether a marker is declared on the symbol.
    pub fn has_annotation(&self, marker: &MarkerId) -> bool {
        self.metadata.has_annotation(marker)
    }

    /// Check whether the symbol implements a contract (including inherited).
    pub fn implements(&self, contract: &ContractId) -> bool {
        self.metadata.implements(contract)
    }

    /// Declared markers.
    pub fn annotations(&self) -> &BTreeSet<MarkerId> {
        self.metadata.annotations()
    }

    /// Implemented contracts.
    pub fn contracts(&self) -> &BTreeSet<ContractId> {
        self.metadata.contracts()
    }

    /// The source this descriptor was produced from.
    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }
}

impl fmt::Display for SymbolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> SymbolDescriptor {
        SymbolDescriptor::new(
            "bot.commands.Ping",
            SymbolMetadata::new()
                .with_annotation("CommandBuilder")
                .with_contract("SlashCommandBuilder"),
            SourceOrigin::Directory(PathBuf::from("/srv/bot/classes")),
        )
    }

    #[test]
    fn test_marker_id_display() {
        let id = MarkerId::new("CommandBuilder");
        assert_eq!(format!("{}", id), "CommandBuilder");
    }

    #[test]
    fn test_marker_id_from_str() {
        let id: MarkerId = "CommandBuilder".into();
        assert_eq!(id.as_str(), "CommandBuilder");
        assert_eq!(id.into_inner(), "CommandBuilder".to_string());
    }

    #[test]
    fn test_contract_id_equality() {
        let a = ContractId::new("SlashCommandBuilder");
        let b = ContractId::from(String::from("SlashCommandBuilder"));
        let c = ContractId::new("SlashCommandHandler");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_metadata_membership() {
        let metadata = SymbolMetadata::new()
            .with_annotation("CommandBuilder")
            .with_contract("SlashCommandBuilder");
        assert!(metadata.has_annotation(&MarkerId::new("CommandBuilder")));
        assert!(!metadata.has_annotation(&MarkerId::new("Deprecated")));
        assert!(metadata.implements(&ContractId::new("SlashCommandBuilder")));
        assert!(!metadata.implements(&ContractId::new("SlashCommandHandler")));
    }

    #[test]
    fn test_metadata_deduplicates() {
        let metadata = SymbolMetadata::new()
            .with_annotation("CommandBuilder")
            .with_annotation("CommandBuilder");
        assert_eq!(metadata.annotations().len(), 1);
    }

    #[test]
    fn test_descriptor_accessors() {
        let d = descriptor();
        assert_eq!(d.qualified_name(), "bot.commands.Ping");
        assert_eq!(d.simple_name(), "Ping");
        assert!(d.has_annotation(&MarkerId::new("CommandBuilder")));
        assert!(d.implements(&ContractId::new("SlashCommandBuilder")));
        assert_eq!(d.origin().kind(), "directory");
        assert_eq!(d.origin().root(), Path::new("/srv/bot/classes"));
    }

    #[test]
    fn test_simple_name_without_package() {
        let d = SymbolDescriptor::new(
            "Ping",
            SymbolMetadata::new(),
            SourceOrigin::Archive(PathBuf::from("/srv/bot/bot.jar")),
        );
        assert_eq!(d.simple_name(), "Ping");
    }

    #[test]
    fn test_origin_display() {
        let origin = SourceOrigin::Archive(PathBuf::from("/srv/bot/bot.jar"));
        assert_eq!(format!("{}", origin), "archive:/srv/bot/bot.jar");
    }

    #[test]
    fn test_descriptor_serde_round_trip() {
        let d = descriptor();
        let json = serde_json::to_string(&d).unwrap();
        let back: SymbolDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_descriptor_serializes_flat_metadata() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(json["qualified_name"], "bot.commands.Ping");
        assert_eq!(json["annotations"][0], "CommandBuilder");
        assert_eq!(json["contracts"][0], "SlashCommandBuilder");
    }
}
