//! Scanner for loose directory-tree sources.

use crate::error::{DiscoveryError, Result};
use crate::introspect::Introspector;
use crate::scanner::{ScannerConfig, SymbolScanner, qualified_name_for_entry};
use crate::symbol::{SourceOrigin, SymbolDescriptor};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Enumerates symbols from an unpacked directory tree.
///
/// Every artifact file below the root becomes a candidate; its path relative
/// to the root is the package path of the symbol. Traversal order is sorted
/// by file name so repeated scans enumerate identically.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    config: ScannerConfig,
}

impl DirectoryScanner {
    /// Create a scanner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with the given configuration.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    fn relative_entry_path(root: &Path, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            segments.push(component.as_os_str().to_str()?);
        }
        Some(segments.join("/"))
    }
}

impl SymbolScanner for DirectoryScanner {
    fn name(&self) -> &str {
        "directory"
    }

    fn supports(&self, root: &Path) -> bool {
        root.is_dir()
    }

    fn scan(&self, root: &Path, introspector: &dyn Introspector) -> Result<Vec<SymbolDescriptor>> {
        let metadata =
            std::fs::metadata(root).map_err(|e| DiscoveryError::source_unavailable(root, e))?;
        if !metadata.is_dir() {
            return Err(DiscoveryError::unusable_source(root, "not a directory"));
        }

        debug!(root = %root.display(), "scanning directory tree");

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut symbols = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(entry_path) = Self::relative_entry_path(root, entry.path()) else {
                debug!(path = %entry.path().display(), "entry path is not valid UTF-8, skipping");
                continue;
            };
            let Some(qualified) =
                qualified_name_for_entry(&entry_path, &self.config.artifact_extension)
            else {
                continue;
            };
            let Some(symbol_metadata) = introspector.describe(&qualified) else {
                debug!(symbol = %qualified, "introspector cannot describe symbol, skipping");
                continue;
            };

            symbols.push(SymbolDescriptor::new(
                qualified,
                symbol_metadata,
                SourceOrigin::Directory(root.to_path_buf()),
            ));
        }

        debug!(root = %root.display(), count = symbols.len(), "directory scan complete");
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::TableIntrospector;
    use crate::symbol::SymbolMetadata;
    use crate::test_utils::populate_tree;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn introspector_for(names: &[&str]) -> TableIntrospector {
        let mut table = TableIntrospector::new();
        for name in names {
            table.insert(*name, SymbolMetadata::new());
        }
        table
    }

    #[test]
    fn test_scan_enumerates_artifact_files() {
        let dir = TempDir::new().unwrap();
        populate_tree(
            dir.path(),
            &[
                "bot/commands/Ping.class",
                "bot/commands/Roll.class",
                "bot/README.md",
            ],
        )
        .unwrap();

        let scanner = DirectoryScanner::new();
        let introspector = introspector_for(&["bot.commands.Ping", "bot.commands.Roll"]);
        let symbols = scanner.scan(dir.path(), &introspector).unwrap();

        let names: Vec<_> = symbols.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(names, vec!["bot.commands.Ping", "bot.commands.Roll"]);
    }

    #[test]
    fn test_scan_records_directory_origin() {
        let dir = TempDir::new().unwrap();
        populate_tree(dir.path(), &["bot/Ping.class"]).unwrap();

        let scanner = DirectoryScanner::new();
        let introspector = introspector_for(&["bot.Ping"]);
        let symbols = scanner.scan(dir.path(), &introspector).unwrap();

        assert_eq!(symbols.len(), 1);
        assert_eq!(
            symbols[0].origin(),
            &SourceOrigin::Directory(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_scan_skips_undescribable_symbols() {
        let dir = TempDir::new().unwrap();
        populate_tree(dir.path(), &["bot/Ping.class", "bot/Ghost.class"]).unwrap();

        let scanner = DirectoryScanner::new();
        let introspector = introspector_for(&["bot.Ping"]);
        let symbols = scanner.scan(dir.path(), &introspector).unwrap();

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].qualified_name(), "bot.Ping");
    }

    #[test]
    fn test_scan_skips_nested_artifacts() {
        let dir = TempDir::new().unwrap();
        populate_tree(dir.path(), &["bot/Ping.class", "bot/Ping$Inner.class"]).unwrap();

        let scanner = DirectoryScanner::new();
        let introspector = introspector_for(&["bot.Ping", "bot.Ping$Inner"]);
        let symbols = scanner.scan(dir.path(), &introspector).unwrap();

        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_scan_missing_root_is_source_unavailable() {
        let scanner = DirectoryScanner::new();
        let introspector = introspector_for(&[]);
        let err = scanner
            .scan(&PathBuf::from("/nonexistent/classes"), &introspector)
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_scan_file_root_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bot.jar");
        std::fs::write(&file, b"not a directory").unwrap();

        let scanner = DirectoryScanner::new();
        let introspector = introspector_for(&[]);
        let err = scanner.scan(&file, &introspector).unwrap_err();

        assert!(matches!(err, DiscoveryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_scan_respects_max_depth() {
        let dir = TempDir::new().unwrap();
        populate_tree(dir.path(), &["Top.class", "bot/deep/Nested.class"]).unwrap();

        let scanner = DirectoryScanner::with_config(ScannerConfig::new().with_max_depth(1));
        let introspector = introspector_for(&["Top", "bot.deep.Nested"]);
        let symbols = scanner.scan(dir.path(), &introspector).unwrap();

        let names: Vec<_> = symbols.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(names, vec!["Top"]);
    }

    #[test]
    fn test_scan_custom_extension() {
        let dir = TempDir::new().unwrap();
        populate_tree(dir.path(), &["bot/Ping.sym", "bot/Roll.class"]).unwrap();

        let scanner =
            DirectoryScanner::with_config(ScannerConfig::new().with_artifact_extension("sym"));
        let introspector = introspector_for(&["bot.Ping", "bot.Roll"]);
        let symbols = scanner.scan(dir.path(), &introspector).unwrap();

        let names: Vec<_> = symbols.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(names, vec!["bot.Ping"]);
    }

    #[test]
    fn test_supports_only_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bot.jar");
        std::fs::write(&file, b"PK\x05\x06").unwrap();

        let scanner = DirectoryScanner::new();
        assert!(scanner.supports(dir.path()));
        assert!(!scanner.supports(&file));
        assert!(!scanner.supports(&PathBuf::from("/nonexistent/classes")));
    }
}
