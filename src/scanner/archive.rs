//! Scanner for archive-packaged sources.
//!
//! Reads the Zip32 central directory only: entry names are all discovery
//! needs, so payloads are never decompressed. All sizes and offsets are
//! untrusted and validated against the file length before use.
//!
//! Not supported (the root is reported unavailable):
//! - Zip64 archives (sentinel 0xFFFF/0xFFFFFFFF fields).
//! - Multi-volume archives.

use crate::error::{DiscoveryError, Result};
use crate::introspect::Introspector;
use crate::scanner::{ScannerConfig, SymbolScanner, qualified_name_for_entry};
use crate::symbol::{SourceOrigin, SymbolDescriptor};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, warn};

const SIG_EOCD: u32 = 0x0605_4b50;
const SIG_CDFH: u32 = 0x0201_4b50;

const EOCD_MIN_LEN: usize = 22;
const EOCD_SEARCH_MAX: usize = 66 * 1024; // 64 KiB comment + header margin

/// Central directory fixed header length.
const CDFH_LEN: usize = 46;

/// Directory prefix for archive packaging metadata, never symbol artifacts.
const PACKAGING_METADATA_PREFIX: &str = "META-INF/";

/// Enumerates symbols from a compressed archive package.
///
/// Entry names inside the archive are the package paths of the symbols.
/// Damaged index records end enumeration early but keep the entries read
/// before the damage; only an unreadable container fails the scan.
#[derive(Debug, Clone, Default)]
pub struct ArchiveScanner {
    config: ScannerConfig,
}

impl ArchiveScanner {
    /// Create a scanner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with the given configuration.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    fn read_entry_names(&self, root: &Path) -> Result<Vec<String>> {
        let mut file =
            File::open(root).map_err(|e| DiscoveryError::source_unavailable(root, e))?;
        let file_len = file
            .metadata()
            .map_err(|e| DiscoveryError::source_unavailable(root, e))?
            .len();
        if file_len < EOCD_MIN_LEN as u64 {
            return Err(DiscoveryError::unusable_source(
                root,
                "too small to hold an archive index",
            ));
        }

        // Read the tail window and locate the end-of-central-directory record.
        let window_len = (file_len as usize).min(EOCD_SEARCH_MAX);
        let window_start = file_len - window_len as u64;
        file.seek(SeekFrom::Start(window_start))
            .map_err(|e| DiscoveryError::source_unavailable(root, e))?;
        let mut window = vec![0u8; window_len];
        file.read_exact(&mut window)
            .map_err(|e| DiscoveryError::source_unavailable(root, e))?;

        let Some(eocd) = find_eocd(&window) else {
            return Err(DiscoveryError::unusable_source(
                root,
                "no end-of-central-directory record",
            ));
        };

        let disk_number = le_u16(&eocd[4..6]);
        let directory_disk = le_u16(&eocd[6..8]);
        let entries_on_disk = le_u16(&eocd[8..10]);
        let entries_total = le_u16(&eocd[10..12]);
        let directory_size = le_u32(&eocd[12..16]);
        let directory_offset = le_u32(&eocd[16..20]);

        if disk_number != 0 || directory_disk != 0 || entries_on_disk != entries_total {
            return Err(DiscoveryError::unusable_source(
                root,
                "multi-volume archives are not supported",
            ));
        }
        if entries_total == 0xFFFF
            || directory_size == 0xFFFF_FFFF
            || directory_offset == 0xFFFF_FFFF
        {
            return Err(DiscoveryError::unusable_source(
                root,
                "zip64 archives are not supported",
            ));
        }

        let directory_start = directory_offset as u64;
        if directory_start.saturating_add(directory_size as u64) > file_len {
            return Err(DiscoveryError::unusable_source(
                root,
                "central directory out of bounds",
            ));
        }

        file.seek(SeekFrom::Start(directory_start))
            .map_err(|e| DiscoveryError::source_unavailable(root, e))?;

        let mut names = Vec::with_capacity(entries_total as usize);
        let mut header = [0u8; CDFH_LEN];
        for index in 0..entries_total {
            if let Err(err) = file.read_exact(&mut header) {
                warn!(
                    root = %root.display(),
                    entry = index,
                    error = %err,
                    "archive index truncated, keeping entries read so far"
                );
                break;
            }
            if le_u32(&header[0..4]) != SIG_CDFH {
                warn!(
                    root = %root.display(),
                    entry = index,
                    "archive index corrupt, keeping entries read so far"
                );
                break;
            }

            let name_len = le_u16(&header[28..30]) as usize;
            let extra_len = le_u16(&header[30..32]) as i64;
            let comment_len = le_u16(&header[32..34]) as i64;

            let mut name = vec![0u8; name_len];
            if let Err(err) = file.read_exact(&mut name) {
                warn!(
                    root = %root.display(),
                    entry = index,
                    error = %err,
                    "archive entry name truncated, keeping entries read so far"
                );
                break;
            }
            if let Err(err) = file.seek(SeekFrom::Current(extra_len + comment_len)) {
                warn!(
                    root = %root.display(),
                    entry = index,
                    error = %err,
                    "archive index unreadable, keeping entries read so far"
                );
                break;
            }

            match String::from_utf8(name) {
                // Trailing separator marks a directory entry.
                Ok(name) if name.ends_with('/') => {}
                Ok(name) => names.push(name),
                Err(_) => {
                    debug!(
                        root = %root.display(),
                        entry = index,
                        "entry name is not valid UTF-8, skipping"
                    );
                }
            }
        }

        Ok(names)
    }
}

impl SymbolScanner for ArchiveScanner {
    fn name(&self) -> &str {
        "archive"
    }

    fn supports(&self, root: &Path) -> bool {
        root.is_file() && read_magic(root).is_some_and(|magic| is_archive_magic(&magic))
    }

    fn scan(&self, root: &Path, introspector: &dyn Introspector) -> Result<Vec<SymbolDescriptor>> {
        debug!(root = %root.display(), "scanning archive package");
        let entries = self.read_entry_names(root)?;

        let mut symbols = Vec::new();
        for entry in entries {
            if entry.starts_with(PACKAGING_METADATA_PREFIX) {
                continue;
            }
            let Some(qualified) =
                qualified_name_for_entry(&entry, &self.config.artifact_extension)
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
                SourceOrigin::Archive(root.to_path_buf()),
            ));
        }

        debug!(root = %root.display(), count = symbols.len(), "archive scan complete");
        Ok(symbols)
    }
}

/// Archive signatures are `PK..`: local header, central directory record,
/// end-of-central-directory (empty archives), or spanning marker.
fn is_archive_magic(header: &[u8; 4]) -> bool {
    header[0] == b'P'
        && header[1] == b'K'
        && matches!((header[2], header[3]), (1, 2) | (3, 4) | (5, 6) | (7, 8))
}

fn read_magic(path: &Path) -> Option<[u8; 4]> {
    let mut file = File::open(path).ok()?;
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).ok()?;
    Some(magic)
}

/// Locate the end-of-central-directory record in the tail window.
///
/// Scans backward so the record closest to the end wins. A candidate must
/// keep its stored comment length inside the window, which rejects signature
/// bytes that happen to appear in entry data.
fn find_eocd(window: &[u8]) -> Option<&[u8]> {
    if window.len() < EOCD_MIN_LEN {
        return None;
    }
    let mut pos = window.len() - EOCD_MIN_LEN;
    loop {
        if le_u32(&window[pos..pos + 4]) == SIG_EOCD {
            let comment_len = le_u16(&window[pos + 20..pos + 22]) as usize;
            if pos + EOCD_MIN_LEN + comment_len <= window.len() {
                return Some(&window[pos..]);
            }
        }
        if pos == 0 {
            return None;
        }
        pos -= 1;
    }
}

fn le_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::TableIntrospector;
    use crate::symbol::SymbolMetadata;
    use crate::test_utils::ArchiveBuilder;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn introspector_for(names: &[&str]) -> TableIntrospector {
        let mut table = TableIntrospector::new();
        for name in names {
            table.insert(*name, SymbolMetadata::new());
        }
        table
    }

    fn write_archive(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_scan_enumerates_archive_entries() {
        let dir = TempDir::new().unwrap();
        let bytes = ArchiveBuilder::new()
            .entry("bot/commands/")
            .entry("bot/commands/Ping.class")
            .entry("bot/commands/Roll.class")
            .entry("META-INF/MANIFEST.MF")
            .build();
        let path = write_archive(&dir, "bot.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let introspector = introspector_for(&["bot.commands.Ping", "bot.commands.Roll"]);
        let symbols = scanner.scan(&path, &introspector).unwrap();

        let names: Vec<_> = symbols.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(names, vec!["bot.commands.Ping", "bot.commands.Roll"]);
        assert_eq!(symbols[0].origin(), &SourceOrigin::Archive(path.clone()));
    }

    #[test]
    fn test_scan_skips_packaging_metadata_entries() {
        let dir = TempDir::new().unwrap();
        let bytes = ArchiveBuilder::new()
            .entry("META-INF/versions/9/bot/Extra.class")
            .entry("bot/Ping.class")
            .build();
        let path = write_archive(&dir, "bot.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let introspector =
            introspector_for(&["META-INF.versions.9.bot.Extra", "bot.Ping"]);
        let symbols = scanner.scan(&path, &introspector).unwrap();

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].qualified_name(), "bot.Ping");
    }

    #[test]
    fn test_scan_empty_archive() {
        let dir = TempDir::new().unwrap();
        let bytes = ArchiveBuilder::new().build();
        let path = write_archive(&dir, "empty.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let symbols = scanner.scan(&path, &introspector_for(&[])).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_scan_tolerates_archive_comment() {
        let dir = TempDir::new().unwrap();
        let mut bytes = ArchiveBuilder::new().entry("bot/Ping.class").build();
        let comment = b"build 2024-05-01";
        let eocd = bytes.len() - 22;
        bytes[eocd + 20..eocd + 22].copy_from_slice(&(comment.len() as u16).to_le_bytes());
        bytes.extend_from_slice(comment);
        let path = write_archive(&dir, "bot.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let symbols = scanner.scan(&path, &introspector_for(&["bot.Ping"])).unwrap();
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_scan_missing_file_is_source_unavailable() {
        let scanner = ArchiveScanner::new();
        let err = scanner
            .scan(&PathBuf::from("/nonexistent/bot.jar"), &introspector_for(&[]))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_scan_rejects_file_without_archive_index() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, "notes.txt", b"just some plain text, long enough");

        let scanner = ArchiveScanner::new();
        let err = scanner.scan(&path, &introspector_for(&[])).unwrap_err();
        assert!(err.to_string().contains("Source unavailable"));
    }

    #[test]
    fn test_scan_rejects_tiny_file() {
        let dir = TempDir::new().unwrap();
        let path = write_archive(&dir, "tiny.jar", b"PK\x05\x06");

        let scanner = ArchiveScanner::new();
        let err = scanner.scan(&path, &introspector_for(&[])).unwrap_err();
        assert!(matches!(err, DiscoveryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_scan_rejects_multi_volume_archive() {
        let dir = TempDir::new().unwrap();
        let mut bytes = ArchiveBuilder::new().entry("bot/Ping.class").build();
        let eocd = bytes.len() - 22;
        bytes[eocd + 4..eocd + 6].copy_from_slice(&1u16.to_le_bytes());
        let path = write_archive(&dir, "bot.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let err = scanner
            .scan(&path, &introspector_for(&["bot.Ping"]))
            .unwrap_err();
        assert!(err.to_string().contains("multi-volume"));
    }

    #[test]
    fn test_scan_rejects_zip64_sentinels() {
        let dir = TempDir::new().unwrap();
        let mut bytes = ArchiveBuilder::new().entry("bot/Ping.class").build();
        let eocd = bytes.len() - 22;
        bytes[eocd + 8..eocd + 10].copy_from_slice(&0xFFFFu16.to_le_bytes());
        bytes[eocd + 10..eocd + 12].copy_from_slice(&0xFFFFu16.to_le_bytes());
        let path = write_archive(&dir, "bot.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let err = scanner
            .scan(&path, &introspector_for(&["bot.Ping"]))
            .unwrap_err();
        assert!(err.to_string().contains("zip64"));
    }

    #[test]
    fn test_scan_keeps_entries_before_index_damage() {
        let dir = TempDir::new().unwrap();
        let mut bytes = ArchiveBuilder::new()
            .entry("bot/Ping.class")
            .entry("bot/Roll.class")
            .build();
        // Corrupt the signature of the second central directory record.
        let second = find_nth_signature(&bytes, SIG_CDFH, 1);
        bytes[second] = b'x';
        let path = write_archive(&dir, "bot.jar", &bytes);

        let scanner = ArchiveScanner::new();
        let introspector = introspector_for(&["bot.Ping", "bot.Roll"]);
        let symbols = scanner.scan(&path, &introspector).unwrap();

        let names: Vec<_> = symbols.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(names, vec!["bot.Ping"]);
    }

    #[test]
    fn test_supports_requires_archive_magic() {
        let dir = TempDir::new().unwrap();
        let archive = write_archive(&dir, "bot.jar", &ArchiveBuilder::new().build());
        let text = write_archive(&dir, "notes.txt", b"hello");

        let scanner = ArchiveScanner::new();
        assert!(scanner.supports(&archive));
        assert!(!scanner.supports(&text));
        assert!(!scanner.supports(dir.path()));
        assert!(!scanner.supports(&PathBuf::from("/nonexistent/bot.jar")));
    }

    fn find_nth_signature(bytes: &[u8], signature: u32, n: usize) -> usize {
        let sig = signature.to_le_bytes();
        bytes
            .windows(4)
            .enumerate()
            .filter(|(_, w)| *w == sig)
            .map(|(i, _)| i)
            .nth(n)
            .unwrap()
    }
}
