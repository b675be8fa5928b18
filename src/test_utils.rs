//! Fixture helpers for exercising scanners against real files.

use std::io;
use std::path::Path;

/// Deterministic Zip32 archive builder for fixtures.
///
/// Entries are stored uncompressed with fixed timestamps and explicit sizes,
/// so output bytes are stable across runs. Names ending in `/` become
/// directory entries. Checksums are left zeroed; discovery never reads entry
/// payloads.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry with no payload.
    pub fn entry(self, name: impl Into<String>) -> Self {
        self.entry_with_payload(name, Vec::new())
    }

    /// Add an entry with payload bytes.
    pub fn entry_with_payload(
        mut self,
        name: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        self.entries.push((name.into(), payload.into()));
        self
    }

    /// Serialize the archive to bytes.
    pub fn build(&self) -> Vec<u8> {
        fn u16le(v: u16) -> [u8; 2] {
            v.to_le_bytes()
        }
        fn u32le(v: u32) -> [u8; 4] {
            v.to_le_bytes()
        }

        let mut out = Vec::new();
        let mut directory = Vec::new();

        for (name, payload) in &self.entries {
            let name_bytes = name.as_bytes();
            let local_offset = out.len() as u32;

            out.extend_from_slice(&u32le(0x0403_4b50));
            out.extend_from_slice(&u16le(20)); // version needed
            out.extend_from_slice(&u16le(0)); // flags
            out.extend_from_slice(&u16le(0)); // method: stored
            out.extend_from_slice(&u16le(0)); // mod time
            out.extend_from_slice(&u16le(0)); // mod date
            out.extend_from_slice(&u32le(0)); // crc32
            out.extend_from_slice(&u32le(payload.len() as u32));
            out.extend_from_slice(&u32le(payload.len() as u32));
            out.extend_from_slice(&u16le(name_bytes.len() as u16));
            out.extend_from_slice(&u16le(0)); // extra len
            out.extend_from_slice(name_bytes);
            out.extend_from_slice(payload);

            directory.extend_from_slice(&u32le(0x0201_4b50));
            directory.extend_from_slice(&u16le(0)); // version made by
            directory.extend_from_slice(&u16le(20)); // version needed
            directory.extend_from_slice(&u16le(0)); // flags
            directory.extend_from_slice(&u16le(0)); // method
            directory.extend_from_slice(&u16le(0)); // mod time
            directory.extend_from_slice(&u16le(0)); // mod date
            directory.extend_from_slice(&u32le(0)); // crc32
            directory.extend_from_slice(&u32le(payload.len() as u32));
            directory.extend_from_slice(&u32le(payload.len() as u32));
            directory.extend_from_slice(&u16le(name_bytes.len() as u16));
            directory.extend_from_slice(&u16le(0)); // extra len
            directory.extend_from_slice(&u16le(0)); // comment len
            directory.extend_from_slice(&u16le(0)); // disk number
            directory.extend_from_slice(&u16le(0)); // internal attrs
            directory.extend_from_slice(&u32le(0)); // external attrs
            directory.extend_from_slice(&u32le(local_offset));
            directory.extend_from_slice(name_bytes);
        }

        let directory_offset = out.len() as u32;
        out.extend_from_slice(&directory);

        out.extend_from_slice(&u32le(0x0605_4b50));
        out.extend_from_slice(&u16le(0)); // disk number
        out.extend_from_slice(&u16le(0)); // directory disk
        out.extend_from_slice(&u16le(self.entries.len() as u16));
        out.extend_from_slice(&u16le(self.entries.len() as u16));
        out.extend_from_slice(&u32le(directory.len() as u32));
        out.extend_from_slice(&u32le(directory_offset));
        out.extend_from_slice(&u16le(0)); // comment len

        out
    }

    /// Build the archive and write it to `path`.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.build())
    }
}

/// Create empty files at the given root-relative paths, creating parent
/// directories as needed.
pub fn populate_tree(root: &Path, entries: &[&str]) -> io::Result<()> {
    for entry in entries {
        let path = root.join(entry);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, b"")?;
    }
    Ok(())
}
