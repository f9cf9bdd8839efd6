//! Optional on-disk payload cache, keyed by URN.
//!
//! One file per (urn, kind); writes are idempotent single-file overwrites.
//! Nothing here coordinates concurrent importers.

use std::path::PathBuf;

use lei_core::hash::sha256_hex;
use log::debug;

use crate::error::Result;

/// File-backed cache directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, urn: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{ext}", sha256_hex(urn)))
    }

    /// Cached payload for `urn`, if present.
    pub fn get(&self, urn: &str, ext: &str) -> Option<Vec<u8>> {
        let path = self.path_for(urn, ext);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!("cache hit: {}", path.display());
                Some(bytes)
            }
            Err(_) => None,
        }
    }

    /// Store a payload, overwriting any previous entry.
    pub fn put(&self, urn: &str, ext: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(urn, ext);
        std::fs::write(&path, bytes)?;
        debug!("cache write: {}", path.display());
        Ok(())
    }
}
