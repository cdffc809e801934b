use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::verify::checksum::digest_hex;
use crate::models::repo_config::HashAlgo;
use crate::utils::fs_move::move_file_or_dir;

/// Content-addressed store at `<cache-root>/<lowercase-hex-digest>/<asset-filename>`
/// (spec §3/§6). Identical bytes always produce the same path, so repeat
/// and concurrent runs of the same asset are no-ops — no locking needed.
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn default_root() -> PathBuf {
        if let Ok(dir) = std::env::var("SFETCH_CACHE_DIR") {
            return PathBuf::from(dir);
        }
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return PathBuf::from(xdg).join("sfetch");
        }
        dirs::home_dir()
            .map(|h| h.join(".cache").join("sfetch"))
            .unwrap_or_else(|| PathBuf::from(".sfetch-cache"))
    }

    pub fn path_for(&self, digest: &str, filename: &str) -> PathBuf {
        self.root.join(digest.to_lowercase()).join(filename)
    }

    pub fn has(&self, digest: &str, filename: &str) -> bool {
        self.path_for(digest, filename).exists()
    }

    /// Move already-verified bytes at `src` into the cache, keyed by the
    /// digest of their *actual* content (not whatever algorithm the
    /// manifest used) so the cache stays addressed by a single hash
    /// space.
    pub fn store(&self, src: &Path, filename: &str) -> Result<PathBuf> {
        let bytes = std::fs::read(src).with_context(|| format!("reading {}", src.display()))?;
        let digest = digest_hex(&bytes, HashAlgo::Sha256);
        let dest_dir = self.root.join(&digest);
        std::fs::create_dir_all(&dest_dir)
            .with_context(|| format!("creating cache directory {}", dest_dir.display()))?;
        let dest = dest_dir.join(filename);
        if dest.exists() {
            // Idempotent: identical bytes already cached under this digest.
            return Ok(dest);
        }
        move_file_or_dir(src, &dest)?;
        Ok(dest)
    }
}

#[cfg(test)]
#[path = "../tests/root/cache.rs"]
mod tests;
