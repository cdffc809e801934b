use anyhow::{Context, Result};

use crate::errors::ChecksumMissing;
use crate::models::repo_config::HashAlgo;

/// Parse a `SHA256SUMS`-style manifest and extract the digest for
/// `asset_name` (spec §4.8). Accepts a bare single-digest file (per-asset
/// sidecar) or the standard `digest  filename` / `digest *filename`
/// layout, skipping blank lines and `#` comments.
pub fn extract_digest(contents: &[u8], algo: HashAlgo, asset_name: &str) -> Result<String> {
    let text = String::from_utf8_lossy(contents);
    let trimmed = text.trim();

    if is_bare_digest(trimmed, algo) {
        return Ok(trimmed.to_lowercase());
    }

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((digest, filename)) = split_digest_line(line) else {
            continue;
        };

        let basename = filename.trim_start_matches("./");
        let basename = basename.rsplit('/').next().unwrap_or(basename);

        if basename == asset_name {
            return Ok(digest.to_lowercase());
        }
    }

    Err(ChecksumMissing(format!("checksum for {asset_name} not found")))
        .context("parsing checksum manifest")
}

fn is_bare_digest(trimmed: &str, algo: HashAlgo) -> bool {
    trimmed.len() == algo.digest_len_hex() && trimmed.chars().all(|c| c.is_ascii_hexdigit())
}

/// Split a manifest line into `(digest, filename)`. The first whitespace
/// field is the digest; the last whitespace field is the filename — there
/// may be a `*` binary-mode marker directly before the filename, which is
/// stripped.
fn split_digest_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let digest = parts.next()?;
    let filename = parts.last()?;
    let filename = filename.trim_start_matches('*');
    if digest.is_empty() || filename.is_empty() {
        return None;
    }
    Some((digest, filename))
}

pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::Digest;
    format!("{:x}", sha2::Sha256::digest(data))
}

pub fn sha512_hex(data: &[u8]) -> String {
    use sha2::Digest;
    format!("{:x}", sha2::Sha512::digest(data))
}

pub fn digest_hex(data: &[u8], algo: HashAlgo) -> String {
    match algo {
        HashAlgo::Sha256 => sha256_hex(data),
        HashAlgo::Sha512 => sha512_hex(data),
    }
}

#[cfg(test)]
#[path = "../../tests/verify/checksum.rs"]
mod tests;
