use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::discovery::classifier::{classify, AssetKind};
use crate::errors::KeyInvalid;
use crate::models::Release;

/// Known secret-key minisign prefixes; a `.pub` file that actually holds
/// one of these must be rejected loudly rather than silently failing
/// verification later (spec §4.9).
const SECRET_KEY_PREFIXES: &[&str] = &["RWQAAEIy", "RWRTY0Iy"];
const SECRET_KEY_LINE_LEN: usize = 212;
const PUBLIC_KEY_LINE_LEN: usize = 56;

#[derive(Debug, Clone, Default)]
pub struct KeyFlags {
    pub minisign_key: Option<PathBuf>,
    pub minisign_key_url: Option<String>,
    pub minisign_key_asset: Option<String>,
    pub pgp_key_file: Option<PathBuf>,
    pub pgp_key_url: Option<String>,
    pub pgp_key_asset: Option<String>,
}

/// Validate a minisign `.pub` file's contents and return the bare
/// base64 key line (spec §4.9). Exposed separately so it can be unit
/// tested and reused outside key resolution.
pub fn validate_minisign_pubkey(contents: &str) -> Result<String> {
    let lines: Vec<&str> = contents.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    if lines.len() >= 4 {
        return Err(KeyInvalid(
            "this looks like a minisign SIGNATURE, not a public key".into(),
        )
        .into());
    }

    let key_line = lines
        .iter()
        .find(|l| l.starts_with("RW"))
        .ok_or_else(|| KeyInvalid("no minisign key line found (expected a line starting with RW)".into()))?;

    if key_line.len() == SECRET_KEY_LINE_LEN
        || SECRET_KEY_PREFIXES.iter().any(|p| key_line.starts_with(p))
    {
        return Err(KeyInvalid("this is a SECRET KEY, not a public key".into()).into());
    }

    if key_line.len() != PUBLIC_KEY_LINE_LEN {
        return Err(KeyInvalid(format!(
            "malformed minisign public key: expected {PUBLIC_KEY_LINE_LEN} base64 characters, got {}",
            key_line.len()
        ))
        .into());
    }

    Ok(key_line.to_string())
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?;
    resp.error_for_status_ref()
        .with_context(|| format!("key fetch from {url} failed"))?;
    resp.text().await.context("reading key response body")
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?;
    resp.error_for_status_ref()
        .with_context(|| format!("key fetch from {url} failed"))?;
    Ok(resp.bytes().await.context("reading key response body")?.to_vec())
}

fn looks_like_minisign_key_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    if classify(name).kind == AssetKind::Archive {
        return false;
    }
    if !lower.ends_with(".pub") {
        return false;
    }
    lower.contains("minisign") || lower.ends_with("-signing-key.pub") || lower == "release-key.pub"
}

/// Resolve the minisign public key to verify with, in priority order:
/// explicit file, explicit URL, explicit release asset, auto-detection,
/// failure naming the flags the caller could pass (spec §4.9).
pub async fn resolve_minisign_key(
    client: &reqwest::Client,
    release: &Release,
    flags: &KeyFlags,
) -> Result<String> {
    if let Some(path) = &flags.minisign_key {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading minisign key file {}", path.display()))?;
        return validate_minisign_pubkey(&contents);
    }

    if let Some(url) = &flags.minisign_key_url {
        let contents = fetch_text(client, url).await?;
        return validate_minisign_pubkey(&contents);
    }

    if let Some(name) = &flags.minisign_key_asset {
        let asset = release
            .get_asset(name)
            .ok_or_else(|| KeyInvalid(format!("release has no asset named {name}")))?;
        let contents = fetch_text(client, &asset.download_url).await?;
        return validate_minisign_pubkey(&contents);
    }

    if let Some(asset) = release.assets.iter().find(|a| looks_like_minisign_key_name(&a.name)) {
        let contents = fetch_text(client, &asset.download_url).await?;
        return validate_minisign_pubkey(&contents);
    }

    Err(KeyInvalid(
        "no minisign public key configured — pass --minisign-key, --minisign-key-url, or --minisign-key-asset"
            .into(),
    )
    .into())
}

/// Validate an OpenPGP key file's contents and reject secret keys (spec
/// §4.9's sanity check, extended to PGP per the same "this is a SECRET
/// KEY" requirement). Exposed separately so it can run eagerly, before
/// any network I/O, on an explicitly-supplied `--pgp-key-file`.
pub fn validate_pgp_pubkey(contents: &[u8]) -> Result<()> {
    use sequoia_openpgp::cert::Cert;
    use sequoia_openpgp::parse::Parse;

    let cert = Cert::from_bytes(contents).context("parsing OpenPGP key")?;
    if cert.is_tsk() {
        return Err(KeyInvalid("this is a SECRET KEY, not a public key".into()).into());
    }
    Ok(())
}

fn looks_like_pgp_key_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".asc") && (lower.contains("key") || lower.contains("-signing-"))
}

/// Resolve the OpenPGP public key / keyring, same priority order as
/// minisign. PGP auto-detection is intentionally narrower than a naive
/// `contains("pub")`/`contains("release")` heuristic (spec §9 open
/// question (a)) — it requires `key` or `-signing-` in the filename to
/// cut down on false positives.
pub async fn resolve_pgp_key(
    client: &reqwest::Client,
    release: &Release,
    flags: &KeyFlags,
) -> Result<Vec<u8>> {
    if let Some(path) = &flags.pgp_key_file {
        let contents = std::fs::read(path)
            .with_context(|| format!("reading PGP key file {}", path.display()))?;
        validate_pgp_pubkey(&contents)?;
        return Ok(contents);
    }

    if let Some(url) = &flags.pgp_key_url {
        return fetch_bytes(client, url).await;
    }

    if let Some(name) = &flags.pgp_key_asset {
        let asset = release
            .get_asset(name)
            .ok_or_else(|| KeyInvalid(format!("release has no asset named {name}")))?;
        return fetch_bytes(client, &asset.download_url).await;
    }

    if let Some(asset) = release.assets.iter().find(|a| looks_like_pgp_key_name(&a.name)) {
        return fetch_bytes(client, &asset.download_url).await;
    }

    Err(KeyInvalid(
        "no PGP public key configured — pass --pgp-key-file, --pgp-key-url, or --pgp-key-asset".into(),
    )
    .into())
}

#[cfg(test)]
#[path = "../../tests/verify/keys.rs"]
mod tests;
