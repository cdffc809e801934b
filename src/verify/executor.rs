use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::Cache;
use crate::discovery::classifier::{classify, AssetKind};
use crate::discovery::supplemental::{
    locate_asset_signature, locate_checksum_manifest, locate_checksum_sig,
};
use crate::errors::{ChecksumMismatch, PolicyViolation, SignatureMissing};
use crate::extract;
use crate::models::repo_config::{HashAlgo, SignatureFormat};
use crate::models::{Asset, Release, RepoConfig};
use crate::platform::Platform;
use crate::ui;
use crate::utils::fs_move::move_file_or_dir;
use crate::verify::assessor::{VerificationAssessment, Workflow};
use crate::verify::checksum::{digest_hex, extract_digest};
use crate::verify::keys::{resolve_minisign_key, resolve_pgp_key, KeyFlags};
use crate::verify::signature::{verify_ed25519_raw, verify_minisign, verify_pgp};

/// Executor states (spec §4.6). `state` only ever advances forward; there
/// is no transition back to an earlier state short of a fresh [`execute`]
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    AssetDownloaded,
    SupplementsDownloaded,
    SignatureVerified,
    DigestVerified,
    Cached,
    Installed,
    Failed,
}

pub struct ExecuteFlags {
    pub destination: PathBuf,
    pub cache_dir: PathBuf,
    pub require_minisign: bool,
    pub allow_packages: bool,
    pub raw_ed25519_key_hex: Option<String>,
}

pub struct ExecutionOutcome {
    pub state: State,
    pub installed_path: PathBuf,
    pub digest: Option<String>,
}

fn temp_dir(label: &str) -> Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("sfetch-{label}-{nanos}"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir)
}

async fn download(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("downloading {url}"))?;
    resp.error_for_status_ref()
        .with_context(|| format!("download from {url} failed"))?;
    Ok(resp
        .bytes()
        .await
        .context("reading download body")?
        .to_vec())
}

/// Like [`download`], but drives an `indicatif` progress bar from the
/// response's content-length and streamed chunks (spec.md §9 ambient UI
/// note). Used only for the primary asset — supplemental files (manifest,
/// signature, key) are small enough not to warrant one.
async fn download_with_progress(client: &reqwest::Client, url: &str, label: &str) -> Result<Vec<u8>> {
    use futures_util::StreamExt;

    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("downloading {url}"))?;
    resp.error_for_status_ref()
        .with_context(|| format!("download from {url} failed"))?;

    let total = resp.content_length().unwrap_or(0);
    let pb = ui::download_progress_bar(label);
    pb.set_length(total);

    let mut bytes = Vec::with_capacity(total as usize);
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("reading download body")?;
        bytes.extend_from_slice(&chunk);
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();
    Ok(bytes)
}

/// Run the full fetch/verify/install pipeline for a previously assessed
/// asset. `assessment` must have been produced by [`crate::verify::assessor::assess`]
/// against the same `release`/`selected`/`cfg`/`platform`.
pub async fn execute(
    client: &reqwest::Client,
    release: &Release,
    selected: &Asset,
    cfg: &RepoConfig,
    platform: &Platform,
    assessment: &VerificationAssessment,
    key_flags: &KeyFlags,
    flags: &ExecuteFlags,
) -> Result<ExecutionOutcome> {
    let mut state = State::Idle;
    ui::info(&format!("state: {state:?}"));

    let classification = classify(&selected.name);
    if classification.kind == AssetKind::Package && !flags.allow_packages {
        state = State::Failed;
        ui::info(&format!("state: {state:?}"));
        return Err(PolicyViolation(format!(
            "{} is a package format; pass --allow-packages to install it",
            selected.name
        ))
        .into());
    }

    // Idle -> AssetDownloaded
    let asset_bytes = download_with_progress(client, &selected.download_url, &selected.name)
        .await
        .map_err(|e| {
            state = State::Failed;
            ui::info(&format!("state: {state:?}"));
            e
        })?;
    state = State::AssetDownloaded;
    ui::info(&format!("state: {state:?}"));

    // AssetDownloaded -> SupplementsDownloaded
    let checksum_sig_located = locate_checksum_sig(release, selected, cfg, platform);
    let asset_sig_located = locate_asset_signature(release, selected, cfg, platform);
    let manifest_asset = locate_checksum_manifest(release, selected, cfg, platform);

    let manifest_bytes = match manifest_asset {
        Some(a) => Some(download(client, &a.download_url).await?),
        None => None,
    };
    let checksum_sig_bytes = match &checksum_sig_located {
        Some(l) => Some(download(client, &l.asset.download_url).await?),
        None => None,
    };
    let asset_sig_bytes = match &asset_sig_located {
        Some(l) => Some(download(client, &l.asset.download_url).await?),
        None => None,
    };
    state = State::SupplementsDownloaded;
    ui::info(&format!("state: {state:?}"));

    // SupplementsDownloaded -> SignatureVerified
    let signature_format_used = match assessment.workflow {
        Workflow::A => {
            let located = checksum_sig_located.as_ref().ok_or_else(|| {
                SignatureMissing("Workflow A selected but no checksum-manifest signature was located".into())
            })?;
            enforce_minisign_policy(flags, located.format)?;
            let manifest = manifest_bytes.as_ref().ok_or_else(|| {
                crate::errors::ChecksumMissing(
                    "Workflow A selected but no checksum manifest was located".into(),
                )
            })?;
            let sig_text_or_bytes = checksum_sig_bytes.as_ref().unwrap();
            verify_signature_bytes(
                located.format,
                client,
                release,
                key_flags,
                flags,
                manifest,
                sig_text_or_bytes,
            )
            .await?;
            Some(located.format)
        }
        Workflow::B => {
            let located = asset_sig_located.as_ref().ok_or_else(|| {
                SignatureMissing("Workflow B selected but no asset signature was located".into())
            })?;
            enforce_minisign_policy(flags, located.format)?;
            let sig_bytes = asset_sig_bytes.as_ref().unwrap();
            verify_signature_bytes(
                located.format,
                client,
                release,
                key_flags,
                flags,
                &asset_bytes,
                sig_bytes,
            )
            .await?;
            Some(located.format)
        }
        Workflow::C | Workflow::None => {
            if flags.require_minisign {
                state = State::Failed;
                ui::info(&format!("state: {state:?}"));
                bail!(PolicyViolation(
                    "--require-minisign is set but no minisign signature is available for this asset".into()
                ));
            }
            None
        }
        Workflow::Insecure => None,
    };
    state = State::SignatureVerified;
    ui::info(&format!("state: {state:?}"));

    // SignatureVerified -> DigestVerified
    let computed_digest_hex_sha256 = digest_hex(&asset_bytes, HashAlgo::Sha256);
    let digest = if matches!(assessment.workflow, Workflow::Insecure) {
        None
    } else if let Some(manifest) = &manifest_bytes {
        let algo = assessment.checksum.algorithm;
        let expected =
            extract_digest(manifest, algo, &selected.name).context("locating expected digest")?;
        let actual = digest_hex(&asset_bytes, algo);
        if expected.to_lowercase() != actual.to_lowercase() {
            state = State::Failed;
            ui::info(&format!("state: {state:?}"));
            return Err(ChecksumMismatch(format!(
                "digest mismatch for {}: expected {expected}, computed {actual}",
                selected.name
            ))
            .into());
        }
        Some(actual)
    } else {
        // Workflow B with no manifest: the signature over the asset
        // bytes is the only authenticity evidence; no digest to check.
        None
    };
    state = State::DigestVerified;
    ui::info(&format!("state: {state:?}"));
    let _ = signature_format_used;

    // DigestVerified -> Cached
    let stage = temp_dir("asset")?;
    let staged_asset = stage.join(&selected.name);
    std::fs::write(&staged_asset, &asset_bytes)
        .with_context(|| format!("writing {}", staged_asset.display()))?;
    let cache = Cache::new(flags.cache_dir.clone());
    let cached_path = cache.store(&staged_asset, &selected.name)?;
    state = State::Cached;
    ui::info(&format!("state: {state:?}"));

    // Cached -> Installed
    let installed_path = install(&cached_path, &classification, platform, &flags.destination)?;
    state = State::Installed;
    ui::info(&format!("state: {state:?}"));

    Ok(ExecutionOutcome {
        state,
        installed_path,
        digest: digest.or(Some(computed_digest_hex_sha256)),
    })
}

fn enforce_minisign_policy(flags: &ExecuteFlags, format: SignatureFormat) -> Result<()> {
    if flags.require_minisign && format != SignatureFormat::Minisign {
        return Err(PolicyViolation(format!(
            "--require-minisign is set but the located signature uses {format:?}"
        ))
        .into());
    }
    Ok(())
}

async fn verify_signature_bytes(
    format: SignatureFormat,
    client: &reqwest::Client,
    release: &Release,
    key_flags: &KeyFlags,
    flags: &ExecuteFlags,
    data: &[u8],
    sig_bytes: &[u8],
) -> Result<()> {
    match format {
        SignatureFormat::Minisign => {
            let pubkey = resolve_minisign_key(client, release, key_flags).await?;
            let sig_text = String::from_utf8_lossy(sig_bytes);
            verify_minisign(&pubkey, data, &sig_text)
        }
        SignatureFormat::Pgp => {
            let pubkey = resolve_pgp_key(client, release, key_flags).await?;
            verify_pgp(&pubkey, data, sig_bytes)
        }
        SignatureFormat::Ed25519 => {
            let pubkey_hex = flags
                .raw_ed25519_key_hex
                .as_deref()
                .context("a .sig file was selected but no --ed25519-key was supplied")?;
            verify_ed25519_raw(pubkey_hex, data, sig_bytes)
        }
    }
}

fn install(
    cached_path: &Path,
    classification: &crate::discovery::classifier::AssetClassification,
    _platform: &Platform,
    destination: &Path,
) -> Result<PathBuf> {
    use crate::discovery::classifier::AssetKind;

    if classification.kind == AssetKind::Archive {
        let format = classification
            .archive_format
            .context("archive asset classified with no archive format")?;
        let extract_root = temp_dir("extract")?;
        extract::extract(cached_path, &extract_root, format)?;
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if destination.exists() {
            if destination.is_dir() {
                std::fs::remove_dir_all(destination)?;
            } else {
                std::fs::remove_file(destination)?;
            }
        }
        move_file_or_dir(&extract_root, destination)?;
        Ok(destination.to_path_buf())
    } else {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let staged = cached_path.to_path_buf();
        if destination.exists() {
            std::fs::remove_file(destination)?;
        }
        std::fs::copy(&staged, destination).with_context(|| {
            format!("copying {} to {}", staged.display(), destination.display())
        })?;

        #[cfg(unix)]
        if classification.needs_chmod {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(destination)?.permissions();
            perms.set_mode(perms.mode() | 0o100);
            std::fs::set_permissions(destination, perms)?;
        }

        Ok(destination.to_path_buf())
    }
}

#[cfg(test)]
#[path = "../../tests/verify/executor.rs"]
mod tests;
