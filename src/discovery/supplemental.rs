use crate::discovery::inference::archive_stripped_base;
use crate::discovery::template::{render_supplemental, SupplementalVars};
use crate::models::repo_config::{HashAlgo, SignatureFormat};
use crate::models::{Asset, RepoConfig, Release};
use crate::platform::Platform;

/// A located supplemental asset together with the signature/checksum
/// scheme its filename implies.
pub struct Located<'a> {
    pub asset: &'a Asset,
    pub format: SignatureFormat,
}

/// Render every candidate template in order and return the release asset
/// that matches the first one exactly (spec §4.4 — candidate order is
/// significant: `SHA256SUMS.minisig` must be probed before
/// `SHA256SUMS.asc` so minisign wins when both exist).
fn first_match<'a>(release: &'a Release, candidates: &[String], vars: &SupplementalVars) -> Option<&'a Asset> {
    for template in candidates {
        let rendered = render_supplemental(template, vars);
        if let Some(asset) = release.get_asset(&rendered) {
            return Some(asset);
        }
    }
    None
}

fn vars_for<'a>(
    release: &'a Release,
    selected: &'a Asset,
    cfg: &'a RepoConfig,
    platform: &'a Platform,
) -> SupplementalVars<'a> {
    SupplementalVars {
        asset: selected.name.clone(),
        base: archive_stripped_base(&selected.name, &cfg.archive_extensions),
        binary: cfg.binary_name.clone(),
        platform,
        version: release.tag.clone(),
        version_no_prefix: release.version_no_prefix().to_string(),
    }
}

/// Locate the checksum manifest's signature (enables Workflow A).
pub fn locate_checksum_sig<'a>(
    release: &'a Release,
    selected: &'a Asset,
    cfg: &RepoConfig,
    platform: &Platform,
) -> Option<Located<'a>> {
    let vars = vars_for(release, selected, cfg, platform);
    let asset = first_match(release, &cfg.checksum_sig_candidates, &vars)?;
    let format = infer_signature_format(&asset.name)
        .or_else(|| cfg.signature_format_for(&asset.name))?;
    Some(Located { asset, format })
}

/// Locate the checksum manifest itself (consolidated or per-asset).
pub fn locate_checksum_manifest<'a>(
    release: &'a Release,
    selected: &'a Asset,
    cfg: &RepoConfig,
    platform: &Platform,
) -> Option<&'a Asset> {
    let vars = vars_for(release, selected, cfg, platform);
    first_match(release, &cfg.checksum_candidates, &vars)
}

/// Locate a signature over the asset bytes directly (enables Workflow B).
pub fn locate_asset_signature<'a>(
    release: &'a Release,
    selected: &'a Asset,
    cfg: &RepoConfig,
    platform: &Platform,
) -> Option<Located<'a>> {
    let vars = vars_for(release, selected, cfg, platform);
    let asset = first_match(release, &cfg.signature_candidates, &vars)?;
    let format = infer_signature_format(&asset.name)
        .or_else(|| cfg.signature_format_for(&asset.name))?;
    Some(Located { asset, format })
}

/// Determine the verification scheme for a signature filename. The bare
/// `.sig` suffix is ambiguous (spec §4.4/§9): if the filename mentions
/// `sums.sig`/`checksums.sig` it is treated as an OpenPGP detached
/// signature over a manifest (common convention); otherwise as a raw
/// Ed25519 signature. We deliberately do not sniff file contents to
/// disambiguate — that would open a parser-confusion attack surface.
pub fn infer_signature_format(filename: &str) -> Option<SignatureFormat> {
    let lower = filename.to_lowercase();

    if lower.ends_with(".minisig") {
        return Some(SignatureFormat::Minisign);
    }
    if lower.ends_with(".sig.ed25519") {
        return Some(SignatureFormat::Ed25519);
    }
    if lower.ends_with(".sig.asc") || lower.ends_with(".asc") || lower.ends_with(".gpg") {
        return Some(SignatureFormat::Pgp);
    }
    if lower.ends_with(".sig") {
        if lower.contains("sums.sig") || lower.contains("checksums.sig") {
            return Some(SignatureFormat::Pgp);
        }
        return Some(SignatureFormat::Ed25519);
    }
    None
}

/// Infer the checksum digest algorithm from a manifest's filename,
/// falling back to the repo's configured default (spec §4.5).
pub fn infer_checksum_algo(filename: &str, default: HashAlgo) -> HashAlgo {
    let lower = filename.to_lowercase();
    const SHA256_MARKERS: &[&str] = &["sha256sums", "sha2-256sums", ".sha256.txt", ".sha256"];
    const SHA512_MARKERS: &[&str] = &["sha512sums", "sha2-512sums", ".sha512.txt", ".sha512"];

    if SHA256_MARKERS.iter().any(|m| lower.contains(m)) {
        return HashAlgo::Sha256;
    }
    if SHA512_MARKERS.iter().any(|m| lower.contains(m)) {
        return HashAlgo::Sha512;
    }
    default
}

/// Whether a checksum manifest is a consolidated, multi-asset file or a
/// per-asset sidecar — inferred from its name relative to the asset it
/// covers.
pub fn is_per_asset_manifest(manifest_name: &str, asset_name: &str) -> bool {
    manifest_name.to_lowercase().starts_with(&asset_name.to_lowercase())
}

#[cfg(test)]
#[path = "../../tests/discovery/supplemental.rs"]
mod tests;
