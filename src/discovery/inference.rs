use crate::discovery::classifier::{classify, AssetKind};
use crate::models::Asset;
use crate::platform::Platform;

/// Checksum/signature keywords that mark an asset as supplemental. Only
/// these specific suffixes and substrings count — the bare substring
/// `sig` must NOT disqualify legitimately named tools like `minisign` or
/// `cosign` (spec §4.2, regression covered in spec §8 scenario 9).
const SUPPLEMENTAL_SUFFIXES: &[&str] = &[".asc", ".sig", ".sig.ed25519", ".minisig", ".gpg"];
const SUPPLEMENTAL_KEYWORDS: &[&str] = &["sha256", "sha512", "checksum"];

pub fn is_supplemental(name: &str) -> bool {
    let lower = name.to_lowercase();
    if SUPPLEMENTAL_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return true;
    }
    SUPPLEMENTAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Strip assets that look supplemental before any selection logic runs.
pub fn strip_supplemental<'a>(assets: &[&'a Asset]) -> Vec<&'a Asset> {
    assets
        .iter()
        .copied()
        .filter(|a| !is_supplemental(&a.name))
        .collect()
}

/// Base name of an asset with a known archive suffix stripped, used to
/// pair a raw executable with its archived equivalent (spec §4.2 step 4).
pub fn archive_stripped_base(name: &str, archive_extensions: &[String]) -> String {
    let lower = name.to_lowercase();
    let mut best: Option<&str> = None;
    for ext in archive_extensions {
        if lower.ends_with(ext.as_str()) {
            match best {
                Some(b) if b.len() >= ext.len() => {}
                _ => best = Some(ext.as_str()),
            }
        }
    }
    match best {
        Some(ext) => name[..name.len() - ext.len()].to_string(),
        None => name.to_string(),
    }
}

/// Narrow a candidate set to (ideally) one asset, applying spec §4.2's
/// ordered tie-breaking rules. Supplemental assets must already be
/// stripped by the caller.
pub fn narrow<'a>(
    candidates: &[&'a Asset],
    platform: &Platform,
    archive_extensions: &[String],
) -> Vec<&'a Asset> {
    let mut set: Vec<&Asset> = candidates.to_vec();

    // 1. Platform exclusions.
    let foreign = platform.foreign_os_suffixes();
    set.retain(|a| {
        let lower = a.name.to_lowercase();
        !foreign.iter().any(|suf| lower.ends_with(suf))
    });

    // 2. Platform-token filter, falling back to the prior set if empty.
    let os_tokens = platform.os_tokens();
    let filtered = filter_by_tokens(&set, &os_tokens);
    if !filtered.is_empty() {
        set = filtered;
    }

    // 3. Arch-token filter, same fallback rule.
    let arch_tokens = platform.arch_tokens();
    let filtered = filter_by_tokens(&set, &arch_tokens);
    if !filtered.is_empty() {
        set = filtered;
    }

    // 4. Raw-over-archive: when the same base name appears as both a bare
    // executable and an archive, prefer the raw form.
    set = prefer_raw_over_archive(set, archive_extensions);

    // 5. Format preference among surviving archive formats.
    set = prefer_archive_format(set, archive_extensions);

    set
}

fn filter_by_tokens<'a>(set: &[&'a Asset], tokens: &[String]) -> Vec<&'a Asset> {
    set.iter()
        .copied()
        .filter(|a| {
            let lower = a.name.to_lowercase();
            tokens.iter().any(|t| !t.is_empty() && contains_token(&lower, t))
        })
        .collect()
}

fn contains_token(haystack: &str, token: &str) -> bool {
    haystack.contains(token)
}

fn prefer_raw_over_archive<'a>(set: Vec<&'a Asset>, archive_extensions: &[String]) -> Vec<&'a Asset> {
    use std::collections::HashMap;

    let mut by_base: HashMap<String, Vec<&Asset>> = HashMap::new();
    for asset in &set {
        let base = archive_stripped_base(&asset.name, archive_extensions).to_lowercase();
        by_base.entry(base).or_default().push(asset);
    }

    let mut result = Vec::new();
    let mut consumed = std::collections::HashSet::new();

    for asset in &set {
        if consumed.contains(&asset.name) {
            continue;
        }
        let base = archive_stripped_base(&asset.name, archive_extensions).to_lowercase();
        let group = &by_base[&base];
        if group.len() > 1 {
            let raw = group
                .iter()
                .find(|a| classify(&a.name).kind == AssetKind::Raw);
            if let Some(raw) = raw {
                if !consumed.contains(&raw.name) {
                    result.push(*raw);
                    consumed.insert(raw.name.clone());
                }
                for a in group {
                    consumed.insert(a.name.clone());
                }
                continue;
            }
        }
        result.push(asset);
        consumed.insert(asset.name.clone());
    }

    result
}

fn prefer_archive_format<'a>(set: Vec<&'a Asset>, archive_extensions: &[String]) -> Vec<&'a Asset> {
    let archive_candidates: Vec<&Asset> = set
        .iter()
        .copied()
        .filter(|a| classify(&a.name).kind == AssetKind::Archive)
        .collect();

    if archive_candidates.len() <= 1 {
        return set;
    }

    // Multiple archive formats survived: pick the first in the configured
    // preference order and drop the rest; non-archive candidates pass
    // through untouched.
    let preferred = archive_extensions.iter().find_map(|ext| {
        archive_candidates
            .iter()
            .find(|a| a.name.to_lowercase().ends_with(ext.as_str()))
            .copied()
    });

    let Some(preferred) = preferred else {
        return set;
    };

    set.into_iter()
        .filter(|a| {
            classify(&a.name).kind != AssetKind::Archive || a.name == preferred.name
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/discovery/inference.rs"]
mod tests;
