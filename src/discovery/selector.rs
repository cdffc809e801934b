use regex::Regex;

use crate::discovery::classifier::{classify, AssetKind};
use crate::discovery::inference::{narrow, strip_supplemental};
use crate::discovery::template::render_asset_pattern;
use crate::models::{Asset, RepoConfig};
use crate::platform::Platform;

#[derive(Debug, Clone, Default)]
pub struct SelectFlags {
    pub asset_match: Option<String>,
    pub asset_regex: Option<String>,
}

#[derive(Debug)]
pub enum SelectError {
    NoCandidates,
    Tie(Vec<String>),
    BadRegex(String),
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::NoCandidates => write!(f, "no asset matches this platform"),
            SelectError::Tie(names) => {
                write!(f, "multiple assets tie for selection: {}", names.join(", "))
            }
            SelectError::BadRegex(msg) => write!(f, "invalid asset pattern: {msg}"),
        }
    }
}
impl std::error::Error for SelectError {}

/// Select the single asset to install for `platform` (spec §4.3). Pure
/// function of its inputs: for a fixed asset list, platform and config it
/// always returns the same asset, or the same tie/empty error.
pub fn select_asset<'a>(
    assets: &'a [Asset],
    cfg: &RepoConfig,
    platform: &Platform,
    flags: &SelectFlags,
) -> Result<&'a Asset, SelectError> {
    let all_refs: Vec<&Asset> = assets.iter().collect();
    let non_supplemental = strip_supplemental(&all_refs);
    // Platform exclusions (spec §4.2 step 1) are a baseline narrowing that
    // applies regardless of which selection strategy below ends up
    // choosing among what's left — an asset that's unmistakably for a
    // different platform (e.g. a `.exe` on linux) is never a candidate.
    let foreign = platform.foreign_os_suffixes();
    let non_supplemental: Vec<&Asset> = non_supplemental
        .into_iter()
        .filter(|a| {
            let lower = a.name.to_lowercase();
            !foreign.iter().any(|suf| lower.ends_with(suf))
        })
        .collect();

    if let Some(re_str) = &flags.asset_regex {
        let re = Regex::new(re_str).map_err(|e| SelectError::BadRegex(e.to_string()))?;
        let matched: Vec<&Asset> = non_supplemental
            .iter()
            .copied()
            .filter(|a| re.is_match(&a.name))
            .collect();
        return finalize(narrow(&matched, platform, &cfg.archive_extensions));
    }

    if let Some(pat) = &flags.asset_match {
        let matched = match_glob_or_substring(&non_supplemental, pat);
        return finalize(narrow(&matched, platform, &cfg.archive_extensions));
    }

    for template in &cfg.asset_patterns {
        let pattern = render_asset_pattern(template, platform, &cfg.binary_name);
        let re = Regex::new(&pattern).map_err(|e| SelectError::BadRegex(e.to_string()))?;
        let matched: Vec<&Asset> = non_supplemental
            .iter()
            .copied()
            .filter(|a| re.is_match(&a.name))
            .collect();
        if matched.len() == 1 {
            return Ok(matched[0]);
        }
    }

    heuristic_select(&non_supplemental, platform, cfg)
}

fn finalize<'a>(mut candidates: Vec<&'a Asset>) -> Result<&'a Asset, SelectError> {
    match candidates.len() {
        0 => Err(SelectError::NoCandidates),
        1 => Ok(candidates.remove(0)),
        _ => Err(SelectError::Tie(
            candidates.iter().map(|a| a.name.clone()).collect(),
        )),
    }
}

fn match_glob_or_substring<'a>(assets: &[&'a Asset], pattern: &str) -> Vec<&'a Asset> {
    let is_glob = pattern.contains('*') || pattern.contains('?') || pattern.contains('[');
    if is_glob {
        if let Ok(pat) = glob::Pattern::new(&pattern.to_lowercase()) {
            return assets
                .iter()
                .copied()
                .filter(|a| pat.matches(&a.name.to_lowercase()))
                .collect();
        }
    }
    let needle = pattern.to_lowercase();
    assets
        .iter()
        .copied()
        .filter(|a| a.name.to_lowercase().contains(&needle))
        .collect()
}

/// Heuristic scoring fallback (spec §4.3 step 4): each non-supplemental
/// asset receives points for platform/arch/binary-name/archive signal;
/// the top score wins and ties are fatal rather than arbitrary.
fn heuristic_select<'a>(
    assets: &[&'a Asset],
    platform: &Platform,
    cfg: &RepoConfig,
) -> Result<&'a Asset, SelectError> {
    if assets.is_empty() {
        return Err(SelectError::NoCandidates);
    }

    let mut scored: Vec<(i32, &Asset)> = assets
        .iter()
        .map(|a| (score_asset(a, platform, cfg), *a))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    let top = scored[0].0;
    let winners: Vec<&Asset> = scored
        .iter()
        .filter(|(s, _)| *s == top)
        .map(|(_, a)| *a)
        .collect();

    finalize(winners)
}

fn score_asset(asset: &Asset, platform: &Platform, cfg: &RepoConfig) -> i32 {
    let lower = asset.name.to_lowercase();
    let mut score = 0;

    score += token_score(&lower, &platform.goos, &platform.os_tokens());
    score += token_score(&lower, &platform.goarch, &platform.arch_tokens());

    if lower.contains(&cfg.binary_name.to_lowercase()) {
        score += 3;
    }

    if classify(&asset.name).kind == AssetKind::Archive {
        score += 2;
    }

    score
}

fn token_score(lower: &str, canonical: &str, tokens: &[String]) -> i32 {
    if lower.contains(&canonical.to_lowercase()) {
        return 5;
    }
    if tokens.iter().skip(1).any(|t| !t.is_empty() && lower.contains(t)) {
        return 3;
    }
    0
}

#[cfg(test)]
#[path = "../../tests/discovery/selector.rs"]
mod tests;
