const PACKAGE_EXTENSIONS: &[&str] = &[".deb", ".rpm", ".pkg", ".msi"];
const SCRIPT_EXTENSIONS: &[&str] = &[
    ".sh", ".bash", ".zsh", ".py", ".rb", ".pl", ".ps1", ".bat", ".cmd",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    TarXz,
    TarBz2,
    Tar,
    Zip,
}

impl ArchiveFormat {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            ".tar.gz" | ".tgz" => Some(Self::TarGz),
            ".tar.xz" | ".txz" => Some(Self::TarXz),
            ".tar.bz2" | ".tbz2" => Some(Self::TarBz2),
            ".tar" => Some(Self::Tar),
            ".zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Archive,
    Raw,
    Package,
}

/// Tag attached to the selected asset. Invariant (enforced by the private
/// constructors below, not by convention): `archive_format.is_some()` iff
/// `kind == AssetKind::Archive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetClassification {
    pub kind: AssetKind,
    pub archive_format: Option<ArchiveFormat>,
    pub needs_chmod: bool,
}

impl AssetClassification {
    fn archive(format: ArchiveFormat) -> Self {
        Self {
            kind: AssetKind::Archive,
            archive_format: Some(format),
            needs_chmod: false,
        }
    }

    fn raw(needs_chmod: bool) -> Self {
        Self {
            kind: AssetKind::Raw,
            archive_format: None,
            needs_chmod,
        }
    }

    fn package() -> Self {
        Self {
            kind: AssetKind::Package,
            archive_format: None,
            needs_chmod: false,
        }
    }
}

/// Classify a filename into [`AssetClassification`] (spec §4.1). Pure
/// function of the filename alone — see the classification-stability
/// invariant in spec §8: no config field other than an explicit
/// `--asset-type`/`assetType` override may change the result (applied
/// separately via [`apply_explicit_override`], never folded in here).
pub fn classify(filename: &str) -> AssetClassification {
    let lower = filename.to_lowercase();

    if let Some(format) = longest_archive_suffix(&lower) {
        return AssetClassification::archive(format);
    }

    if PACKAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return AssetClassification::package();
    }

    if SCRIPT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return AssetClassification::raw(true);
    }

    if !lower.contains('.') {
        return AssetClassification::raw(true);
    }

    AssetClassification::raw(false)
}

fn longest_archive_suffix(lower: &str) -> Option<ArchiveFormat> {
    const ARCHIVE_SUFFIXES: &[&str] = &[
        ".tar.gz", ".tgz", ".tar.xz", ".txz", ".tar.bz2", ".tbz2", ".tar", ".zip",
    ];
    // `.tar.gz` must be tried before `.tar` et al so the longer suffix wins.
    let mut suffixes: Vec<&&str> = ARCHIVE_SUFFIXES.iter().collect();
    suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));
    suffixes
        .into_iter()
        .find(|ext| lower.ends_with(*ext))
        .and_then(|ext| ArchiveFormat::from_suffix(ext))
}

/// Apply an explicit `--asset-type`/`assetType` override. This is the
/// *only* legitimate way to change a filename-derived classification — a
/// legacy `archiveType` config field must never reach this path (spec
/// §4.1's install-script regression).
pub fn apply_explicit_override(
    classification: AssetClassification,
    override_kind: Option<AssetKind>,
) -> AssetClassification {
    match override_kind {
        Some(AssetKind::Archive) => classification,
        Some(kind) => AssetClassification {
            kind,
            archive_format: None,
            needs_chmod: classification.needs_chmod,
        },
        None => classification,
    }
}

#[cfg(test)]
#[path = "../../tests/discovery/classifier.rs"]
mod tests;
