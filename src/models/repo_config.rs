use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgo {
    Sha256,
    Sha512,
}

impl HashAlgo {
    pub fn digest_len_hex(self) -> usize {
        match self {
            HashAlgo::Sha256 => 64,
            HashAlgo::Sha512 => 128,
        }
    }
}

impl std::fmt::Display for HashAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgo::Sha256 => write!(f, "sha256"),
            HashAlgo::Sha512 => write!(f, "sha512"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SignatureFormat {
    Minisign,
    Pgp,
    Ed25519,
}

/// Recognized options governing asset discovery for one repository
/// (spec §3 `RepoConfig`). Lists are ordered — earlier entries win ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    pub binary_name: String,
    pub hash_algo: HashAlgo,
    pub archive_extensions: Vec<String>,
    pub asset_patterns: Vec<String>,
    pub checksum_candidates: Vec<String>,
    pub checksum_sig_candidates: Vec<String>,
    pub signature_candidates: Vec<String>,
    pub signature_formats: HashMap<String, SignatureFormat>,
    pub prefer_checksum_sig: bool,
}

impl RepoConfig {
    /// Build the default config for `owner/repo`, using the last path
    /// segment as the expected binary name unless overridden.
    pub fn defaults(owner_repo: &str) -> Self {
        let binary_name = owner_repo
            .rsplit('/')
            .next()
            .unwrap_or(owner_repo)
            .to_string();

        let mut signature_formats = HashMap::new();
        signature_formats.insert(".minisig".to_string(), SignatureFormat::Minisign);
        signature_formats.insert(".asc".to_string(), SignatureFormat::Pgp);
        signature_formats.insert(".gpg".to_string(), SignatureFormat::Pgp);
        signature_formats.insert(".sig.asc".to_string(), SignatureFormat::Pgp);
        signature_formats.insert(".sig".to_string(), SignatureFormat::Ed25519);
        signature_formats.insert(".sig.ed25519".to_string(), SignatureFormat::Ed25519);

        Self {
            binary_name,
            hash_algo: HashAlgo::Sha256,
            archive_extensions: vec![
                ".tar.gz".into(),
                ".tgz".into(),
                ".tar.xz".into(),
                ".txz".into(),
                ".tar.bz2".into(),
                ".tbz2".into(),
                ".tar".into(),
                ".zip".into(),
            ],
            asset_patterns: Vec::new(),
            checksum_candidates: vec![
                "{{asset}}.sha256".into(),
                "{{asset}}.sha512".into(),
                "SHA256SUMS".into(),
                "SHA2-256SUMS".into(),
                "SHA512SUMS".into(),
                "SHA2-512SUMS".into(),
                "checksums.txt".into(),
            ],
            checksum_sig_candidates: vec![
                "SHA256SUMS.minisig".into(),
                "SHA2-256SUMS.minisig".into(),
                "SHA512SUMS.minisig".into(),
                "SHA2-512SUMS.minisig".into(),
                "SHA256SUMS.asc".into(),
                "SHA2-256SUMS.asc".into(),
                "SHA512SUMS.asc".into(),
                "SHA2-512SUMS.asc".into(),
                "checksums.txt.minisig".into(),
                "checksums.txt.asc".into(),
            ],
            signature_candidates: vec![
                "{{asset}}.minisig".into(),
                "{{asset}}.sig".into(),
                "{{asset}}.sig.ed25519".into(),
                "{{asset}}.asc".into(),
            ],
            signature_formats,
            prefer_checksum_sig: true,
        }
    }

    pub fn signature_format_for(&self, filename: &str) -> Option<SignatureFormat> {
        let lower = filename.to_lowercase();
        // Longest-suffix match first so `.sig.asc` beats `.asc`/`.sig`.
        let mut candidates: Vec<&String> = self.signature_formats.keys().collect();
        candidates.sort_by_key(|s| std::cmp::Reverse(s.len()));
        for suffix in candidates {
            if lower.ends_with(suffix.as_str()) {
                return self.signature_formats.get(suffix).copied();
            }
        }
        None
    }

    pub fn apply_overrides(&mut self, overrides: &RepoConfigOverrides) {
        if let Some(name) = &overrides.binary_name {
            self.binary_name = name.clone();
        }
        if let Some(algo) = overrides.hash_algo {
            self.hash_algo = algo;
        }
        if let Some(prefer) = overrides.prefer_checksum_sig {
            self.prefer_checksum_sig = prefer;
        }
    }
}

/// Tristate overrides layered over [`RepoConfig::defaults`]. `None` means
/// "unset, inherit the default"; `Some(_)` — including `Some(false)` — is
/// an explicit override. Plain `bool` fields cannot represent this
/// distinction, which is why these are all `Option`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfigOverrides {
    pub binary_name: Option<String>,
    pub hash_algo: Option<HashAlgo>,
    pub prefer_checksum_sig: Option<bool>,
}

#[cfg(test)]
#[path = "../../tests/models/repo_config.rs"]
mod tests;
