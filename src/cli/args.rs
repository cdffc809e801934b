use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::discovery::classifier::AssetKind;
use crate::models::repo_config::HashAlgo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssetTypeArg {
    Archive,
    Raw,
    Package,
}

impl From<AssetTypeArg> for AssetKind {
    fn from(value: AssetTypeArg) -> Self {
        match value {
            AssetTypeArg::Archive => AssetKind::Archive,
            AssetTypeArg::Raw => AssetKind::Raw,
            AssetTypeArg::Package => AssetKind::Package,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashAlgoArg {
    Sha256,
    Sha512,
}

impl From<HashAlgoArg> for HashAlgo {
    fn from(value: HashAlgoArg) -> Self {
        match value {
            HashAlgoArg::Sha256 => HashAlgo::Sha256,
            HashAlgoArg::Sha512 => HashAlgo::Sha512,
        }
    }
}

/// Download a GitHub release asset, verify it against a minisign/PGP
/// signature and/or a SHA-256/SHA-512 checksum manifest, and install it.
#[derive(Debug, Parser)]
#[command(name = "sfetch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// `owner/repo` on GitHub.
    #[arg(long)]
    pub repo: Option<String>,

    /// Install this exact release tag.
    #[arg(long, conflicts_with = "latest")]
    pub tag: Option<String>,

    /// Install the latest release.
    #[arg(long)]
    pub latest: bool,

    /// Select the asset whose name contains (or glob-matches) this pattern.
    #[arg(long)]
    pub asset_match: Option<String>,

    /// Select the asset whose name matches this regular expression.
    #[arg(long)]
    pub asset_regex: Option<String>,

    /// Override the asset-type classification derived from the filename.
    #[arg(long, value_enum)]
    pub asset_type: Option<AssetTypeArg>,

    /// Expected executable name inside an archive asset.
    #[arg(long)]
    pub binary_name: Option<String>,

    /// Default digest algorithm when a manifest's algorithm can't be inferred.
    #[arg(long, value_enum)]
    pub hash_algo: Option<HashAlgoArg>,

    /// Directory the final binary/archive contents are installed into.
    #[arg(long)]
    pub dest_dir: Option<PathBuf>,

    /// Exact path of the installed file (overrides `--dest-dir`/binary name).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Content-addressed cache root (defaults to `$XDG_CACHE_HOME/sfetch`).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Target OS to select assets for (defaults to the host).
    #[arg(long)]
    pub target_os: Option<String>,

    /// Target architecture to select assets for (defaults to the host).
    #[arg(long)]
    pub target_arch: Option<String>,

    /// Path to a minisign public key file.
    #[arg(long)]
    pub minisign_key: Option<PathBuf>,

    /// URL to fetch a minisign public key from.
    #[arg(long)]
    pub minisign_key_url: Option<String>,

    /// Name of a release asset that is the minisign public key.
    #[arg(long)]
    pub minisign_key_asset: Option<String>,

    /// Path to an OpenPGP public key/keyring file.
    #[arg(long)]
    pub pgp_key_file: Option<PathBuf>,

    /// URL to fetch an OpenPGP public key/keyring from.
    #[arg(long)]
    pub pgp_key_url: Option<String>,

    /// Name of a release asset that is the OpenPGP public key/keyring.
    #[arg(long)]
    pub pgp_key_asset: Option<String>,

    /// 64-character hex raw Ed25519 public key, for bare `.sig` signatures.
    #[arg(long)]
    pub key: Option<String>,

    /// Prefer a per-asset signature over a checksum-manifest signature.
    #[arg(long)]
    pub prefer_per_asset: bool,

    /// Fail unless the chosen signature format is minisign.
    #[arg(long, conflicts_with = "insecure")]
    pub require_minisign: bool,

    /// Skip signature verification even if one is available.
    #[arg(long)]
    pub skip_sig: bool,

    /// Skip checksum verification even if a manifest is available.
    #[arg(long)]
    pub skip_checksum: bool,

    /// Bypass all verification. Exit code stays 0; trust score is 0.
    #[arg(long)]
    pub insecure: bool,

    /// Fail if the computed trust score is below N.
    #[arg(long)]
    pub trust_minimum: Option<i32>,

    /// Install package-format assets (.deb/.rpm/.pkg/.msi) instead of refusing them.
    #[arg(long)]
    pub allow_packages: bool,

    /// Assess and report without downloading or installing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the provenance record to stdout after a successful install.
    #[arg(long)]
    pub provenance: bool,

    /// Write the provenance record to this path instead of stdout.
    #[arg(long)]
    pub provenance_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate shell completions for this binary.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Read or write the global `sfetch.toml` settings file.
    #[command(subcommand)]
    Config(ConfigAction),
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the resolved value of a global setting.
    Get {
        #[arg(value_enum)]
        key: ConfigKey,
    },
    /// Write a global setting to `sfetch.toml`, creating the file on first use.
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    GithubToken,
    NoProxy,
    CacheDir,
}
