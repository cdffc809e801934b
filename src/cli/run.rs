use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cache::Cache;
use crate::cli::args::{Cli, Command, ConfigAction, ConfigKey};
use crate::config::ConfigStorage;
use crate::discovery::classifier::apply_explicit_override;
use crate::discovery::selector::{select_asset, SelectFlags};
use crate::errors::{AssetAmbiguous, AssetNotFound, PolicyViolation};
use crate::models::repo_config::RepoConfig;
use crate::platform::Platform;
use crate::providers::github::GithubClient;
use crate::ui;
use crate::verify::assessor::{assess, AssessFlags};
use crate::verify::executor::{execute, ExecuteFlags};
use crate::verify::keys::KeyFlags;
use crate::verify::provenance::{build as build_provenance, ActiveFlags, ProvenanceInputs};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

impl Cli {
    pub async fn run(self) -> Result<()> {
        match &self.command {
            Some(Command::Completions { shell }) => return print_completions(*shell),
            Some(Command::Config(action)) => return run_config_action(action),
            None => {}
        }

        let repo = self.repo.clone().context("--repo owner/repo is required")?;

        let storage = ConfigStorage::new(ConfigStorage::default_path()).unwrap_or_else(|_| {
            ConfigStorage::new(PathBuf::from("sfetch.toml")).expect("in-memory default config")
        });

        let mut client_builder = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("sfetch/", env!("CARGO_PKG_VERSION")));
        if storage.config().no_proxy == Some(true) {
            client_builder = client_builder.no_proxy();
        }
        let client = client_builder.build().context("building HTTP client")?;

        let github = GithubClient::new(client.clone(), storage.config().github_token.clone());
        let release = github.fetch_release(&repo, self.tag.as_deref()).await?;

        let mut cfg = RepoConfig::defaults(&repo);
        cfg.apply_overrides(&storage.overrides_for(&repo));
        if let Some(local) = crate::config::load_local_overrides(&std::env::current_dir()?)? {
            cfg.apply_overrides(&local);
        }
        if let Some(name) = &self.binary_name {
            cfg.binary_name = name.clone();
        }
        if let Some(algo) = self.hash_algo {
            cfg.hash_algo = algo.into();
        }

        let platform = Platform::new(
            self.target_os.clone().unwrap_or_else(|| Platform::host().goos),
            self.target_arch.clone().unwrap_or_else(|| Platform::host().goarch),
        );

        let select_flags = SelectFlags {
            asset_match: self.asset_match.clone(),
            asset_regex: self.asset_regex.clone(),
        };
        let selected = select_asset(&release.assets, &cfg, &platform, &select_flags).map_err(|e| {
            use crate::discovery::selector::SelectError;
            match e {
                SelectError::NoCandidates => AssetNotFound(format!(
                    "no asset matches {}/{} for this platform",
                    platform.goos, platform.goarch
                ))
                .into(),
                SelectError::Tie(names) => {
                    AssetAmbiguous(format!("multiple assets tie for selection: {}", names.join(", "))).into()
                }
                SelectError::BadRegex(msg) => anyhow::anyhow!("invalid asset pattern: {msg}"),
            }
        })?;
        let classification = apply_explicit_override(
            crate::discovery::classify(&selected.name),
            self.asset_type.map(Into::into),
        );
        if classification.kind == crate::discovery::classifier::AssetKind::Package && !self.allow_packages {
            bail!(PolicyViolation(format!(
                "{} is a package format; pass --allow-packages to install it",
                selected.name
            )));
        }

        let assess_flags = AssessFlags {
            skip_sig: self.skip_sig,
            skip_checksum: self.skip_checksum,
            insecure: self.insecure,
            prefer_per_asset: self.prefer_per_asset,
        };
        let assessment = assess(&release, selected, &cfg, &platform, &assess_flags);

        if let Some(minimum) = self.trust_minimum {
            if assessment.trust.score < minimum {
                print_factor_breakdown(&assessment);
                bail!(PolicyViolation(format!(
                    "trust score {} is below --trust-minimum {minimum}",
                    assessment.trust.score
                )));
            }
        }

        let active_flags = ActiveFlags {
            insecure: self.insecure,
            skip_sig: self.skip_sig,
            skip_checksum: self.skip_checksum,
            require_minisign: self.require_minisign,
            prefer_per_asset: self.prefer_per_asset,
            trust_minimum: self.trust_minimum,
        };

        if self.dry_run {
            let record = build_provenance(ProvenanceInputs {
                repository: &repo,
                release: &release,
                selected,
                assessment: &assessment,
                outcome: None,
                flags: active_flags,
                timestamp: chrono::Utc::now().to_rfc3339(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            });
            print_warnings(&assessment);
            emit_provenance(&record, self.provenance_file.as_deref())?;
            return Ok(());
        }

        let dest_dir = self
            .dest_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
        let destination = self
            .output
            .clone()
            .unwrap_or_else(|| dest_dir.join(&cfg.binary_name));

        let cache_dir = self
            .cache_dir
            .clone()
            .or_else(|| storage.config().cache_dir.clone())
            .unwrap_or_else(Cache::default_root);

        let key_flags = KeyFlags {
            minisign_key: self.minisign_key.clone(),
            minisign_key_url: self.minisign_key_url.clone(),
            minisign_key_asset: self.minisign_key_asset.clone(),
            pgp_key_file: self.pgp_key_file.clone(),
            pgp_key_url: self.pgp_key_url.clone(),
            pgp_key_asset: self.pgp_key_asset.clone(),
        };

        // A locally-supplied key file is ours to check before we touch the
        // network at all — a secret key passed by mistake must fail here,
        // not after downloading the asset (spec §8 scenario 7).
        if let Some(path) = &key_flags.minisign_key {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading minisign key file {}", path.display()))?;
            crate::verify::keys::validate_minisign_pubkey(&contents)?;
        }
        if let Some(path) = &key_flags.pgp_key_file {
            let contents = std::fs::read(path)
                .with_context(|| format!("reading PGP key file {}", path.display()))?;
            crate::verify::keys::validate_pgp_pubkey(&contents)?;
        }
        let execute_flags = ExecuteFlags {
            destination: destination.clone(),
            cache_dir,
            require_minisign: self.require_minisign,
            allow_packages: self.allow_packages,
            raw_ed25519_key_hex: self.key.clone(),
        };

        print_warnings(&assessment);
        let outcome = execute(
            &client,
            &release,
            selected,
            &cfg,
            &platform,
            &assessment,
            &key_flags,
            &execute_flags,
        )
        .await?;

        println!("Release: {}", release.tag);
        println!("Installed {} to {}", selected.name, outcome.installed_path.display());
        ui::info(&format!("final state: {:?}", outcome.state));

        if self.provenance || self.provenance_file.is_some() {
            let record = build_provenance(ProvenanceInputs {
                repository: &repo,
                release: &release,
                selected,
                assessment: &assessment,
                outcome: Some(&outcome),
                flags: active_flags,
                timestamp: chrono::Utc::now().to_rfc3339(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            });
            emit_provenance(&record, self.provenance_file.as_deref())?;
        }

        Ok(())
    }
}

fn print_warnings(assessment: &crate::verify::assessor::VerificationAssessment) {
    for warning in &assessment.warnings {
        ui::warn(warning);
    }
}

fn print_factor_breakdown(assessment: &crate::verify::assessor::VerificationAssessment) {
    let t = &assessment.trust;
    ui::error(&format!(
        "trust score {} ({:?}): signature={} checksum={} transport={} algorithm={}",
        t.score,
        t.level,
        t.signature.points,
        t.checksum.points,
        t.transport.points,
        t.algorithm.points
    ));
}

fn emit_provenance(record: &crate::verify::provenance::ProvenanceRecord, file: Option<&std::path::Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("serializing provenance record")?;
    match file {
        Some(path) => std::fs::write(path, json).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn run_config_action(action: &ConfigAction) -> Result<()> {
    let mut storage = ConfigStorage::new(ConfigStorage::default_path())?;
    match action {
        ConfigAction::Get { key } => {
            let value = match key {
                ConfigKey::GithubToken => storage.config().github_token.clone(),
                ConfigKey::NoProxy => storage.config().no_proxy.map(|b| b.to_string()),
                ConfigKey::CacheDir => storage.config().cache_dir.as_ref().map(|p| p.display().to_string()),
            };
            match value {
                Some(v) => println!("{v}"),
                None => println!("(unset)"),
            }
        }
        ConfigAction::Set { key, value } => {
            match key {
                ConfigKey::GithubToken => storage.config_mut().github_token = Some(value.clone()),
                ConfigKey::NoProxy => {
                    storage.config_mut().no_proxy =
                        Some(value.parse::<bool>().context("--no-proxy expects true or false")?);
                }
                ConfigKey::CacheDir => storage.config_mut().cache_dir = Some(PathBuf::from(value)),
            }
            storage.save()?;
            ui::info(&format!("saved {} to {}", key_name(*key), ConfigStorage::default_path().display()));
        }
    }
    Ok(())
}

fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::GithubToken => "github_token",
        ConfigKey::NoProxy => "no_proxy",
        ConfigKey::CacheDir => "cache_dir",
    }
}

fn print_completions(shell: clap_complete::Shell) -> Result<()> {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
