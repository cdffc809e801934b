use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigInvalid;
use crate::models::repo_config::RepoConfigOverrides;

/// Global tool settings, persisted to `sfetch.toml` (spec.md §9 design
/// note; ambient concern, not in spec.md's core). Distinct from
/// [`RepoConfigOverrides`], which scopes to a single `owner/repo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub github_token: Option<String>,
    pub no_proxy: Option<bool>,
    pub cache_dir: Option<PathBuf>,
    pub repos: std::collections::HashMap<String, RepoConfigOverrides>,
}

/// Loads/saves `AppConfig` at a fixed path, the way the teacher's
/// `ConfigStorage` wraps `AppConfig`. A missing file is not an error —
/// defaults apply and the file is written lazily on first explicit save.
#[derive(Debug)]
pub struct ConfigStorage {
    config: AppConfig,
    config_file: PathBuf,
}

impl ConfigStorage {
    pub fn new(config_file: PathBuf) -> Result<Self> {
        let mut storage = Self {
            config: AppConfig::default(),
            config_file,
        };
        storage.load()?;
        Ok(storage)
    }

    pub fn default_path() -> PathBuf {
        if let Ok(dir) = std::env::var("SFETCH_CONFIG_DIR") {
            return PathBuf::from(dir).join("sfetch.toml");
        }
        dirs::config_dir()
            .map(|d| d.join("sfetch").join("sfetch.toml"))
            .unwrap_or_else(|| PathBuf::from("sfetch.toml"))
    }

    pub fn load(&mut self) -> Result<()> {
        if !self.config_file.exists() {
            return Ok(());
        }
        let text = std::fs::read_to_string(&self.config_file)
            .with_context(|| format!("reading {}", self.config_file.display()))?;
        self.config = toml::from_str(&text).map_err(|e| {
            ConfigInvalid(format!("{}: {e}", self.config_file.display()))
        })?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(&self.config).context("serializing config")?;
        std::fs::write(&self.config_file, text)
            .with_context(|| format!("writing {}", self.config_file.display()))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn overrides_for(&self, owner_repo: &str) -> RepoConfigOverrides {
        self.config.repos.get(owner_repo).cloned().unwrap_or_default()
    }
}

/// Per-repo overrides additionally loaded from `<cwd>/.sfetch.toml` when
/// present, merged on top of whatever `sfetch.toml` holds for the repo.
pub fn load_local_overrides(dir: &Path) -> Result<Option<RepoConfigOverrides>> {
    let path = dir.join(".sfetch.toml");
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let overrides: RepoConfigOverrides = toml::from_str(&text)
        .map_err(|e| ConfigInvalid(format!("{}: {e}", path.display())))?;
    Ok(Some(overrides))
}

#[cfg(test)]
#[path = "../../tests/config/mod.rs"]
mod tests;
