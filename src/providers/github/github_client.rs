use anyhow::{Context, Result};
use reqwest::{header, Client};

use crate::errors::ProviderRejected;
use crate::models::Release;
use crate::providers::github::github_dtos::ReleaseDto;

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Thin client over the one GitHub-compatible endpoint this tool
/// consumes (spec §6). Carries no state beyond the `reqwest::Client` the
/// caller constructs (so it shares proxy/timeout configuration) and the
/// resolved api-base/token pair.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    /// `config_token` is the lowest-priority fallback in the resolution
    /// order (spec.md §9 design note): `SFETCH_GITHUB_TOKEN` env var, then
    /// `GITHUB_TOKEN`, then whatever `sfetch.toml` carries.
    pub fn new(client: Client, config_token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base_from_env(),
            token: token_from_env().or(config_token),
        }
    }

    /// Fetch a release by tag, or the latest release when `tag` is `None`.
    pub async fn fetch_release(&self, owner_repo: &str, tag: Option<&str>) -> Result<Release> {
        let url = match tag {
            Some(tag) => format!("{}/repos/{owner_repo}/releases/tags/{tag}", self.api_base),
            None => format!("{}/repos/{owner_repo}/releases/latest", self.api_base),
        };

        let mut req = self.client.get(&url);
        if let (Some(token), true) = (&self.token, is_github_host(&url)) {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = req.send().await.with_context(|| format!("requesting {url}"))?;

        if !resp.status().is_success() {
            return Err(ProviderRejected(format!(
                "{} responded with {}",
                url,
                resp.status()
            ))
            .into());
        }

        let dto: ReleaseDto = resp.json().await.context("parsing release JSON")?;
        Ok(dto.into())
    }
}

fn api_base_from_env() -> String {
    std::env::var("SFETCH_GITHUB_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

fn token_from_env() -> Option<String> {
    std::env::var("SFETCH_GITHUB_TOKEN")
        .ok()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
}

/// The auth token is sent only to github.com hosts, never to whatever
/// host ends up serving an asset download (spec §6).
fn is_github_host(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case("api.github.com") || h.eq_ignore_ascii_case("github.com")))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../../tests/providers/github_client.rs"]
mod tests;
