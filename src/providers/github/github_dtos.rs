use serde::{Deserialize, Deserializer};

use crate::models::{Asset, Release};

/// Wire shape of `GET /repos/{owner}/{repo}/releases/{latest|tags/<tag>}`
/// (spec §6) — only the fields this tool actually reads. Name and URL
/// fields tolerate a `null` (some mirrors emit it for draft assets).
#[derive(Debug, Clone, Deserialize)]
pub struct AssetDto {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub browser_download_url: String,
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDto {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub tag_name: String,
    pub assets: Vec<AssetDto>,
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<AssetDto> for Asset {
    fn from(dto: AssetDto) -> Self {
        Asset {
            name: dto.name,
            download_url: dto.browser_download_url,
            size: dto.size,
        }
    }
}

impl From<ReleaseDto> for Release {
    fn from(dto: ReleaseDto) -> Self {
        Release {
            tag: dto.tag_name,
            assets: dto.assets.into_iter().map(Asset::from).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/providers/github_dtos.rs"]
mod tests;
