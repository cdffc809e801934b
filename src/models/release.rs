use serde::{Deserialize, Serialize};

/// A single downloadable file advertised by a release. Names are the sole
/// signal used for classification and selection — case-sensitive, exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub download_url: String,
    pub size: u64,
}

/// A release snapshot from the hosting provider. Immutable after fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag: String,
    pub assets: Vec<Asset>,
}

impl Release {
    /// Tag with any leading `v` stripped, e.g. `v1.2.3` -> `1.2.3`.
    pub fn version_no_prefix(&self) -> &str {
        self.tag.strip_prefix('v').unwrap_or(&self.tag)
    }

    pub fn get_asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
#[path = "../../tests/models/release.rs"]
mod tests;
