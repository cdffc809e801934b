use super::{Asset, Release};

fn release_with(tag: &str, names: &[&str]) -> Release {
    Release {
        tag: tag.to_string(),
        assets: names
            .iter()
            .map(|n| Asset {
                name: n.to_string(),
                download_url: format!("https://example.com/{n}"),
                size: 100,
            })
            .collect(),
    }
}

#[test]
fn version_no_prefix_strips_leading_v() {
    let release = release_with("v1.2.3", &[]);
    assert_eq!(release.version_no_prefix(), "1.2.3");
}

#[test]
fn version_no_prefix_passes_through_unprefixed_tags() {
    let release = release_with("1.2.3", &[]);
    assert_eq!(release.version_no_prefix(), "1.2.3");
}

#[test]
fn get_asset_finds_exact_case_sensitive_match() {
    let release = release_with("v1.0.0", &["tool-linux-amd64.tar.gz", "tool-linux-amd64.tar.gz.sha256"]);
    assert!(release.get_asset("tool-linux-amd64.tar.gz").is_some());
    assert!(release.get_asset("TOOL-LINUX-AMD64.TAR.GZ").is_none());
    assert!(release.get_asset("missing").is_none());
}
