use super::{select_asset, SelectError, SelectFlags};
use crate::models::{Asset, RepoConfig};
use crate::platform::Platform;

fn asset(name: &str) -> Asset {
    Asset {
        name: name.to_string(),
        download_url: format!("https://example.com/{name}"),
        size: 10,
    }
}

#[test]
fn select_asset_picks_the_single_matching_platform_asset() {
    let assets = vec![
        asset("tool-linux-amd64.tar.gz"),
        asset("tool-darwin-arm64.tar.gz"),
        asset("tool-linux-amd64.tar.gz.sha256"),
    ];
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let flags = SelectFlags::default();

    let selected = select_asset(&assets, &cfg, &platform, &flags).expect("one match");
    assert_eq!(selected.name, "tool-linux-amd64.tar.gz");
}

#[test]
fn select_asset_honors_explicit_asset_match_override() {
    let assets = vec![asset("tool-linux-amd64.tar.gz"), asset("tool-linux-arm64.tar.gz")];
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let flags = SelectFlags {
        asset_match: Some("arm64".to_string()),
        asset_regex: None,
    };

    let selected = select_asset(&assets, &cfg, &platform, &flags).expect("one match");
    assert_eq!(selected.name, "tool-linux-arm64.tar.gz");
}

#[test]
fn select_asset_honors_explicit_asset_regex_override() {
    let assets = vec![asset("tool-linux-amd64.tar.gz"), asset("tool-linux-arm64.tar.gz")];
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let flags = SelectFlags {
        asset_match: None,
        asset_regex: Some(r"arm64\.tar\.gz$".to_string()),
    };

    let selected = select_asset(&assets, &cfg, &platform, &flags).expect("one match");
    assert_eq!(selected.name, "tool-linux-arm64.tar.gz");
}

#[test]
fn select_asset_errors_with_no_candidates_for_an_unsupported_platform() {
    let assets = vec![asset("tool-windows-amd64.exe")];
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let flags = SelectFlags::default();

    match select_asset(&assets, &cfg, &platform, &flags) {
        Err(SelectError::NoCandidates) => {}
        other => panic!("expected NoCandidates, got {other:?}"),
    }
}

#[test]
fn select_asset_errors_on_a_genuine_tie() {
    let assets = vec![asset("tool-linux-amd64-v1.tar.gz"), asset("tool-linux-amd64-v2.tar.gz")];
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let flags = SelectFlags::default();

    match select_asset(&assets, &cfg, &platform, &flags) {
        Err(SelectError::Tie(names)) => assert_eq!(names.len(), 2),
        other => panic!("expected a tie, got {other:?}"),
    }
}

#[test]
fn select_asset_strips_supplemental_assets_before_matching() {
    let assets = vec![asset("tool-linux-amd64.tar.gz"), asset("tool-linux-amd64.tar.gz.asc")];
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let flags = SelectFlags::default();

    let selected = select_asset(&assets, &cfg, &platform, &flags).expect("one match");
    assert_eq!(selected.name, "tool-linux-amd64.tar.gz");
}
