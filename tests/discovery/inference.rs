use super::{archive_stripped_base, is_supplemental, narrow, strip_supplemental};
use crate::models::Asset;
use crate::platform::Platform;

fn asset(name: &str) -> Asset {
    Asset {
        name: name.to_string(),
        download_url: format!("https://example.com/{name}"),
        size: 10,
    }
}

#[test]
fn is_supplemental_flags_known_signature_and_checksum_suffixes() {
    assert!(is_supplemental("SHA256SUMS"));
    assert!(is_supplemental("tool.tar.gz.asc"));
    assert!(is_supplemental("tool.tar.gz.minisig"));
    assert!(is_supplemental("tool.tar.gz.sig"));
}

#[test]
fn is_supplemental_does_not_disqualify_tools_named_minisign_or_cosign() {
    assert!(!is_supplemental("minisign-linux-amd64.tar.gz"));
    assert!(!is_supplemental("cosign-linux-amd64.tar.gz"));
}

#[test]
fn strip_supplemental_removes_only_supplemental_assets() {
    let assets = vec![asset("tool-linux-amd64.tar.gz"), asset("tool-linux-amd64.tar.gz.sha256")];
    let refs: Vec<&Asset> = assets.iter().collect();
    let stripped = strip_supplemental(&refs);
    assert_eq!(stripped.len(), 1);
    assert_eq!(stripped[0].name, "tool-linux-amd64.tar.gz");
}

#[test]
fn archive_stripped_base_strips_the_longest_matching_extension() {
    let extensions = vec![".tar.gz".to_string(), ".tar".to_string()];
    assert_eq!(
        archive_stripped_base("tool-linux-amd64.tar.gz", &extensions),
        "tool-linux-amd64"
    );
    assert_eq!(archive_stripped_base("tool-linux-amd64", &extensions), "tool-linux-amd64");
}

#[test]
fn narrow_excludes_foreign_platform_binaries() {
    let assets = vec![asset("tool-linux-amd64"), asset("tool-windows-amd64.exe")];
    let refs: Vec<&Asset> = assets.iter().collect();
    let platform = Platform::new("linux", "amd64");
    let extensions = vec![".tar.gz".to_string()];
    let result = narrow(&refs, &platform, &extensions);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "tool-linux-amd64");
}

#[test]
fn narrow_prefers_raw_binary_over_its_own_archive() {
    let assets = vec![asset("tool-linux-amd64"), asset("tool-linux-amd64.tar.gz")];
    let refs: Vec<&Asset> = assets.iter().collect();
    let platform = Platform::new("linux", "amd64");
    let extensions = vec![".tar.gz".to_string()];
    let result = narrow(&refs, &platform, &extensions);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "tool-linux-amd64");
}

#[test]
fn narrow_picks_the_configured_preferred_archive_format_among_several() {
    let assets = vec![
        asset("tool-linux-amd64.zip"),
        asset("tool-linux-amd64.tar.gz"),
    ];
    let refs: Vec<&Asset> = assets.iter().collect();
    let platform = Platform::new("linux", "amd64");
    let extensions = vec![".tar.gz".to_string(), ".zip".to_string()];
    let result = narrow(&refs, &platform, &extensions);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "tool-linux-amd64.tar.gz");
}

#[test]
fn narrow_falls_back_to_full_set_when_arch_token_filter_empties_it() {
    let assets = vec![asset("tool-linux-nolabel.tar.gz")];
    let refs: Vec<&Asset> = assets.iter().collect();
    let platform = Platform::new("linux", "amd64");
    let extensions = vec![".tar.gz".to_string()];
    let result = narrow(&refs, &platform, &extensions);
    assert_eq!(result.len(), 1);
}
