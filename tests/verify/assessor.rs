use super::{assess, AssessFlags, TrustLevel, Workflow};
use crate::models::{Asset, Release, RepoConfig};
use crate::platform::Platform;

fn asset(name: &str) -> Asset {
    Asset {
        name: name.to_string(),
        download_url: format!("https://example.com/{name}"),
        size: 10,
    }
}

fn release_with(names: &[&str]) -> Release {
    Release {
        tag: "v1.0.0".to_string(),
        assets: names.iter().map(|n| asset(n)).collect(),
    }
}

fn platform() -> Platform {
    Platform::new("linux", "amd64")
}

#[test]
fn assess_selects_workflow_a_when_a_checksum_manifest_signature_exists() {
    let release = release_with(&[
        "tool-linux-amd64.tar.gz",
        "SHA256SUMS",
        "SHA256SUMS.minisig",
    ]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform(), &AssessFlags::default());

    assert_eq!(assessment.workflow, Workflow::A);
    assert!(assessment.signature.is_checksum_level);
    assert_eq!(assessment.trust.level, TrustLevel::High);
}

#[test]
fn assess_selects_workflow_b_when_only_a_per_asset_signature_exists() {
    let release = release_with(&["tool-linux-amd64.tar.gz", "tool-linux-amd64.tar.gz.minisig"]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform(), &AssessFlags::default());

    assert_eq!(assessment.workflow, Workflow::B);
    assert!(!assessment.signature.is_checksum_level);
}

#[test]
fn assess_selects_workflow_c_with_checksum_only() {
    let release = release_with(&["tool-linux-amd64.tar.gz", "SHA256SUMS"]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform(), &AssessFlags::default());

    assert_eq!(assessment.workflow, Workflow::C);
    assert!(!assessment.warnings.is_empty());
}

#[test]
fn assess_selects_workflow_none_with_no_verification_material() {
    let release = release_with(&["tool-linux-amd64.tar.gz"]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform(), &AssessFlags::default());

    assert_eq!(assessment.workflow, Workflow::None);
    assert_eq!(assessment.trust.score, 25);
    assert_eq!(assessment.trust.level, TrustLevel::Minimal);
}

#[test]
fn assess_insecure_flag_forces_workflow_insecure_and_zero_trust() {
    let release = release_with(&[
        "tool-linux-amd64.tar.gz",
        "SHA256SUMS",
        "SHA256SUMS.minisig",
    ]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let flags = AssessFlags {
        insecure: true,
        ..Default::default()
    };
    let assessment = assess(&release, selected, &cfg, &platform(), &flags);

    assert_eq!(assessment.workflow, Workflow::Insecure);
    assert_eq!(assessment.trust.score, 0);
    assert_eq!(assessment.trust.level, TrustLevel::Bypassed);
}

#[test]
fn assess_prefer_per_asset_flag_picks_workflow_b_over_a() {
    let release = release_with(&[
        "tool-linux-amd64.tar.gz",
        "tool-linux-amd64.tar.gz.minisig",
        "SHA256SUMS",
        "SHA256SUMS.minisig",
    ]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let flags = AssessFlags {
        prefer_per_asset: true,
        ..Default::default()
    };
    let assessment = assess(&release, selected, &cfg, &platform(), &flags);

    assert_eq!(assessment.workflow, Workflow::B);
}

#[test]
fn assess_skip_sig_demotes_workflow_to_checksum_only_and_penalizes_trust() {
    let release = release_with(&[
        "tool-linux-amd64.tar.gz",
        "SHA256SUMS",
        "SHA256SUMS.minisig",
    ]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let flags = AssessFlags {
        skip_sig: true,
        ..Default::default()
    };
    let assessment = assess(&release, selected, &cfg, &platform(), &flags);

    assert_eq!(assessment.workflow, Workflow::C);
    assert!(assessment.trust.signature.skipped);
    assert!(assessment.warnings.iter().any(|w| w.contains("--skip-sig")));
}

#[test]
fn assess_package_kind_asset_generates_a_warning() {
    let release = release_with(&["tool-linux-amd64.deb"]);
    let cfg = RepoConfig::defaults("owner/tool");
    let selected = release.get_asset("tool-linux-amd64.deb").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform(), &AssessFlags::default());

    assert!(assessment.warnings.iter().any(|w| w.contains("package format")));
}

#[test]
fn trust_level_from_score_buckets_match_spec_thresholds() {
    assert_eq!(TrustLevel::from_score(0), TrustLevel::Bypassed);
    assert_eq!(TrustLevel::from_score(15), TrustLevel::Minimal);
    assert_eq!(TrustLevel::from_score(45), TrustLevel::Low);
    assert_eq!(TrustLevel::from_score(70), TrustLevel::Medium);
    assert_eq!(TrustLevel::from_score(95), TrustLevel::High);
}

#[test]
fn trust_level_legacy_text_collapses_minimal_and_low_together() {
    assert_eq!(TrustLevel::Bypassed.legacy_text(), "none");
    assert_eq!(TrustLevel::Minimal.legacy_text(), "low");
    assert_eq!(TrustLevel::Low.legacy_text(), "low");
    assert_eq!(TrustLevel::Medium.legacy_text(), "medium");
    assert_eq!(TrustLevel::High.legacy_text(), "high");
}
