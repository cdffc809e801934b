use super::{build, ActiveFlags, ProvenanceInputs, SCHEMA_URL};
use crate::models::{Asset, Release};
use crate::verify::assessor::{assess, AssessFlags};
use crate::models::RepoConfig;
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

#[test]
fn build_dry_run_record_omits_the_digest_and_reports_unverified() {
    let release = release_with(&["tool-linux-amd64.tar.gz", "SHA256SUMS", "SHA256SUMS.minisig"]);
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform, &AssessFlags::default());

    let record = build(ProvenanceInputs {
        repository: "owner/tool",
        release: &release,
        selected,
        assessment: &assessment,
        outcome: None,
        flags: ActiveFlags::default(),
        timestamp: "2026-01-01T00:00:00Z".to_string(),
        tool_version: "0.1.0".to_string(),
    });

    assert_eq!(record.schema, SCHEMA_URL);
    assert!(record.asset.digest.is_none());
    assert!(!record.verification.signature.verified);
    assert!(!record.verification.checksum.verified);
    assert_eq!(record.trust.legacy_trust_level, "high");
}

#[test]
fn build_serializes_with_camel_case_trust_level_and_schema_field() {
    let release = release_with(&["tool-linux-amd64.tar.gz"]);
    let cfg = RepoConfig::defaults("owner/tool");
    let platform = Platform::new("linux", "amd64");
    let selected = release.get_asset("tool-linux-amd64.tar.gz").unwrap();
    let assessment = assess(&release, selected, &cfg, &platform, &AssessFlags::default());

    let record = build(ProvenanceInputs {
        repository: "owner/tool",
        release: &release,
        selected,
        assessment: &assessment,
        outcome: None,
        flags: ActiveFlags::default(),
        timestamp: "2026-01-01T00:00:00Z".to_string(),
        tool_version: "0.1.0".to_string(),
    });

    let json = serde_json::to_value(&record).expect("serializable");
    assert_eq!(json["$schema"], SCHEMA_URL);
    assert_eq!(json["trust"]["trustLevel"], "minimal");
    assert!(json["asset"].get("digest").is_none());
}
