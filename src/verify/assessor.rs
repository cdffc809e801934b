use schemars::JsonSchema;
use serde::Serialize;

use crate::discovery::classifier::{classify, AssetKind};
use crate::discovery::supplemental::{
    infer_checksum_algo, is_per_asset_manifest, locate_asset_signature, locate_checksum_manifest,
    locate_checksum_sig,
};
use crate::models::repo_config::{HashAlgo, SignatureFormat};
use crate::models::{Asset, RepoConfig, Release};
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    A,
    B,
    C,
    Insecure,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Bypassed,
    Minimal,
    Low,
    Medium,
    High,
}

impl TrustLevel {
    pub fn from_score(score: i32) -> Self {
        match score {
            0 => TrustLevel::Bypassed,
            1..=29 => TrustLevel::Minimal,
            30..=59 => TrustLevel::Low,
            60..=84 => TrustLevel::Medium,
            _ => TrustLevel::High,
        }
    }

    /// Legacy four-bucket text kept for one release cycle of backward
    /// compatibility (spec §4.5).
    pub fn legacy_text(self) -> &'static str {
        match self {
            TrustLevel::Bypassed => "none",
            TrustLevel::Minimal | TrustLevel::Low => "low",
            TrustLevel::Medium => "medium",
            TrustLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Factor {
    pub points: i32,
    pub verifiable: bool,
    pub validated: bool,
    pub skipped: bool,
    pub description: String,
}

impl Factor {
    fn inert(description: &str) -> Self {
        Self {
            points: 0,
            verifiable: false,
            validated: false,
            skipped: false,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustScore {
    pub score: i32,
    pub level: TrustLevel,
    pub signature: Factor,
    pub checksum: Factor,
    pub transport: Factor,
    pub algorithm: Factor,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignatureAvailability {
    pub present: bool,
    pub format: Option<SignatureFormat>,
    pub filename: Option<String>,
    pub is_checksum_level: bool,
    pub checksum_file_it_signs: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Consolidated,
    PerAsset,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecksumAvailability {
    pub present: bool,
    pub filename: Option<String>,
    pub kind: Option<ManifestKind>,
    pub algorithm: HashAlgo,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationAssessment {
    pub selected_asset: String,
    pub signature: SignatureAvailability,
    pub checksum: ChecksumAvailability,
    pub workflow: Workflow,
    pub trust: TrustScore,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AssessFlags {
    pub skip_sig: bool,
    pub skip_checksum: bool,
    pub insecure: bool,
    pub prefer_per_asset: bool,
}

/// Inspect the release and selected asset (without downloading anything)
/// and decide which verification workflow applies (spec §4.5).
pub fn assess(
    release: &Release,
    selected: &Asset,
    cfg: &RepoConfig,
    platform: &Platform,
    flags: &AssessFlags,
) -> VerificationAssessment {
    let mut warnings = Vec::new();

    if classify(&selected.name).kind == AssetKind::Package {
        warnings.push(format!(
            "{} is a package format (.deb/.rpm/.pkg/.msi); it will not be installed by default",
            selected.name
        ));
    }

    let checksum_sig = locate_checksum_sig(release, selected, cfg, platform);
    let asset_sig = locate_asset_signature(release, selected, cfg, platform);
    let manifest = locate_checksum_manifest(release, selected, cfg, platform);

    let checksum_sig_present = checksum_sig.is_some();
    let asset_sig_present = asset_sig.is_some();
    let manifest_present = manifest.is_some();

    let workflow = if flags.insecure {
        Workflow::Insecure
    } else if checksum_sig_present && cfg.prefer_checksum_sig && !flags.prefer_per_asset && !flags.skip_sig {
        Workflow::A
    } else if asset_sig_present && !flags.skip_sig {
        Workflow::B
    } else if manifest_present {
        Workflow::C
    } else {
        Workflow::None
    };

    let signature = match workflow {
        Workflow::A => {
            let located = checksum_sig.as_ref().unwrap();
            SignatureAvailability {
                present: true,
                format: Some(located.format),
                filename: Some(located.asset.name.clone()),
                is_checksum_level: true,
                checksum_file_it_signs: manifest.map(|a| a.name.clone()),
            }
        }
        Workflow::B => {
            let located = asset_sig.as_ref().unwrap();
            SignatureAvailability {
                present: true,
                format: Some(located.format),
                filename: Some(located.asset.name.clone()),
                is_checksum_level: false,
                checksum_file_it_signs: None,
            }
        }
        _ => SignatureAvailability {
            present: checksum_sig_present || asset_sig_present,
            format: checksum_sig.as_ref().or(asset_sig.as_ref()).map(|l| l.format),
            filename: checksum_sig
                .as_ref()
                .or(asset_sig.as_ref())
                .map(|l| l.asset.name.clone()),
            is_checksum_level: checksum_sig_present,
            checksum_file_it_signs: None,
        },
    };

    let algorithm = manifest
        .map(|a| infer_checksum_algo(&a.name, cfg.hash_algo))
        .unwrap_or(cfg.hash_algo);

    let checksum = ChecksumAvailability {
        present: manifest_present,
        filename: manifest.map(|a| a.name.clone()),
        kind: manifest.map(|a| {
            if is_per_asset_manifest(&a.name, &selected.name) {
                ManifestKind::PerAsset
            } else {
                ManifestKind::Consolidated
            }
        }),
        algorithm,
    };

    let signature_available_pre_flags = checksum_sig_present || asset_sig_present;

    let (sig_factor, checksum_factor) = if flags.insecure {
        (Factor::inert("verification bypassed"), Factor::inert("verification bypassed"))
    } else {
        let sig_factor = if signature_available_pre_flags {
            if flags.skip_sig {
                Factor {
                    points: -20,
                    verifiable: true,
                    validated: false,
                    skipped: true,
                    description: "signature available but skipped (--skip-sig)".into(),
                }
            } else {
                Factor {
                    points: 70,
                    verifiable: true,
                    validated: true,
                    skipped: false,
                    description: "signature verifiable and validated".into(),
                }
            }
        } else {
            Factor::inert("no signature available")
        };

        let checksum_factor = if manifest_present {
            if flags.skip_checksum {
                Factor {
                    points: -15,
                    verifiable: true,
                    validated: false,
                    skipped: true,
                    description: "checksum available but skipped (--skip-checksum)".into(),
                }
            } else {
                Factor {
                    points: 40,
                    verifiable: true,
                    validated: true,
                    skipped: false,
                    description: "checksum verifiable and validated".into(),
                }
            }
        } else {
            Factor::inert("no checksum manifest available")
        };

        (sig_factor, checksum_factor)
    };

    let transport_factor = if flags.insecure {
        Factor::inert("verification bypassed")
    } else if sig_factor.points == 0 && checksum_factor.points == 0 {
        Factor {
            points: 25,
            verifiable: true,
            validated: true,
            skipped: false,
            description: "HTTPS transport used, no other verification factor available".into(),
        }
    } else {
        Factor::inert("superseded by signature/checksum factors")
    };

    let algorithm_factor = if flags.insecure {
        Factor::inert("verification bypassed")
    } else if manifest_present {
        match algorithm {
            HashAlgo::Sha256 | HashAlgo::Sha512 => Factor {
                points: 5,
                verifiable: true,
                validated: true,
                skipped: false,
                description: format!("digest algorithm {algorithm} is modern"),
            },
        }
    } else {
        Factor::inert("no checksum manifest to infer an algorithm from")
    };

    let raw_score = sig_factor.points + checksum_factor.points + transport_factor.points + algorithm_factor.points;
    let score = if flags.insecure { 0 } else { raw_score.clamp(0, 100) };
    let level = TrustLevel::from_score(score);

    let trust = TrustScore {
        score,
        level,
        signature: sig_factor,
        checksum: checksum_factor,
        transport: transport_factor,
        algorithm: algorithm_factor,
    };

    match workflow {
        Workflow::Insecure => warnings.push("Verification bypassed (--insecure); trust score is 0".into()),
        Workflow::C => warnings.push("No signature available; authenticity cannot be proven".into()),
        Workflow::None => warnings.push("No signature or checksum manifest available for this asset".into()),
        _ => {}
    }
    if flags.skip_sig && signature_available_pre_flags {
        warnings.push("A signature was available but skipped (--skip-sig)".into());
    }
    if flags.skip_checksum && manifest_present {
        warnings.push("A checksum manifest was available but skipped (--skip-checksum)".into());
    }

    VerificationAssessment {
        selected_asset: selected.name.clone(),
        signature,
        checksum,
        workflow,
        trust,
        warnings,
    }
}

#[cfg(test)]
#[path = "../../tests/verify/assessor.rs"]
mod tests;
