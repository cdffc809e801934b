use schemars::JsonSchema;
use serde::Serialize;

use crate::models::repo_config::SignatureFormat;
use crate::models::{Asset, Release};
use crate::verify::assessor::{TrustLevel, VerificationAssessment, Workflow};
use crate::verify::executor::ExecutionOutcome;

pub const SCHEMA_URL: &str = "https://sfetch.dev/schema/provenance-v1.json";

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SourceRecord {
    #[serde(rename = "type")]
    pub source_type: String,
    pub repository: String,
    pub release_tag: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AssetRecord {
    pub name: String,
    pub size: u64,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SignatureStatus {
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SignatureFormat>,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ChecksumStatus {
    pub present: bool,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct VerificationRecord {
    pub workflow: Workflow,
    pub signature: SignatureStatus,
    pub checksum: ChecksumStatus,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TrustRecord {
    pub score: i32,
    #[serde(rename = "trustLevel")]
    pub level: TrustLevel,
    /// Legacy textual mirror of `trustLevel`, kept for one release cycle
    /// of backward compatibility (spec §4.5).
    pub legacy_trust_level: &'static str,
}

#[derive(Debug, Clone, Serialize, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ActiveFlags {
    pub insecure: bool,
    pub skip_sig: bool,
    pub skip_checksum: bool,
    pub require_minisign: bool,
    pub prefer_per_asset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_minimum: Option<i32>,
}

/// The structured audit record emitted by `--provenance`/`--dry-run`
/// (spec §4.10). `additionalProperties: false` at every nested object is
/// enforced by `#[serde(deny_unknown_fields)]`, which `schemars` turns
/// into the matching JSON Schema constraint.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ProvenanceRecord {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub timestamp: String,
    pub tool_version: String,
    pub source: SourceRecord,
    pub asset: AssetRecord,
    pub verification: VerificationRecord,
    pub trust: TrustRecord,
    pub flags: ActiveFlags,
    pub warnings: Vec<String>,
}

pub struct ProvenanceInputs<'a> {
    pub repository: &'a str,
    pub release: &'a Release,
    pub selected: &'a Asset,
    pub assessment: &'a VerificationAssessment,
    pub outcome: Option<&'a ExecutionOutcome>,
    pub flags: ActiveFlags,
    pub timestamp: String,
    pub tool_version: String,
}

/// Build the provenance record for one invocation. `outcome` is `None`
/// for `--dry-run`, which omits the downloaded-bytes digest entirely
/// rather than emitting a placeholder.
pub fn build(inputs: ProvenanceInputs) -> ProvenanceRecord {
    let assessment = inputs.assessment;

    let signature_verified = inputs.outcome.is_some()
        && matches!(assessment.workflow, Workflow::A | Workflow::B)
        && !matches!(assessment.workflow, Workflow::Insecure);
    let checksum_verified = inputs.outcome.is_some()
        && assessment.checksum.present
        && !matches!(assessment.workflow, Workflow::Insecure)
        && !matches!(assessment.workflow, Workflow::B if !assessment.checksum.present);

    ProvenanceRecord {
        schema: SCHEMA_URL.to_string(),
        timestamp: inputs.timestamp,
        tool_version: inputs.tool_version,
        source: SourceRecord {
            source_type: "github".to_string(),
            repository: inputs.repository.to_string(),
            release_tag: inputs.release.tag.clone(),
            url: inputs.selected.download_url.clone(),
        },
        asset: AssetRecord {
            name: inputs.selected.name.clone(),
            size: inputs.selected.size,
            url: inputs.selected.download_url.clone(),
            digest: inputs.outcome.and_then(|o| o.digest.clone()),
        },
        verification: VerificationRecord {
            workflow: assessment.workflow,
            signature: SignatureStatus {
                present: assessment.signature.present,
                format: assessment.signature.format,
                verified: signature_verified,
            },
            checksum: ChecksumStatus {
                present: assessment.checksum.present,
                verified: checksum_verified,
            },
        },
        trust: TrustRecord {
            score: assessment.trust.score,
            level: assessment.trust.level,
            legacy_trust_level: assessment.trust.level.legacy_text(),
        },
        flags: inputs.flags,
        warnings: assessment.warnings.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/verify/provenance.rs"]
mod tests;
