use crate::verdict::{ComplianceReport, GateVerdict, RiskVerdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A candidate patch produced by a suggestion generator.
///
/// `audit` starts empty and is filled in by the decision aggregator and then by
/// the ranking step. `can_automerge` is only meaningful after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message: String,
    #[serde(alias = "patch_text")]
    pub patch: String,
    pub reason: String,
    #[serde(default)]
    pub audit: SuggestionAudit,
    #[serde(default)]
    pub can_automerge: bool,
}

impl Suggestion {
    pub fn new(
        message: impl Into<String>,
        patch: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            patch: patch.into(),
            reason: reason.into(),
            audit: SuggestionAudit::default(),
            can_automerge: false,
        }
    }

    /// Attach an expected impact for one benchmark/compliance target.
    pub fn with_projected_impact(mut self, target: impl Into<String>, impact: ImpactEstimate) -> Self {
        self.audit.projected_impact.insert(target.into(), impact);
        self
    }
}

/// Expected percentage change for one target. Negative values are improvements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_pct: Option<f64>,
}

impl ImpactEstimate {
    pub fn runtime(pct: f64) -> Self {
        Self {
            runtime_pct: Some(pct),
            memory_pct: None,
        }
    }

    pub fn memory(pct: f64) -> Self {
        Self {
            runtime_pct: None,
            memory_pct: Some(pct),
        }
    }
}

/// A gate that errored instead of producing a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateFailure {
    pub gate: String,
    pub reason: String,
}

/// Per-suggestion record of gate verdicts and ranking inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionAudit {
    /// Invariant guard verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<GateVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gate_failures: Vec<GateFailure>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub projected_impact: BTreeMap<String, ImpactEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_score: Option<f64>,
}

impl SuggestionAudit {
    /// Gate outputs only, in the shape the timeline stores as event cues.
    pub fn cues(&self) -> serde_json::Value {
        serde_json::json!({
            "arch": self.arch,
            "risk": self.risk,
            "compliance": self.compliance.as_ref().map(|c| c.summary),
        })
    }
}
