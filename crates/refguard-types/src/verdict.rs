//! Gate verdicts.

use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// Scores at or above this value block automerge.
pub const RISK_THRESHOLD: f64 = 0.5;

/// A single rule hit reported by a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: String,
    pub detail: String,
}

impl Violation {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
        }
    }
}

/// Pass/fail verdict with the ordered list of violations that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub ok: bool,
    pub violations: Vec<Violation>,
}

impl GateVerdict {
    pub fn pass() -> Self {
        Self {
            ok: true,
            violations: Vec::new(),
        }
    }

    /// `ok` iff `violations` is empty.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            violations,
        }
    }
}

/// Which classifier backend produced a [`RiskVerdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProvider {
    Model,
    Heuristic,
}

impl RiskProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProvider::Model => "model",
            RiskProvider::Heuristic => "heuristic",
        }
    }
}

/// Output of the risk classifier.
///
/// `risk_score` is always within `[0, 1]` and `ok == risk_score < RISK_THRESHOLD`
/// for every verdict built through [`RiskVerdict::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub ok: bool,
    pub risk_score: f64,
    pub violations: Vec<Violation>,
    pub provider: RiskProvider,
    pub explanation: String,
    /// Model artifact that produced the score, for model verdicts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Set when a model call failed and the heuristic answered instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RiskVerdict {
    /// Build a verdict, clamping the score. A non-finite score is treated as
    /// maximal risk.
    pub fn new(
        risk_score: f64,
        violations: Vec<Violation>,
        provider: RiskProvider,
        explanation: impl Into<String>,
    ) -> Self {
        let risk_score = if risk_score.is_finite() {
            risk_score.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            ok: risk_score < RISK_THRESHOLD,
            risk_score,
            violations,
            provider,
            explanation: explanation.into(),
            model: None,
            note: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn blocks_automerge(&self) -> bool {
        !self.ok || self.risk_score >= RISK_THRESHOLD
    }
}

/// Verification status of a compliance finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Passed,
    Warn,
    Failed,
    Unknown,
}

/// One compliance obligation enumerated for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub rule: String,
    pub status: FindingStatus,
    pub note: String,
    pub risk: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub passed: usize,
    pub warn: usize,
    pub failed: usize,
}

/// Compliance manifest for one domain and set of targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub domain: Domain,
    pub targets: Vec<String>,
    pub findings: Vec<ComplianceFinding>,
    pub summary: ComplianceSummary,
}

impl ComplianceReport {
    /// Any outstanding warning blocks automerge, whatever its severity.
    pub fn blocks_automerge(&self) -> bool {
        self.summary.warn > 0
    }
}
