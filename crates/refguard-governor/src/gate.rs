//! Gates: independent checks that each contribute one verdict per suggestion.

use async_trait::async_trait;
use refguard_compliance::{ComplianceEngine, ComplianceError};
use refguard_invariants::InvariantGuard;
use refguard_risk::RiskClassifier;
use refguard_types::{ComplianceReport, DependencyGraph, Domain, GateVerdict, RiskVerdict};
use std::path::Path;
use thiserror::Error;

/// Request-wide inputs shared by every suggestion in a batch.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub graph: Option<&'a DependencyGraph>,
    pub domain: &'a Domain,
    pub project_path: Option<&'a Path>,
    pub targets: &'a [String],
}

impl<'a> GateContext<'a> {
    pub fn input<'b>(&self, patch: &'b str) -> GateInput<'b>
    where
        'a: 'b,
    {
        GateInput {
            patch,
            graph: self.graph,
            domain: self.domain,
            project_path: self.project_path,
            targets: self.targets,
        }
    }
}

/// Everything a gate may look at for one suggestion. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub patch: &'a str,
    pub graph: Option<&'a DependencyGraph>,
    pub domain: &'a Domain,
    pub project_path: Option<&'a Path>,
    pub targets: &'a [String],
}

/// A verdict, tagged with the audit key it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub enum GateReport {
    Invariant(GateVerdict),
    Risk(RiskVerdict),
    Compliance(ComplianceReport),
}

impl GateReport {
    pub fn audit_key(&self) -> &'static str {
        match self {
            GateReport::Invariant(_) => "arch",
            GateReport::Risk(_) => "risk",
            GateReport::Compliance(_) => "compliance",
        }
    }

    pub fn blocks_automerge(&self) -> bool {
        match self {
            GateReport::Invariant(verdict) => !verdict.ok,
            GateReport::Risk(verdict) => verdict.blocks_automerge(),
            GateReport::Compliance(report) => report.blocks_automerge(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    #[error("{0}")]
    Internal(String),
}

/// Result of running one gate, as the aggregator records it.
#[derive(Debug)]
pub enum GateOutcome {
    Verdict(GateReport),
    /// A required input was absent.
    Skipped,
    Failed(GateError),
}

impl From<Result<Option<GateReport>, GateError>> for GateOutcome {
    fn from(result: Result<Option<GateReport>, GateError>) -> Self {
        match result {
            Ok(Some(report)) => GateOutcome::Verdict(report),
            Ok(None) => GateOutcome::Skipped,
            Err(err) => GateOutcome::Failed(err),
        }
    }
}

/// One governance check.
///
/// Gates run concurrently over the same read-only [`GateInput`]. Returning
/// `Ok(None)` means the gate had nothing to evaluate; an error is recorded on
/// the suggestion and does not block automerge.
#[async_trait]
pub trait Gate: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, input: &GateInput<'_>) -> Result<Option<GateReport>, GateError>;
}

/// Forbidden dependency directions. Skipped without a dependency graph.
#[derive(Debug, Clone, Default)]
pub struct InvariantGate {
    guard: InvariantGuard,
}

impl InvariantGate {
    pub fn new(guard: InvariantGuard) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl Gate for InvariantGate {
    fn name(&self) -> &'static str {
        "invariants"
    }

    async fn evaluate(&self, input: &GateInput<'_>) -> Result<Option<GateReport>, GateError> {
        Ok(input
            .graph
            .map(|graph| GateReport::Invariant(self.guard.check(graph, input.patch, input.domain))))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RiskGate {
    classifier: RiskClassifier,
}

impl RiskGate {
    pub fn new(classifier: RiskClassifier) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Gate for RiskGate {
    fn name(&self) -> &'static str {
        "risk"
    }

    async fn evaluate(&self, input: &GateInput<'_>) -> Result<Option<GateReport>, GateError> {
        let verdict = self
            .classifier
            .predict(input.graph, input.patch, input.domain)
            .await;
        Ok(Some(GateReport::Risk(verdict)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceGate {
    engine: ComplianceEngine,
}

impl ComplianceGate {
    pub fn new(engine: ComplianceEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Gate for ComplianceGate {
    fn name(&self) -> &'static str {
        "compliance"
    }

    async fn evaluate(&self, input: &GateInput<'_>) -> Result<Option<GateReport>, GateError> {
        let report = self
            .engine
            .check(input.domain, input.project_path, input.targets)?;
        Ok(Some(GateReport::Compliance(report)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(graph: Option<&'a DependencyGraph>, domain: &'a Domain) -> GateContext<'a> {
        GateContext {
            graph,
            domain,
            project_path: None,
            targets: &[],
        }
    }

    #[tokio::test]
    async fn invariant_gate_needs_a_graph() {
        let gate = InvariantGate::default();
        let domain = Domain::Medical;
        let ctx = context(None, &domain);
        let outcome: GateOutcome = gate.evaluate(&ctx.input("ui calls device")).await.into();
        assert!(matches!(outcome, GateOutcome::Skipped));

        let graph = DependencyGraph::new();
        let ctx = context(Some(&graph), &domain);
        let report = gate.evaluate(&ctx.input("ui calls device")).await.unwrap().unwrap();
        assert_eq!(report.audit_key(), "arch");
        assert!(report.blocks_automerge());
    }

    #[tokio::test]
    async fn risk_gate_always_reports() {
        let domain = Domain::Hpc;
        let report = RiskGate::default()
            .evaluate(&context(None, &domain).input("tidy loop"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.audit_key(), "risk");
        assert!(!report.blocks_automerge());
    }

    #[tokio::test]
    async fn compliance_catalog_failure_is_a_gate_error() {
        let gate = ComplianceGate::new(ComplianceEngine::from_file("/nonexistent/refguard/catalog.json"));
        let domain = Domain::Hpc;
        let outcome: GateOutcome = gate.evaluate(&context(None, &domain).input("p")).await.into();
        assert!(matches!(outcome, GateOutcome::Failed(GateError::Compliance(_))));
    }
}
