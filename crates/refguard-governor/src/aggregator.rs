use crate::gate::{ComplianceGate, Gate, GateContext, GateOutcome, GateReport, InvariantGate, RiskGate};
use futures::future::join_all;
use refguard_compliance::ComplianceEngine;
use refguard_invariants::InvariantGuard;
use refguard_risk::RiskClassifier;
use refguard_types::{GateFailure, Suggestion};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the gates for a suggestion and folds their verdicts into its audit.
#[derive(Clone)]
pub struct DecisionAggregator {
    gates: Vec<Arc<dyn Gate>>,
}

impl DecisionAggregator {
    pub fn new(gates: Vec<Arc<dyn Gate>>) -> Self {
        Self { gates }
    }

    /// Invariant guard, risk classifier and compliance engine.
    pub fn standard(guard: InvariantGuard, classifier: RiskClassifier, compliance: ComplianceEngine) -> Self {
        Self::new(vec![
            Arc::new(InvariantGate::new(guard)),
            Arc::new(RiskGate::new(classifier)),
            Arc::new(ComplianceGate::new(compliance)),
        ])
    }

    pub fn gate_names(&self) -> Vec<&'static str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    /// Evaluate every gate concurrently, in registration order.
    pub async fn evaluate(&self, context: &GateContext<'_>, patch: &str) -> Vec<(&'static str, GateOutcome)> {
        let input = context.input(patch);
        let input = &input;
        join_all(self.gates.iter().map(|gate| async move {
            (gate.name(), GateOutcome::from(gate.evaluate(input).await))
        }))
        .await
    }

    /// Govern one suggestion: write each verdict under its audit key and
    /// decide `can_automerge`.
    ///
    /// Automerge starts allowed and is revoked by any blocking verdict.
    /// Skipped gates and gate failures never revoke it; failures are listed in
    /// `audit.gate_failures`.
    pub async fn govern(&self, suggestion: &mut Suggestion, context: &GateContext<'_>) {
        let outcomes = self.evaluate(context, &suggestion.patch).await;

        let mut can_automerge = true;
        for (gate, outcome) in outcomes {
            match outcome {
                GateOutcome::Verdict(report) => {
                    if report.blocks_automerge() {
                        can_automerge = false;
                    }
                    debug!(gate, key = report.audit_key(), blocks = report.blocks_automerge(), "gate verdict");
                    let audit = &mut suggestion.audit;
                    match report {
                        GateReport::Invariant(verdict) => audit.arch = Some(verdict),
                        GateReport::Risk(verdict) => audit.risk = Some(verdict),
                        GateReport::Compliance(report) => audit.compliance = Some(report),
                    }
                }
                GateOutcome::Skipped => debug!(gate, "gate skipped"),
                GateOutcome::Failed(err) => {
                    warn!(gate, error = %err, "gate failed; verdict omitted");
                    suggestion.audit.gate_failures.push(GateFailure {
                        gate: gate.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        suggestion.can_automerge = can_automerge;
    }
}

impl Default for DecisionAggregator {
    fn default() -> Self {
        Self::standard(InvariantGuard::new(), RiskClassifier::default(), ComplianceEngine::default())
    }
}

impl std::fmt::Debug for DecisionAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionAggregator")
            .field("gates", &self.gate_names())
            .finish()
    }
}
