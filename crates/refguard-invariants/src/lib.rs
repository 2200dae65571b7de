//! Refguard Invariants: structural dependency-direction rules per domain.
//!
//! Each domain owns an ordered list of forbidden `(source, target)` edges. A
//! patch is flagged when its case-folded text mentions both ends of a rule.
//! This is a lexical proxy: the dependency graph is accepted like the other
//! gates accept it, but the match never inspects its edges.

#![deny(unsafe_code)]

use refguard_types::{DependencyGraph, Domain, GateVerdict, Violation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Violation kind emitted for every matched rule.
pub const FORBIDDEN_EDGE: &str = "forbidden-edge";

/// A dependency direction that must not be introduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenEdge {
    pub source: String,
    pub target: String,
}

impl ForbiddenEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into().to_lowercase(),
            target: target.into().to_lowercase(),
        }
    }

    fn matches(&self, folded_patch: &str) -> bool {
        folded_patch.contains(&self.source) && folded_patch.contains(&self.target)
    }

    fn describe(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }
}

/// Built-in forbidden edges for `domain`. Unknown domains have none.
pub fn builtin_rules(domain: &Domain) -> Vec<ForbiddenEdge> {
    match domain {
        // rendering must not reach into game AI
        Domain::Gaming => vec![ForbiddenEdge::new("graphics", "ai")],
        // UI must not drive device drivers directly
        Domain::Medical => vec![ForbiddenEdge::new("ui", "device")],
        // perception goes through middleware, not straight into control
        Domain::Robotics => vec![ForbiddenEdge::new("perception", "control")],
        _ => Vec::new(),
    }
}

/// Evaluates forbidden-edge rules against candidate patches.
#[derive(Debug, Clone, Default)]
pub struct InvariantGuard {
    overrides: Vec<(Domain, Vec<ForbiddenEdge>)>,
}

impl InvariantGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in rule list for one domain.
    pub fn with_rules(mut self, domain: Domain, rules: Vec<ForbiddenEdge>) -> Self {
        self.overrides.retain(|(d, _)| *d != domain);
        self.overrides.push((domain, rules));
        self
    }

    pub fn rules(&self, domain: &Domain) -> Vec<ForbiddenEdge> {
        self.overrides
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, rules)| rules.clone())
            .unwrap_or_else(|| builtin_rules(domain))
    }

    /// Check `patch_text` against the rules for `domain`.
    pub fn check(&self, _graph: &DependencyGraph, patch_text: &str, domain: &Domain) -> GateVerdict {
        let folded = patch_text.to_lowercase();
        let violations: Vec<Violation> = self
            .rules(domain)
            .iter()
            .filter(|rule| rule.matches(&folded))
            .map(|rule| Violation::new(FORBIDDEN_EDGE, rule.describe()))
            .collect();

        debug!(
            domain = %domain,
            violations = violations.len(),
            "invariant guard evaluated patch"
        );
        GateVerdict::from_violations(violations)
    }
}
