use refguard_types::{Domain, RiskProvider, RiskVerdict, Violation};

/// Score reported when no cue fires: evaluated, nothing found.
pub const BASELINE_RISK: f64 = 0.1;

const LAYER_CROSSING_SEVERITY: f64 = 0.7;
const DOMAIN_POLICY_SEVERITY: f64 = 0.6;

/// A layer crossing is suspected when any left term and any right term both
/// appear in the patch.
struct CrossingCue {
    name: &'static str,
    left: &'static [&'static str],
    right: &'static [&'static str],
}

const CROSSING_CUES: &[CrossingCue] = &[
    CrossingCue {
        name: "ui->data",
        left: &["ui", "view", "react"],
        right: &["db", "sql", "orm", "repository"],
    },
    CrossingCue {
        name: "control->hardware",
        left: &["control", "planner"],
        right: &["gpio", "spi", "i2c", "sensor"],
    },
    CrossingCue {
        name: "api->internal",
        left: &["api", "endpoint"],
        right: &["internal", "private"],
    },
];

/// Keyword-based classifier. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicBackend;

impl HeuristicBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, patch_text: &str, domain: &Domain) -> RiskVerdict {
        let text = patch_text.to_lowercase();
        let mut risk: f64 = 0.0;
        let mut violations = Vec::new();

        for cue in CROSSING_CUES {
            let left = cue.left.iter().any(|term| text.contains(term));
            let right = cue.right.iter().any(|term| text.contains(term));
            if left && right {
                violations.push(Violation::new("layer_crossing", cue.name));
                risk = risk.max(LAYER_CROSSING_SEVERITY);
            }
        }

        if *domain == Domain::Medical && (text.contains("print(") || text.contains("debug")) {
            violations.push(Violation::new(
                "domain_policy",
                "unstructured logging in medical domain",
            ));
            risk = risk.max(DOMAIN_POLICY_SEVERITY);
        }

        let score = if risk > 0.0 { risk } else { BASELINE_RISK };
        RiskVerdict::new(
            score,
            violations,
            RiskProvider::Heuristic,
            "Heuristic classifier evaluated potential boundary crossings.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_patch_scores_baseline() {
        let verdict = HeuristicBackend.predict("rename a local variable", &Domain::Gaming);
        assert_eq!(verdict.risk_score, BASELINE_RISK);
        assert!(verdict.ok);
        assert!(verdict.violations.is_empty());
        assert_eq!(verdict.provider, RiskProvider::Heuristic);
    }

    #[test]
    fn view_touching_sql_is_a_layer_crossing() {
        let verdict = HeuristicBackend.predict("Run raw SQL from the View layer", &Domain::Hpc);
        assert_eq!(verdict.risk_score, 0.7);
        assert!(!verdict.ok);
        assert_eq!(verdict.violations[0].detail, "ui->data");
    }

    #[test]
    fn medical_debug_logging_is_flagged() {
        let verdict = HeuristicBackend.predict("add debug output", &Domain::Medical);
        assert_eq!(verdict.risk_score, 0.6);
        assert_eq!(verdict.violations[0].kind, "domain_policy");

        let elsewhere = HeuristicBackend.predict("add debug output", &Domain::Gaming);
        assert_eq!(elsewhere.risk_score, BASELINE_RISK);
    }

    #[test]
    fn score_is_max_not_sum() {
        let verdict = HeuristicBackend.predict(
            "api endpoint reads private state; planner polls gpio; print(x)",
            &Domain::Medical,
        );
        assert_eq!(verdict.violations.len(), 3);
        assert_eq!(verdict.risk_score, 0.7);
    }
}
