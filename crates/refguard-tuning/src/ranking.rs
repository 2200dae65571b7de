use crate::state::{TuningState, TuningWeights};
use refguard_types::Suggestion;

const MEMORY_FACTOR: f64 = 0.5;
const COMPLIANCE_PENALTY: f64 = 10.0;
const ARCHITECTURE_PENALTY: f64 = 5.0;

/// Higher is better. Derived from the audit only, never from a previous
/// `rank_score`, so re-ranking an already ranked list changes nothing.
pub fn score(suggestion: &Suggestion, weights: &TuningWeights) -> f64 {
    let audit = &suggestion.audit;
    let impacts = audit.projected_impact.values();
    let runtime = mean(impacts.clone().filter_map(|i| i.runtime_pct));
    let memory = mean(impacts.filter_map(|i| i.memory_pct));

    let compliance_warn = audit
        .compliance
        .as_ref()
        .is_some_and(|c| c.summary.warn > 0);
    let arch_broken = audit.arch.as_ref().is_some_and(|a| !a.ok);

    // `0.0 -` keeps an all-zero score at +0.0 so total_cmp ties it with others.
    let mut score = 0.0 - (weights.runtime * runtime + MEMORY_FACTOR * weights.memory * memory);
    if compliance_warn {
        score -= COMPLIANCE_PENALTY * weights.compliance;
    }
    if arch_broken {
        score -= ARCHITECTURE_PENALTY * weights.architecture;
    }
    score
}

/// Stable sort, best first, recording each score in `audit.rank_score`.
/// Leaves the list untouched when tuning is disabled.
pub fn rank(suggestions: &mut [Suggestion], state: &TuningState) {
    if !state.enabled {
        return;
    }
    for suggestion in suggestions.iter_mut() {
        suggestion.audit.rank_score = Some(score(suggestion, &state.weights));
    }
    suggestions.sort_by(|a, b| {
        let a = a.audit.rank_score.unwrap_or(f64::NEG_INFINITY);
        let b = b.audit.rank_score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
