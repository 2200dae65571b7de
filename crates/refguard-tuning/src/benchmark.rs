use crate::error::TuningError;
use crate::state::Feedback;
use serde::{Deserialize, Serialize};

/// Metrics where a smaller value is an improvement.
pub const LOWER_IS_BETTER: &[&str] = &["slam_ate_m", "control_loop_jitter_ms", "inference_latency_ms"];

/// One benchmark observation as exposed by a runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub metric: String,
    pub value: f64,
}

impl BenchmarkResult {
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub metric: String,
    pub before: f64,
    pub after: f64,
    /// `after - before`, raw.
    pub delta: f64,
    pub improved: bool,
}

impl BenchmarkComparison {
    /// Delta oriented so that positive always means better. This is the value
    /// fed to tuning feedback as `benchmark_delta`.
    pub fn signed_improvement(&self) -> f64 {
        if is_lower_better(&self.metric) {
            -self.delta
        } else {
            self.delta
        }
    }

    /// Feedback for a suggestion whose effect this comparison measured.
    pub fn feedback(&self, accepted: bool, compliance_warn_count: u32) -> Feedback {
        Feedback {
            accepted,
            benchmark_delta: Some(self.signed_improvement()),
            compliance_warn_count,
        }
    }
}

pub fn compare_benchmarks(
    before: &BenchmarkResult,
    after: &BenchmarkResult,
) -> Result<BenchmarkComparison, TuningError> {
    if before.metric != after.metric {
        return Err(TuningError::Incomparable(format!(
            "{} vs {}",
            before.metric, after.metric
        )));
    }
    let delta = after.value - before.value;
    let improved = if is_lower_better(&before.metric) {
        delta < 0.0
    } else {
        delta > 0.0
    };
    Ok(BenchmarkComparison {
        metric: before.metric.clone(),
        before: before.value,
        after: after.value,
        delta,
        improved,
    })
}

fn is_lower_better(metric: &str) -> bool {
    LOWER_IS_BETTER.contains(&metric)
}
