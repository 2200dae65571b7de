use serde::{Deserialize, Serialize};

/// Lower clamp for every weight.
pub const WEIGHT_MIN: f64 = 0.5;
/// Upper clamp for every weight.
pub const WEIGHT_MAX: f64 = 2.0;

const RUNTIME_STEP: f64 = 0.05;
const COMPLIANCE_STEP: f64 = 0.10;
const REJECTION_STEP: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningWeights {
    pub runtime: f64,
    pub memory: f64,
    pub compliance: f64,
    pub architecture: f64,
}

impl Default for TuningWeights {
    fn default() -> Self {
        Self {
            runtime: 1.0,
            memory: 1.0,
            compliance: 1.0,
            architecture: 1.0,
        }
    }
}

/// Per-project ranking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningState {
    pub enabled: bool,
    pub weights: TuningWeights,
}

impl Default for TuningState {
    fn default() -> Self {
        Self {
            enabled: true,
            weights: TuningWeights::default(),
        }
    }
}

/// Reviewer reaction to an applied (or declined) suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub accepted: bool,
    /// Signed benchmark improvement; positive is better.
    #[serde(default)]
    pub benchmark_delta: Option<f64>,
    #[serde(default, alias = "compliance_warn")]
    pub compliance_warn_count: u32,
}

impl Feedback {
    pub fn accepted(benchmark_delta: Option<f64>, compliance_warn_count: u32) -> Self {
        Self {
            accepted: true,
            benchmark_delta,
            compliance_warn_count,
        }
    }

    pub fn rejected() -> Self {
        Self::default()
    }
}

impl TuningState {
    pub fn toggle(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Nudge weights from one piece of feedback. No-op while disabled.
    ///
    /// Steps compound: an accepted suggestion with a positive delta and
    /// compliance warnings moves runtime up then back down.
    pub fn apply_feedback(&mut self, feedback: &Feedback) {
        if !self.enabled {
            return;
        }
        let w = &mut self.weights;

        if !feedback.accepted {
            w.runtime = lower(w.runtime, REJECTION_STEP);
            return;
        }

        match feedback.benchmark_delta {
            Some(delta) if delta > 0.0 => w.runtime = raise(w.runtime, RUNTIME_STEP),
            Some(delta) if delta < 0.0 => w.runtime = lower(w.runtime, RUNTIME_STEP),
            _ => {}
        }

        if feedback.compliance_warn_count > 0 {
            w.compliance = raise(w.compliance, COMPLIANCE_STEP);
            w.runtime = lower(w.runtime, RUNTIME_STEP);
        }
    }
}

fn raise(weight: f64, step: f64) -> f64 {
    (weight + step).min(WEIGHT_MAX)
}

fn lower(weight: f64, step: f64) -> f64 {
    (weight - step).max(WEIGHT_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn positive_benchmark_raises_runtime() {
        let mut state = TuningState::default();
        state.apply_feedback(&Feedback::accepted(Some(5.0), 0));
        assert!(close(state.weights.runtime, 1.05));
        assert_eq!(state.weights.compliance, 1.0);
    }

    #[test]
    fn compliance_warnings_compound_with_benchmark_step() {
        let mut state = TuningState::default();
        state.apply_feedback(&Feedback::accepted(Some(-1.0), 2));
        assert!(close(state.weights.runtime, 0.90));
        assert!(close(state.weights.compliance, 1.10));
    }

    #[test]
    fn zero_or_missing_delta_leaves_runtime() {
        let mut state = TuningState::default();
        state.apply_feedback(&Feedback::accepted(Some(0.0), 0));
        state.apply_feedback(&Feedback::accepted(None, 0));
        assert_eq!(state, TuningState::default());
    }

    #[test]
    fn rejection_trims_runtime() {
        let mut state = TuningState::default();
        state.apply_feedback(&Feedback::rejected());
        assert!(close(state.weights.runtime, 0.98));
    }

    #[test]
    fn disabled_state_ignores_feedback() {
        let mut state = TuningState::default();
        state.toggle(false);
        state.apply_feedback(&Feedback::accepted(Some(5.0), 3));
        assert_eq!(state.weights, TuningWeights::default());
        assert!(!state.enabled);
    }

    #[test]
    fn reset_restores_defaults_even_when_disabled() {
        let mut state = TuningState::default();
        state.apply_feedback(&Feedback::rejected());
        state.toggle(false);
        state.reset();
        assert_eq!(state, TuningState::default());
    }

    #[test]
    fn legacy_feedback_field_name_is_accepted() {
        let fb: Feedback =
            serde_json::from_str(r#"{"accepted": true, "benchmark_delta": 1.5, "compliance_warn": 2}"#)
                .unwrap();
        assert_eq!(fb.compliance_warn_count, 2);
    }

    #[test]
    fn thousand_positive_feedbacks_saturate() {
        let mut state = TuningState::default();
        for _ in 0..1000 {
            state.apply_feedback(&Feedback::accepted(Some(1.0), 0));
        }
        assert!(state.weights.runtime <= WEIGHT_MAX);
        assert!(close(state.weights.runtime, WEIGHT_MAX));
    }

    fn feedback() -> impl Strategy<Value = Feedback> {
        (any::<bool>(), proptest::option::of(-100.0f64..100.0), 0u32..5).prop_map(
            |(accepted, benchmark_delta, compliance_warn_count)| Feedback {
                accepted,
                benchmark_delta,
                compliance_warn_count,
            },
        )
    }

    proptest! {
        #[test]
        fn weights_stay_clamped(seq in proptest::collection::vec(feedback(), 0..300)) {
            let mut state = TuningState::default();
            for fb in &seq {
                state.apply_feedback(fb);
                let w = state.weights;
                for value in [w.runtime, w.memory, w.compliance, w.architecture] {
                    prop_assert!((WEIGHT_MIN..=WEIGHT_MAX).contains(&value));
                }
            }
        }
    }
}
