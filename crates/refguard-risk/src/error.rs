use std::path::PathBuf;
use thiserror::Error;

/// Errors from the model backend. None of these reach callers of
/// [`crate::RiskClassifier::predict`]; they trigger the heuristic fallback.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("failed to load risk model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("risk model shape invalid: {0}")]
    InvalidModel(String),

    #[error("risk model inference failed: {0}")]
    Inference(String),

    #[error("risk model inference exceeded {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },
}
