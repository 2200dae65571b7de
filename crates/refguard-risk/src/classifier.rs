use crate::error::RiskError;
use crate::features::RiskFeatures;
use crate::heuristic::HeuristicBackend;
use crate::model::{sigmoid, ModelBackend};
use refguard_types::{DependencyGraph, Domain, RiskProvider, RiskVerdict, Violation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Classifier settings, normally read once at service start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Model artifact. `None` selects the heuristic backend.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Time budget for one model inference.
    #[serde(default = "default_inference_timeout_ms")]
    pub inference_timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            inference_timeout_ms: default_inference_timeout_ms(),
        }
    }
}

fn default_inference_timeout_ms() -> u64 {
    250
}

#[derive(Debug, Clone)]
enum Backend {
    Model(ModelBackend),
    Heuristic,
}

/// Patch risk classifier with a backend resolved at construction.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    backend: Backend,
    heuristic: HeuristicBackend,
    inference_timeout: Duration,
}

impl RiskClassifier {
    /// Heuristic-only classifier.
    pub fn heuristic() -> Self {
        Self {
            backend: Backend::Heuristic,
            heuristic: HeuristicBackend::new(),
            inference_timeout: Duration::from_millis(default_inference_timeout_ms()),
        }
    }

    /// Classifier backed by an already-loaded model.
    pub fn with_model(model: ModelBackend, inference_timeout: Duration) -> Self {
        Self {
            backend: Backend::Model(model),
            heuristic: HeuristicBackend::new(),
            inference_timeout,
        }
    }

    /// Resolve the backend from configuration. A configured model that fails to
    /// load is logged and the classifier stays on the heuristic permanently.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let timeout = Duration::from_millis(config.inference_timeout_ms);
        let Some(path) = config.model_path.as_ref() else {
            info!("no risk model configured; using heuristic classifier");
            return Self {
                inference_timeout: timeout,
                ..Self::heuristic()
            };
        };

        match ModelBackend::load(path.clone()) {
            Ok(model) => {
                info!(model = %model.name(), "risk model loaded");
                Self::with_model(model, timeout)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "risk model unavailable; falling back to heuristic");
                Self {
                    inference_timeout: timeout,
                    ..Self::heuristic()
                }
            }
        }
    }

    pub fn provider(&self) -> RiskProvider {
        match self.backend {
            Backend::Model(_) => RiskProvider::Model,
            Backend::Heuristic => RiskProvider::Heuristic,
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match &self.backend {
            Backend::Model(model) => Some(model.name()),
            Backend::Heuristic => None,
        }
    }

    /// Score a patch. Never fails: model trouble degrades to the heuristic.
    pub async fn predict(
        &self,
        graph: Option<&DependencyGraph>,
        patch_text: &str,
        domain: &Domain,
    ) -> RiskVerdict {
        debug!(
            domain = %domain,
            provider = self.provider().as_str(),
            graph_modules = graph.map(DependencyGraph::len).unwrap_or(0),
            "classifying patch risk"
        );

        let Backend::Model(model) = &self.backend else {
            return self.heuristic.predict(patch_text, domain);
        };

        match self.infer(model, RiskFeatures::extract(patch_text, domain)).await {
            Ok(logit) => {
                let verdict = RiskVerdict::new(
                    sigmoid(logit),
                    Vec::new(),
                    RiskProvider::Model,
                    "Model predicted architectural risk from learned invariants.",
                )
                .with_model(model.name());
                if verdict.ok {
                    verdict
                } else {
                    let detail = format!("risk={:.2}", verdict.risk_score);
                    RiskVerdict {
                        violations: vec![Violation::new("model_predicted_risk", detail)],
                        ..verdict
                    }
                }
            }
            Err(err) => {
                warn!(model = %model.name(), error = %err, "risk model call failed; answering with heuristic");
                self.heuristic
                    .predict(patch_text, domain)
                    .with_note(format!("model_error: {err}"))
            }
        }
    }

    async fn infer(&self, model: &ModelBackend, features: RiskFeatures) -> Result<f64, RiskError> {
        let runner = model.model();
        let task = tokio::task::spawn_blocking(move || runner.logit(&features));
        // On timeout the blocking task is detached; its result is dropped.
        match tokio::time::timeout(self.inference_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(RiskError::Inference(format!("inference task aborted: {join}"))),
            Err(_) => Err(RiskError::Timeout {
                budget_ms: self.inference_timeout.as_millis() as u64,
            }),
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::heuristic()
    }
}
