//! Refguard Risk: architectural risk scoring for candidate patches.
//!
//! Two backends share one contract, `predict(graph, patch, domain) -> RiskVerdict`:
//!
//! - **Model**: a small dense network loaded from a JSON artifact. It scores two
//!   normalized features (patch length, domain index) and maps the logit through
//!   a sigmoid. Inference runs on the blocking pool under a time budget.
//! - **Heuristic**: keyword co-occurrence cues for layer crossings plus
//!   domain-specific red flags. Deterministic and infallible.
//!
//! The backend is chosen once, when the [`RiskClassifier`] is built. A model that
//! fails to load leaves the classifier on the heuristic for its whole lifetime; a
//! model call that fails or times out is answered by the heuristic for that call
//! only, with the failure recorded in the verdict's `note`.

#![deny(unsafe_code)]

pub mod classifier;
pub mod error;
pub mod features;
pub mod heuristic;
pub mod model;

pub use classifier::{ClassifierConfig, RiskClassifier};
pub use error::RiskError;
pub use features::RiskFeatures;
pub use heuristic::HeuristicBackend;
pub use model::{DenseLayer, DenseRiskModel, ModelBackend, RiskModel};
