//! Refguard Governor: decides which refactoring suggestions may merge on
//! their own.
//!
//! A [`Governor`] runs every suggestion through three independent gates
//! (structural invariants, patch risk, domain compliance), folds their verdicts
//! into one `can_automerge` flag, ranks the batch with the project's tuned
//! weights and records applied, flagged and reverted steps in the project's
//! hash-chained timeline.
//!
//! ```no_run
//! use refguard_governor::{GovernRequest, Governor, GovernorConfig};
//! use refguard_types::Suggestion;
//!
//! # async fn demo() -> Result<(), refguard_governor::GovernError> {
//! let governor = Governor::from_config(&GovernorConfig::default());
//! let ranked = governor
//!     .govern_suggestions(GovernRequest {
//!         suggestions: vec![Suggestion::new("Batch draw calls", "+ renderer.batch()", "fps")],
//!         domain: Some("gaming".into()),
//!         ..GovernRequest::default()
//!     })
//!     .await?;
//! assert_eq!(ranked.len(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod aggregator;
pub mod config;
pub mod detect;
pub mod error;
pub mod gate;
pub mod service;

pub use aggregator::DecisionAggregator;
pub use config::{ComplianceSettings, GovernorConfig, LoggingConfig};
pub use detect::detect_domain;
pub use error::{ErrorBody, GovernError, Stage};
pub use gate::{
    ComplianceGate, Gate, GateContext, GateError, GateInput, GateOutcome, GateReport,
    InvariantGate, RiskGate,
};
pub use service::{AppliedStep, GovernRequest, Governor};
