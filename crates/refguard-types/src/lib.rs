//! Refguard Types: shared vocabulary for the suggestion governance pipeline.
//!
//! Every other `refguard-*` crate speaks in these types:
//!
//! - [`Domain`] selects which rule catalogs apply to a request.
//! - [`DependencyGraph`] is the module adjacency produced by an external scanner.
//! - [`Suggestion`] carries a candidate patch and the [`SuggestionAudit`] that gates
//!   and ranking write into.
//! - [`GateVerdict`], [`RiskVerdict`] and [`ComplianceReport`] are the gate outputs.
//! - [`ProjectId`] keys durable per-project state; [`ProjectLocks`] serializes
//!   writers per project.

#![deny(unsafe_code)]

pub mod domain;
pub mod graph;
pub mod locks;
pub mod project;
pub mod suggestion;
pub mod verdict;

pub use domain::Domain;
pub use graph::{DependencyGraph, GraphError, GraphProvider};
pub use locks::ProjectLocks;
pub use project::{ProjectId, ProjectIdError};
pub use suggestion::{GateFailure, ImpactEstimate, Suggestion, SuggestionAudit};
pub use verdict::{
    ComplianceFinding, ComplianceReport, ComplianceSummary, FindingStatus, GateVerdict,
    RiskProvider, RiskVerdict, Violation, RISK_THRESHOLD,
};
