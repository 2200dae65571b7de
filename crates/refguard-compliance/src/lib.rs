//! Refguard Compliance: domain compliance catalogs.
//!
//! The engine is a manifest generator, not an auditor: it enumerates the
//! obligations a domain carries (plus one placeholder per caller-supplied
//! target) and marks each one `unknown`. Every finding counts as a warning, and
//! any warning blocks automerge downstream.

#![deny(unsafe_code)]

pub mod catalog;
pub mod engine;
pub mod error;

pub use catalog::{ComplianceCatalog, ComplianceRule};
pub use engine::{CatalogSource, ComplianceEngine};
pub use error::ComplianceError;
