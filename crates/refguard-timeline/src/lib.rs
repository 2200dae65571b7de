//! Refguard Timeline: tamper-evident record of applied, flagged and reverted
//! suggestions.
//!
//! Each project has one JSON-lines file at `<data_dir>/timeline/<project_id>.jsonl`.
//! Every event stores the previous event's `chain_hash` as its `prev_hash` and
//! its own `chain_hash = sha256(prev_hash || canonical_json(event))`, where the
//! canonical form is compact JSON with sorted keys and without `chain_hash`.
//!
//! Appends are serialized per project. Listing tolerates corrupt lines;
//! [`Timeline::verify`] reports them.

#![deny(unsafe_code)]

pub mod chain;
pub mod error;
pub mod event;
pub mod store;

pub use chain::{chain_hash, ChainVerification};
pub use error::TimelineError;
pub use event::{EventKind, NewEvent, SummaryRow, TimelineEvent, TimelineListing};
pub use store::Timeline;
