//! Refguard Tuning: adaptive ranking weights per project.
//!
//! - [`TuningState`]: the enabled flag and four bounded weights, with the
//!   feedback transitions that nudge them.
//! - [`TuningStore`]: file-backed persistence under `<data_dir>/tuning/`, one
//!   JSON record per project, replaced atomically after every mutation.
//! - [`rank`]: orders governed suggestions by tuned weights and projected impact.
//! - [`compare_benchmarks`]: turns a before/after benchmark pair into the signed
//!   delta that feedback consumes.

#![deny(unsafe_code)]

pub mod benchmark;
pub mod error;
pub mod ranking;
pub mod state;
pub mod store;

pub use benchmark::{compare_benchmarks, BenchmarkComparison, BenchmarkResult, LOWER_IS_BETTER};
pub use error::TuningError;
pub use ranking::{rank, score};
pub use state::{Feedback, TuningState, TuningWeights, WEIGHT_MAX, WEIGHT_MIN};
pub use store::TuningStore;
