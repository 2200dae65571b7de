use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("tuning store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tuning state serialization failed: {0}")]
    Serialization(String),

    #[error("benchmarks not comparable: {0}")]
    Incomparable(String),
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Serialization(err.to_string())
    }
}
