use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("failed to read compliance catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compliance catalog {path} is malformed: {reason}")]
    CatalogParse { path: PathBuf, reason: String },
}
