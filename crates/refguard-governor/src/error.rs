//! Error types for the governance service

use refguard_timeline::TimelineError;
use refguard_tuning::TuningError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Timeline,
    Tuning,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Timeline => "timeline",
            Stage::Tuning => "tuning",
        })
    }
}

#[derive(Debug, Error)]
pub enum GovernError {
    /// Missing or malformed request field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Project path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Tuning error: {0}")]
    Tuning(#[from] TuningError),

    /// A blocking filesystem task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Structured failure body: `{detail, stage?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

impl GovernError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            GovernError::Timeline(_) => Some(Stage::Timeline),
            GovernError::Tuning(_) => Some(Stage::Tuning),
            GovernError::InvalidInput(_) | GovernError::PathNotFound(_) | GovernError::Task(_) => None,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            detail: self.to_string(),
            stage: self.stage(),
        }
    }
}

pub type GovernResult<T> = Result<T, GovernError>;
