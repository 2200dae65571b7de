use crate::error::TuningError;
use crate::state::{Feedback, TuningState};
use refguard_types::{ProjectId, ProjectLocks};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed tuning state, one JSON file per project.
///
/// Reads never create files: a missing record yields defaults. A record that
/// does not parse also yields defaults. Every mutation writes `<id>.json.tmp`
/// and renames it over the live file while holding the project's lock.
#[derive(Debug)]
pub struct TuningStore {
    root: PathBuf,
    locks: ProjectLocks,
}

impl TuningStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("tuning"),
            locks: ProjectLocks::new(),
        }
    }

    pub fn path_for(&self, project: &ProjectId) -> PathBuf {
        self.root.join(format!("{project}.json"))
    }

    pub async fn load(&self, project: &ProjectId) -> Result<TuningState, TuningError> {
        let path = self.path_for(project);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TuningState::default()),
            Err(source) => return Err(TuningError::Io { path, source }),
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(project = %project, error = %e, "unreadable tuning record; using defaults");
                Ok(TuningState::default())
            }
        }
    }

    pub async fn toggle(&self, project: &ProjectId, enabled: bool) -> Result<TuningState, TuningError> {
        self.mutate(project, |state| state.toggle(enabled)).await
    }

    pub async fn reset(&self, project: &ProjectId) -> Result<TuningState, TuningError> {
        self.mutate(project, TuningState::reset).await
    }

    pub async fn apply_feedback(
        &self,
        project: &ProjectId,
        feedback: &Feedback,
    ) -> Result<TuningState, TuningError> {
        self.mutate(project, |state| state.apply_feedback(feedback)).await
    }

    async fn mutate<F>(&self, project: &ProjectId, f: F) -> Result<TuningState, TuningError>
    where
        F: FnOnce(&mut TuningState),
    {
        let _guard = self.locks.lock(project).await;
        let mut state = self.load(project).await?;
        f(&mut state);
        self.save(project, &state).await?;
        debug!(project = %project, enabled = state.enabled, "tuning state persisted");
        Ok(state)
    }

    async fn save(&self, project: &ProjectId, state: &TuningState) -> Result<(), TuningError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| TuningError::Io {
                path: self.root.clone(),
                source,
            })?;

        let path = self.path_for(project);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| TuningError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| TuningError::Io { path, source })
    }
}
