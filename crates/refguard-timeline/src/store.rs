use crate::chain::{self, ChainVerification};
use crate::error::TimelineError;
use crate::event::{NewEvent, TimelineEvent, TimelineListing};
use chrono::Utc;
use refguard_types::{ProjectId, ProjectLocks};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// File-backed timelines under `<data_dir>/timeline/`.
#[derive(Debug)]
pub struct Timeline {
    root: PathBuf,
    locks: ProjectLocks,
}

impl Timeline {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("timeline"),
            locks: ProjectLocks::new(),
        }
    }

    pub fn path_for(&self, project: &ProjectId) -> PathBuf {
        self.root.join(format!("{project}.jsonl"))
    }

    /// Chain `event` onto the project's log and append it.
    pub async fn append(
        &self,
        project: &ProjectId,
        event: NewEvent,
    ) -> Result<TimelineEvent, TimelineError> {
        let _guard = self.locks.lock(project).await;
        let path = self.path_for(project);

        let prev_hash = last_chain_hash(&path).await?;
        let event = event.finalize(prev_hash, Utc::now())?;
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| TimelineError::Io {
                path: self.root.clone(),
                source,
            })?;
        let io_err = |source| TimelineError::Io {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!(
            project = %project,
            kind = %event.kind,
            file = %event.file,
            chain_hash = %event.chain_hash,
            "timeline event appended"
        );
        Ok(event)
    }

    /// All parseable events in append order, plus summary rows.
    pub async fn list(&self, project: &ProjectId) -> Result<TimelineListing, TimelineError> {
        let lines = read_lines(&self.path_for(project)).await?;
        let mut events = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            match serde_json::from_str::<TimelineEvent>(line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(project = %project, line = i, error = %e, "skipping unreadable timeline line"),
            }
        }
        Ok(TimelineListing::from_events(events))
    }

    /// Recompute every hash and check `prev_hash` continuity.
    pub async fn verify(&self, project: &ProjectId) -> Result<ChainVerification, TimelineError> {
        let lines = read_lines(&self.path_for(project)).await?;
        let result = chain::verify_lines(&lines);
        if !result.valid {
            warn!(
                project = %project,
                index = ?result.first_invalid_index,
                reason = ?result.error_message,
                "timeline chain verification failed"
            );
        }
        Ok(result)
    }
}

/// Non-blank lines of the log; a missing log has none.
async fn read_lines(path: &Path) -> Result<Vec<String>, TimelineError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(TimelineError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `chain_hash` of the last line, or empty when the log is empty or that line
/// cannot be read.
async fn last_chain_hash(path: &Path) -> Result<String, TimelineError> {
    let lines = read_lines(path).await?;
    let Some(last) = lines.last() else {
        return Ok(String::new());
    };
    Ok(serde_json::from_str::<Value>(last)
        .ok()
        .and_then(|v| v.get("chain_hash").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use refguard_types::Domain;
    use serde_json::json;
    use std::sync::Arc;

    fn project() -> ProjectId {
        ProjectId::derive_from_str("/work/clinic-portal")
    }

    fn applied(i: usize) -> NewEvent {
        NewEvent::applied(
            format!("src/mod{i}.py"),
            Domain::Medical,
            format!("suggestion {i}"),
            json!({"risk": {"risk_score": 0.1, "ok": true}}),
            json!({"applied": true}),
        )
    }

    #[tokio::test]
    async fn empty_project_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::new(dir.path());
        let listing = timeline.list(&project()).await.unwrap();
        assert!(listing.events.is_empty());
        assert!(listing.summary.is_empty());
        assert!(timeline.verify(&project()).await.unwrap().valid);
    }

    #[tokio::test]
    async fn appends_form_a_chain() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::new(dir.path());
        for i in 0..6 {
            timeline.append(&project(), applied(i)).await.unwrap();
        }

        let listing = timeline.list(&project()).await.unwrap();
        assert_eq!(listing.events.len(), 6);
        assert_eq!(listing.events[0].prev_hash, "");
        for pair in listing.events.windows(2) {
            assert_eq!(pair[1].prev_hash, pair[0].chain_hash);
        }
        for event in &listing.events {
            let payload = {
                let mut value = serde_json::to_value(event).unwrap();
                value.as_object_mut().unwrap().remove("chain_hash");
                serde_json::to_vec(&value).unwrap()
            };
            assert_eq!(chain::chain_hash(&event.prev_hash, &payload), event.chain_hash);
        }

        let verification = timeline.verify(&project()).await.unwrap();
        assert!(verification.valid);
        assert_eq!(verification.verified_entries, 6);
    }

    #[tokio::test]
    async fn model_scores_survive_verification() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::new(dir.path());
        for i in 0..40 {
            let logit = -6.0 + 0.37 * i as f64;
            let score = 1.0 / (1.0 + (-logit).exp());
            let event = NewEvent::applied(
                format!("src/mod{i}.py"),
                Domain::Medical,
                "model scored",
                json!({"risk": {"risk_score": score, "ok": score < 0.5}}),
                json!({"weights": [score / 3.0, score * 1.1]}),
            );
            timeline.append(&project(), event).await.unwrap();
            let verification = timeline.verify(&project()).await.unwrap();
            assert!(verification.valid, "score {score}: {:?}", verification.error_message);
        }

        for event in timeline.list(&project()).await.unwrap().events {
            assert_eq!(chain::hash_event(&event).unwrap(), event.chain_hash);
        }
    }

    #[tokio::test]
    async fn unreadable_lines_are_skipped_and_restart_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::new(dir.path());
        timeline.append(&project(), applied(0)).await.unwrap();

        let path = timeline.path_for(&project());
        let mut raw = std::fs::read_to_string(&path).unwrap();
        raw.push_str("{ truncated\n");
        std::fs::write(&path, raw).unwrap();

        let next = timeline
            .append(&project(), NewEvent::flagged("src/mod0.py", "regression"))
            .await
            .unwrap();
        assert_eq!(next.prev_hash, "");

        let listing = timeline.list(&project()).await.unwrap();
        assert_eq!(listing.events.len(), 2);
        assert_eq!(listing.summary[1].kind, EventKind::Flagged);

        let verification = timeline.verify(&project()).await.unwrap();
        assert!(!verification.valid);
        assert_eq!(verification.first_invalid_index, Some(1));
    }

    #[tokio::test]
    async fn tampering_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::new(dir.path());
        for i in 0..3 {
            timeline.append(&project(), applied(i)).await.unwrap();
        }
        let path = timeline.path_for(&project());
        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, raw.replace("suggestion 2", "suggestion X")).unwrap();

        let verification = timeline.verify(&project()).await.unwrap();
        assert!(!verification.valid);
        assert_eq!(verification.first_invalid_index, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_keep_the_chain_linear() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Arc::new(Timeline::new(dir.path()));
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let timeline = Arc::clone(&timeline);
                tokio::spawn(async move { timeline.append(&project(), applied(i)).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        let verification = timeline.verify(&project()).await.unwrap();
        assert!(verification.valid, "{:?}", verification.error_message);
        assert_eq!(verification.total_entries, 20);
    }

    #[tokio::test]
    async fn projects_have_separate_logs() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = Timeline::new(dir.path());
        let other = ProjectId::derive_from_str("/work/other");
        timeline.append(&project(), applied(0)).await.unwrap();
        let first_other = timeline
            .append(&other, NewEvent::reverted("x.c", "x.c.bak"))
            .await
            .unwrap();
        assert_eq!(first_other.prev_hash, "");
        assert_eq!(timeline.list(&other).await.unwrap().events.len(), 1);
    }
}
