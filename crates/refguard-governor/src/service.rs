//! The governance service facade.

use crate::aggregator::DecisionAggregator;
use crate::config::GovernorConfig;
use crate::detect::detect_domain;
use crate::error::{GovernError, GovernResult};
use crate::gate::GateContext;
use refguard_compliance::ComplianceEngine;
use refguard_invariants::InvariantGuard;
use refguard_risk::RiskClassifier;
use refguard_timeline::{ChainVerification, NewEvent, Timeline, TimelineEvent, TimelineListing};
use refguard_tuning::{rank, Feedback, TuningState, TuningStore};
use refguard_types::{DependencyGraph, Domain, GraphError, GraphProvider, ProjectId, Suggestion};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A batch of generated suggestions for one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernRequest {
    pub suggestions: Vec<Suggestion>,
    /// Module dependency graph. Without it the invariant gate is skipped,
    /// unless a graph provider is configured and `project_path` is set.
    #[serde(default)]
    pub graph: Option<DependencyGraph>,
    /// Detected from `project_path` when absent.
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub project_path: Option<PathBuf>,
    #[serde(default)]
    pub compliance_targets: Vec<String>,
}

/// An applied suggestion, as recorded in the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedStep {
    pub file: String,
    #[serde(default)]
    pub domain: Domain,
    pub patch_note: String,
    #[serde(default)]
    pub cues: Value,
    #[serde(default)]
    pub result: Value,
}

impl AppliedStep {
    /// Record a governed suggestion; its gate verdicts become the event cues.
    pub fn from_suggestion(file: impl Into<String>, domain: Domain, suggestion: &Suggestion, result: Value) -> Self {
        Self {
            file: file.into(),
            domain,
            patch_note: suggestion.message.clone(),
            cues: suggestion.audit.cues(),
            result,
        }
    }
}

/// Suggestion governance: gates, ranking, tuning and the audit timeline.
pub struct Governor {
    aggregator: DecisionAggregator,
    timeline: Timeline,
    tuning: TuningStore,
    graph_provider: Option<Arc<dyn GraphProvider>>,
}

impl Governor {
    pub fn new(data_dir: impl AsRef<Path>, aggregator: DecisionAggregator) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            aggregator,
            timeline: Timeline::new(data_dir),
            tuning: TuningStore::new(data_dir),
            graph_provider: None,
        }
    }

    /// Build the standard gate set from configuration. The risk backend is
    /// resolved here, once.
    pub fn from_config(config: &GovernorConfig) -> Self {
        let classifier = RiskClassifier::from_config(&config.risk);
        let compliance = match &config.compliance.catalog_path {
            Some(path) => ComplianceEngine::from_file(path),
            None => ComplianceEngine::builtin(),
        };
        info!(
            data_dir = %config.data_dir.display(),
            risk_provider = classifier.provider().as_str(),
            "governor initialized"
        );
        Self::new(
            &config.data_dir,
            DecisionAggregator::standard(InvariantGuard::new(), classifier, compliance),
        )
    }

    /// Scan project sources when a request carries no graph.
    pub fn with_graph_provider(mut self, provider: Arc<dyn GraphProvider>) -> Self {
        self.graph_provider = Some(provider);
        self
    }

    /// Gate, flag and rank a batch of suggestions.
    ///
    /// Ranking uses the project's tuning state; without a project path the
    /// default state applies and nothing is persisted.
    #[instrument(
        skip(self, request),
        fields(request_id = %Uuid::new_v4(), suggestions = request.suggestions.len())
    )]
    pub async fn govern_suggestions(&self, request: GovernRequest) -> GovernResult<Vec<Suggestion>> {
        let GovernRequest {
            mut suggestions,
            graph,
            domain,
            project_path,
            compliance_targets,
        } = request;

        // Path checks, the layout walk and the dependency scan touch the
        // filesystem; they run on the blocking pool.
        let (detected, scanned) = match project_path.clone() {
            Some(path) => {
                let detect = domain.is_none();
                let provider = if graph.is_none() { self.graph_provider.clone() } else { None };
                tokio::task::spawn_blocking(move || inspect_project(&path, detect, provider.as_deref())).await??
            }
            None => (None, None),
        };
        let domain = domain.or(detected).unwrap_or_default();
        let graph = graph.or(scanned);

        let context = GateContext {
            graph: graph.as_ref(),
            domain: &domain,
            project_path: project_path.as_deref(),
            targets: &compliance_targets,
        };
        for suggestion in suggestions.iter_mut() {
            self.aggregator.govern(suggestion, &context).await;
        }

        let state = match &project_path {
            Some(path) => self.tuning.load(&ProjectId::derive(path)).await?,
            None => TuningState::default(),
        };
        rank(&mut suggestions, &state);

        info!(
            domain = %domain,
            automerge = suggestions.iter().filter(|s| s.can_automerge).count(),
            ranked = state.enabled,
            "suggestions governed"
        );
        Ok(suggestions)
    }

    #[instrument(skip(self, step), fields(file = %step.file))]
    pub async fn record_applied(&self, project: &str, step: AppliedStep) -> GovernResult<TimelineEvent> {
        let id = project_id(project)?;
        require("file", &step.file)?;
        let event = NewEvent::applied(step.file, step.domain, step.patch_note, step.cues, step.result);
        Ok(self.timeline.append(&id, event).await?)
    }

    #[instrument(skip(self))]
    pub async fn flag_step(&self, project: &str, file: &str, reason: &str) -> GovernResult<TimelineEvent> {
        let id = project_id(project)?;
        require("file", file)?;
        Ok(self.timeline.append(&id, NewEvent::flagged(file, reason)).await?)
    }

    #[instrument(skip(self))]
    pub async fn record_revert(&self, project: &str, file: &str, backup: &str) -> GovernResult<TimelineEvent> {
        let id = project_id(project)?;
        require("file", file)?;
        require("backup", backup)?;
        Ok(self.timeline.append(&id, NewEvent::reverted(file, backup)).await?)
    }

    pub async fn list_timeline(&self, project: &str) -> GovernResult<TimelineListing> {
        Ok(self.timeline.list(&project_id(project)?).await?)
    }

    pub async fn verify_timeline(&self, project: &str) -> GovernResult<ChainVerification> {
        Ok(self.timeline.verify(&project_id(project)?).await?)
    }

    pub async fn get_tuning_state(&self, project: &str) -> GovernResult<TuningState> {
        Ok(self.tuning.load(&project_id(project)?).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_tuning_enabled(&self, project: &str, enabled: bool) -> GovernResult<TuningState> {
        Ok(self.tuning.toggle(&project_id(project)?, enabled).await?)
    }

    #[instrument(skip(self))]
    pub async fn reset_tuning(&self, project: &str) -> GovernResult<TuningState> {
        Ok(self.tuning.reset(&project_id(project)?).await?)
    }

    #[instrument(skip(self))]
    pub async fn submit_feedback(&self, project: &str, feedback: Feedback) -> GovernResult<TuningState> {
        Ok(self.tuning.apply_feedback(&project_id(project)?, &feedback).await?)
    }
}

impl std::fmt::Debug for Governor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governor")
            .field("aggregator", &self.aggregator)
            .field("timeline", &self.timeline)
            .field("tuning", &self.tuning)
            .field("graph_provider", &self.graph_provider.is_some())
            .finish()
    }
}

fn project_id(project: &str) -> GovernResult<ProjectId> {
    require("project", project)?;
    Ok(ProjectId::derive_from_str(project))
}

fn require(field: &str, value: &str) -> GovernResult<()> {
    if value.trim().is_empty() {
        return Err(GovernError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate `path`, then detect its domain and scan its graph as requested.
fn inspect_project(
    path: &Path,
    detect: bool,
    provider: Option<&dyn GraphProvider>,
) -> GovernResult<(Option<Domain>, Option<DependencyGraph>)> {
    check_project_path(path)?;
    let domain = if detect { detect_domain(path) } else { None };
    let graph = match provider {
        Some(provider) => scan_graph(provider, path)?,
        None => None,
    };
    Ok((domain, graph))
}

fn scan_graph(provider: &dyn GraphProvider, path: &Path) -> GovernResult<Option<DependencyGraph>> {
    match provider.scan(path) {
        Ok(graph) => {
            if graph.is_empty() {
                debug!(path = %path.display(), "dependency scan found no modules");
            } else {
                debug!(path = %path.display(), modules = graph.len(), "dependency graph scanned");
            }
            Ok(Some(graph))
        }
        Err(GraphError::PathNotFound(path)) => Err(GovernError::PathNotFound(path)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "dependency scan failed; invariant gate will be skipped");
            Ok(None)
        }
    }
}

fn check_project_path(path: &Path) -> GovernResult<()> {
    if path.as_os_str().is_empty() {
        return Err(GovernError::InvalidInput("project_path must not be empty".into()));
    }
    if !path.exists() {
        return Err(GovernError::PathNotFound(path.to_path_buf()));
    }
    Ok(())
}
