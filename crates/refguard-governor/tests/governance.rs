use refguard_compliance::{CatalogSource, ComplianceCatalog, ComplianceEngine, ComplianceRule};
use refguard_governor::{
    AppliedStep, DecisionAggregator, GovernError, GovernRequest, Governor, GovernorConfig, Stage,
};
use refguard_invariants::InvariantGuard;
use refguard_risk::RiskClassifier;
use refguard_timeline::EventKind;
use refguard_tuning::{compare_benchmarks, BenchmarkResult, Feedback};
use refguard_types::{
    DependencyGraph, Domain, GraphError, GraphProvider, ImpactEstimate, RiskProvider, Suggestion,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn governor(data: &TempDir) -> Governor {
    Governor::new(data.path(), DecisionAggregator::default())
}

fn project_dir(file: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src").join(file), "pass\n").unwrap();
    dir
}

fn path_str(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

#[tokio::test]
async fn single_medical_rule_without_targets_blocks_automerge() {
    let data = tempfile::tempdir().unwrap();
    let mut catalog = ComplianceCatalog::empty();
    catalog.insert(
        Domain::Medical,
        vec![ComplianceRule::new("logging", "Structured logging for traceability.", "Audit failure")],
    );
    let governor = Governor::new(
        data.path(),
        DecisionAggregator::standard(
            InvariantGuard::new(),
            RiskClassifier::heuristic(),
            ComplianceEngine::new(CatalogSource::Static(catalog)),
        ),
    );

    let governed = governor
        .govern_suggestions(GovernRequest {
            suggestions: vec![Suggestion::new("Extract helper", "fn helper() {}", "duplication")],
            graph: Some(DependencyGraph::new()),
            domain: Some(Domain::Medical),
            ..GovernRequest::default()
        })
        .await
        .unwrap();

    let s = &governed[0];
    assert!(s.audit.arch.as_ref().unwrap().ok);
    assert!(s.audit.risk.as_ref().unwrap().ok);
    assert_eq!(s.audit.compliance.as_ref().unwrap().summary.warn, 1);
    assert!(!s.can_automerge);
}

#[tokio::test]
async fn domain_is_detected_from_project_layout() {
    let data = tempfile::tempdir().unwrap();
    let project = project_dir("patient_intake.py");

    let governed = governor(&data)
        .govern_suggestions(GovernRequest {
            suggestions: vec![Suggestion::new("m", "add debug print", "r")],
            project_path: Some(project.path().to_path_buf()),
            ..GovernRequest::default()
        })
        .await
        .unwrap();

    let audit = &governed[0].audit;
    assert_eq!(audit.compliance.as_ref().unwrap().domain, Domain::Medical);
    assert_eq!(audit.risk.as_ref().unwrap().risk_score, 0.6);
    assert_eq!(audit.risk.as_ref().unwrap().provider, RiskProvider::Heuristic);
    assert!(audit.arch.is_none());
}

#[tokio::test]
async fn ranking_follows_tuning_and_is_idempotent() {
    let data = tempfile::tempdir().unwrap();
    let project = project_dir("main.py");
    let governor = governor(&data);

    let request = GovernRequest {
        suggestions: vec![
            Suggestion::new("slower", "a", "r").with_projected_impact("runtime", ImpactEstimate::runtime(4.0)),
            Suggestion::new("faster", "b", "r").with_projected_impact("runtime", ImpactEstimate::runtime(-8.0)),
            Suggestion::new("neutral", "c", "r"),
        ],
        domain: Some(Domain::parse("unlisted")),
        project_path: Some(project.path().to_path_buf()),
        ..GovernRequest::default()
    };

    let ranked = governor.govern_suggestions(request.clone()).await.unwrap();
    let order: Vec<_> = ranked.iter().map(|s| s.message.as_str()).collect();
    assert_eq!(order, ["faster", "neutral", "slower"]);
    assert!(ranked.iter().all(|s| s.can_automerge));

    let again = governor
        .govern_suggestions(GovernRequest {
            suggestions: ranked.clone(),
            ..request.clone()
        })
        .await
        .unwrap();
    assert_eq!(again, ranked);

    governor.set_tuning_enabled(&path_str(&project), false).await.unwrap();
    let unranked = governor.govern_suggestions(request).await.unwrap();
    let order: Vec<_> = unranked.iter().map(|s| s.message.as_str()).collect();
    assert_eq!(order, ["slower", "faster", "neutral"]);
    assert!(unranked.iter().all(|s| s.audit.rank_score.is_none()));
}

#[tokio::test]
async fn feedback_adjusts_persisted_weights() {
    let data = tempfile::tempdir().unwrap();
    let governor = governor(&data);
    let project = "/work/arcade";

    let state = governor
        .submit_feedback(project, Feedback::accepted(Some(5.0), 0))
        .await
        .unwrap();
    assert!((state.weights.runtime - 1.05).abs() < 1e-9);

    let cmp = compare_benchmarks(
        &BenchmarkResult::new("control_loop_jitter_ms", 3.0),
        &BenchmarkResult::new("control_loop_jitter_ms", 2.4),
    )
    .unwrap();
    let state = governor
        .submit_feedback(project, cmp.feedback(true, 1))
        .await
        .unwrap();
    // +0.05 for the improvement, -0.05 for the warning
    assert!((state.weights.runtime - 1.05).abs() < 1e-9);
    assert!((state.weights.compliance - 1.10).abs() < 1e-9);

    let reloaded = governor.get_tuning_state(project).await.unwrap();
    assert_eq!(reloaded, state);

    let reset = governor.reset_tuning(project).await.unwrap();
    assert_eq!(reset.weights.runtime, 1.0);
}

#[tokio::test]
async fn timeline_records_applied_flagged_and_reverted_steps() {
    let data = tempfile::tempdir().unwrap();
    let governor = governor(&data);
    let project = "/work/rover";

    let empty = governor.list_timeline(project).await.unwrap();
    assert!(empty.events.is_empty() && empty.summary.is_empty());

    let governed = governor
        .govern_suggestions(GovernRequest {
            suggestions: vec![Suggestion::new("Clamp sensor outliers", "x = clamp(x)", "numerics")],
            domain: Some(Domain::Robotics),
            ..GovernRequest::default()
        })
        .await
        .unwrap();
    let step = AppliedStep::from_suggestion("nav/filter.py", Domain::Robotics, &governed[0], json!({"applied": true}));
    let applied = governor.record_applied(project, step).await.unwrap();
    assert_eq!(applied.cues["compliance"]["warn"], 2);

    governor.flag_step(project, "nav/filter.py", "drift after merge").await.unwrap();
    let reverted = governor
        .record_revert(project, "nav/filter.py", "nav/filter.py.bak")
        .await
        .unwrap();

    let listing = governor.list_timeline(project).await.unwrap();
    let kinds: Vec<_> = listing.summary.iter().map(|row| row.kind).collect();
    assert_eq!(kinds, [EventKind::Applied, EventKind::Flagged, EventKind::Reverted]);
    assert_eq!(listing.events[2], reverted);
    assert_eq!(listing.events[1].prev_hash, applied.chain_hash);

    let verification = governor.verify_timeline(project).await.unwrap();
    assert!(verification.valid);
    assert_eq!(verification.verified_entries, 3);
}

#[tokio::test]
async fn long_chains_verify() {
    let data = tempfile::tempdir().unwrap();
    let governor = governor(&data);
    for i in 0..25 {
        governor
            .flag_step("/work/long", &format!("f{i}.c"), "review")
            .await
            .unwrap();
    }
    let verification = governor.verify_timeline("/work/long").await.unwrap();
    assert!(verification.valid);
    assert_eq!(verification.total_entries, 25);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let data = tempfile::tempdir().unwrap();
    let governor = governor(&data);
    let err = governor.flag_step("/work/p", "", "why").await.unwrap_err();
    assert!(matches!(err, GovernError::InvalidInput(_)));
    let err = governor.list_timeline("").await.unwrap_err();
    assert!(matches!(err, GovernError::InvalidInput(_)));
}

#[tokio::test]
async fn persistence_failures_report_their_stage() {
    let scratch = tempfile::tempdir().unwrap();
    let blocker = scratch.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let governor = Governor::new(&blocker, DecisionAggregator::default());

    let err = governor.flag_step("/work/p", "f.c", "r").await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Timeline));
    assert_eq!(err.body().stage, Some(Stage::Timeline));

    let err = governor.set_tuning_enabled("/work/p", false).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Tuning));
}

#[tokio::test]
async fn configured_catalog_replaces_builtin() {
    let data = tempfile::tempdir().unwrap();
    let catalog = data.path().join("catalog.json");
    std::fs::write(
        &catalog,
        r#"{"gaming": [{"id": "frame-budget", "note": "Stay under 16ms.", "risk": "Jank"}]}"#,
    )
    .unwrap();

    let mut config = GovernorConfig::default();
    config.data_dir = data.path().to_path_buf();
    config.compliance.catalog_path = Some(catalog.clone());
    let governor = Governor::from_config(&config);

    let request = GovernRequest {
        suggestions: vec![Suggestion::new("m", "p", "r")],
        domain: Some(Domain::Gaming),
        compliance_targets: vec!["PEGI".into()],
        ..GovernRequest::default()
    };
    let governed = governor.govern_suggestions(request.clone()).await.unwrap();
    let report = governed[0].audit.compliance.as_ref().unwrap();
    assert_eq!(report.findings[0].rule, "frame-budget");
    assert_eq!(report.findings[1].rule, "target:PEGI");
    assert_eq!(report.summary.warn, 2);

    // a broken catalog is a gate failure, not a request failure
    std::fs::write(&catalog, "{").unwrap();
    let governed = governor.govern_suggestions(request).await.unwrap();
    assert!(governed[0].audit.compliance.is_none());
    assert_eq!(governed[0].audit.gate_failures[0].gate, "compliance");
    assert!(governed[0].can_automerge);
}

struct FixedGraph;

impl GraphProvider for FixedGraph {
    fn scan(&self, project_path: &Path) -> Result<DependencyGraph, GraphError> {
        if !project_path.exists() {
            return Err(GraphError::PathNotFound(project_path.to_path_buf()));
        }
        Ok(DependencyGraph::from_edges([("ui", vec!["device"])]))
    }
}

#[tokio::test]
async fn graph_provider_enables_invariant_gate() {
    let data = tempfile::tempdir().unwrap();
    let project = project_dir("main.py");
    let governor = governor(&data).with_graph_provider(Arc::new(FixedGraph));

    let governed = governor
        .govern_suggestions(GovernRequest {
            suggestions: vec![Suggestion::new("m", "ui toggles device relay", "r")],
            domain: Some(Domain::Medical),
            project_path: Some(project.path().to_path_buf()),
            ..GovernRequest::default()
        })
        .await
        .unwrap();
    let arch = governed[0].audit.arch.as_ref().unwrap();
    assert!(!arch.ok);
    assert_eq!(arch.violations[0].detail, "ui->device");
}
