use crate::catalog::ComplianceCatalog;
use crate::error::ComplianceError;
use refguard_types::{ComplianceFinding, ComplianceReport, ComplianceSummary, Domain, FindingStatus};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the engine looks up domain rules.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// In-memory catalog (built-in or preloaded).
    Static(ComplianceCatalog),
    /// JSON file re-read on every check, so edits apply without a restart.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    source: CatalogSource,
}

impl ComplianceEngine {
    pub fn new(source: CatalogSource) -> Self {
        Self { source }
    }

    pub fn builtin() -> Self {
        Self::new(CatalogSource::Static(ComplianceCatalog::builtin()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(CatalogSource::File(path.into()))
    }

    /// Enumerate obligations for `domain` plus one placeholder per target.
    ///
    /// `project_path` is accepted for when findings get mapped to real project
    /// evidence; today it is only logged.
    pub fn check(
        &self,
        domain: &Domain,
        project_path: Option<&Path>,
        targets: &[String],
    ) -> Result<ComplianceReport, ComplianceError> {
        let loaded;
        let catalog = match &self.source {
            CatalogSource::Static(catalog) => catalog,
            CatalogSource::File(path) => {
                loaded = ComplianceCatalog::load(path)?;
                &loaded
            }
        };

        let mut findings: Vec<ComplianceFinding> = catalog
            .rules(domain)
            .iter()
            .map(|rule| ComplianceFinding {
                rule: rule.id.clone(),
                status: FindingStatus::Unknown,
                note: rule.note.clone(),
                risk: rule.risk.clone(),
            })
            .collect();

        findings.extend(targets.iter().map(|target| ComplianceFinding {
            rule: format!("target:{target}"),
            status: FindingStatus::Unknown,
            note: format!("Target {target} not formally checked."),
            risk: "Unknown".into(),
        }));

        let summary = ComplianceSummary {
            passed: 0,
            warn: findings.len(),
            failed: 0,
        };

        debug!(
            domain = %domain,
            project = ?project_path,
            findings = findings.len(),
            "compliance manifest generated"
        );

        Ok(ComplianceReport {
            domain: domain.clone(),
            targets: targets.to_vec(),
            findings,
            summary,
        })
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::builtin()
    }
}
