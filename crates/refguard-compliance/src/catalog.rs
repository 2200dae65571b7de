use crate::error::ComplianceError;
use refguard_types::Domain;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One obligation in a domain catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub id: String,
    pub note: String,
    pub risk: String,
}

impl ComplianceRule {
    pub fn new(id: &str, note: &str, risk: &str) -> Self {
        Self {
            id: id.into(),
            note: note.into(),
            risk: risk.into(),
        }
    }
}

/// Domain → ordered rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceCatalog {
    rules: HashMap<Domain, Vec<ComplianceRule>>,
}

impl ComplianceCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(
            Domain::Gaming,
            vec![
                ComplianceRule::new("render-batch", "Prefer batching draw calls to improve FPS.", "Excessive per-frame allocations"),
                ComplianceRule::new("asset-io", "Avoid synchronous I/O on main thread.", "Frame stutter"),
            ],
        );
        catalog.insert(
            Domain::Robotics,
            vec![
                ComplianceRule::new("realtime", "Bound CPU to preserve control loop frequency.", "Control instability"),
                ComplianceRule::new("numerics", "Use stable solvers and clamp sensor outliers.", "Pose divergence"),
            ],
        );
        catalog.insert(
            Domain::Hpc,
            vec![
                ComplianceRule::new("vectorize", "Exploit SIMD/BLAS where possible.", "Low GFLOPS"),
                ComplianceRule::new("memory", "Ensure contiguous memory and cache-friendly access.", "Cache misses"),
            ],
        );
        catalog.insert(
            Domain::Medical,
            vec![
                ComplianceRule::new("latency", "Reduce end-to-end latency for critical paths.", "Spec violation"),
                ComplianceRule::new("logging", "Structured logging for traceability.", "Audit failure"),
            ],
        );
        catalog.insert(
            Domain::Satellite,
            vec![
                ComplianceRule::new("rt-control", "Maintain deterministic control loop timing with jitter bounds.", "Attitude/orbit control instability"),
                ComplianceRule::new("fault-tolerance", "Implement watchdogs and safe-mode fallbacks.", "Mission-critical failure"),
            ],
        );
        catalog.insert(
            Domain::Sustainability,
            vec![
                ComplianceRule::new("data-lineage", "Track data lineage and transformations for auditability.", "Unverifiable analytics"),
                ComplianceRule::new("throughput", "Ensure backpressure and batching in pipelines.", "Data loss or lag"),
            ],
        );
        catalog.insert(
            Domain::SpeechTherapy,
            vec![
                ComplianceRule::new("rt-audio", "Guarantee real-time audio processing latency budgets.", "Feedback delay"),
                ComplianceRule::new("pii", "Anonymize or protect voice data as PII.", "Privacy breach"),
            ],
        );
        catalog
    }

    /// Parse a JSON catalog of the form `{"<domain>": [{"id", "note", "risk"}, ..]}`.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, ComplianceError> {
        let parsed: BTreeMap<String, Vec<ComplianceRule>> =
            serde_json::from_str(raw).map_err(|e| ComplianceError::CatalogParse {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;
        let mut catalog = Self::empty();
        for (domain, rules) in parsed {
            catalog.insert(Domain::parse(&domain), rules);
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, ComplianceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ComplianceError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw, path)
    }

    pub fn insert(&mut self, domain: Domain, rules: Vec<ComplianceRule>) {
        self.rules.insert(domain, rules);
    }

    /// Rules for `domain`; unknown domains have none.
    pub fn rules(&self, domain: &Domain) -> &[ComplianceRule] {
        self.rules.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_known_domain() {
        let catalog = ComplianceCatalog::builtin();
        for domain in Domain::KNOWN {
            assert_eq!(catalog.rules(&domain).len(), 2, "{domain}");
        }
        assert!(catalog.rules(&Domain::parse("aerospace")).is_empty());
    }

    #[test]
    fn json_catalog_keys_are_parsed_as_domains() {
        let raw = r#"{"Medical": [{"id": "iec62304", "note": "Software lifecycle", "risk": "Recall"}]}"#;
        let catalog = ComplianceCatalog::from_json(raw, Path::new("inline")).unwrap();
        assert_eq!(catalog.rules(&Domain::Medical)[0].id, "iec62304");
        assert!(catalog.rules(&Domain::Gaming).is_empty());
    }

    #[test]
    fn malformed_json_is_reported_with_origin() {
        let err = ComplianceCatalog::from_json("[1,2]", Path::new("rules.json")).unwrap_err();
        assert!(err.to_string().contains("rules.json"));
    }
}
