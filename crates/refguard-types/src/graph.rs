use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Module dependency graph: module id → ordered list of the ids it depends on.
///
/// Keys are unique, cycles are allowed. The pipeline never mutates a graph once
/// it has been handed in; gates only receive `&DependencyGraph`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(module, dependencies)` pairs. A repeated module replaces the
    /// earlier entry.
    pub fn from_edges<I, K, V, D>(edges: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let mut graph = Self::new();
        for (module, deps) in edges {
            graph.insert(module, deps);
        }
        graph
    }

    pub fn insert<K, V, D>(&mut self, module: K, deps: V)
    where
        K: Into<String>,
        V: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.edges
            .insert(module.into(), deps.into_iter().map(Into::into).collect());
    }

    /// Dependencies of `module`, empty when the module is not present.
    pub fn dependencies(&self, module: &str) -> &[String] {
        self.edges.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Errors from a dependency graph provider.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("project path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("graph scan failed: {0}")]
    ScanFailed(String),
}

/// Source of dependency graphs. The module scanner lives outside this workspace.
pub trait GraphProvider: Send + Sync {
    /// Scan the project rooted at `project_path`.
    ///
    /// Must fail with [`GraphError::PathNotFound`] when the root does not exist.
    fn scan(&self, project_path: &Path) -> Result<DependencyGraph, GraphError>;
}
