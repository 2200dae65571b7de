use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Stable identifier keying all durable per-project state.
///
/// The first [`ProjectId::WIDTH`] hex characters of SHA-256 over the project
/// path string. The same path always maps to the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProjectIdError {
    #[error("project id must be {expected} hex characters, got {actual:?}")]
    Malformed { expected: usize, actual: String },
}

impl ProjectId {
    pub const WIDTH: usize = 16;

    /// Derive the id for a project path.
    pub fn derive(project_path: impl AsRef<Path>) -> Self {
        Self::derive_from_str(&project_path.as_ref().to_string_lossy())
    }

    pub fn derive_from_str(project_path: &str) -> Self {
        let digest = Sha256::digest(project_path.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(Self::WIDTH);
        ProjectId(encoded)
    }

    /// Accept an already-derived id (e.g. from a file name or CLI flag).
    pub fn parse(raw: &str) -> Result<Self, ProjectIdError> {
        let raw = raw.trim();
        if raw.len() == Self::WIDTH && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(ProjectId(raw.to_ascii_lowercase()))
        } else {
            Err(ProjectIdError::Malformed {
                expected: Self::WIDTH,
                actual: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derive_matches_known_digest() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb924...
        assert_eq!(ProjectId::derive_from_str("").as_str(), "e3b0c44298fc1c14");
    }

    #[test]
    fn path_and_str_derivations_agree() {
        let from_path = ProjectId::derive(Path::new("/work/game-engine"));
        let from_str = ProjectId::derive_from_str("/work/game-engine");
        assert_eq!(from_path, from_str);
    }

    #[test]
    fn different_paths_get_different_ids() {
        assert_ne!(
            ProjectId::derive_from_str("/work/a"),
            ProjectId::derive_from_str("/work/b")
        );
    }

    #[test]
    fn parse_rejects_wrong_width() {
        assert!(ProjectId::parse("abc").is_err());
        assert!(ProjectId::parse("zzzzzzzzzzzzzzzz").is_err());
        assert_eq!(
            ProjectId::parse("E3B0C44298FC1C14").unwrap().as_str(),
            "e3b0c44298fc1c14"
        );
    }

    proptest! {
        #[test]
        fn derived_ids_are_fixed_width_and_parseable(path in ".{0,64}") {
            let id = ProjectId::derive_from_str(&path);
            prop_assert_eq!(id.as_str().len(), ProjectId::WIDTH);
            prop_assert_eq!(ProjectId::parse(id.as_str()).unwrap(), id.clone());
            prop_assert_eq!(ProjectId::derive_from_str(&path), id);
        }
    }
}
