//! Workspace project model
//!
//! An [`AnalyzedProject`] is what the build analysis reports for one project
//! file: its path, the declared MSBuild properties and the project references.
//! Projects are [classified](classify) as under test or test projects and then
//! [matched](match_projects) into [`Pairing`]s.

pub mod classify;
pub mod matching;

pub use classify::{classify, ProjectKind, TEST_PROJECT_TYPE_GUID};
pub use matching::{match_projects, Pairing};

use crate::util::normalize_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// MSBuild property marking a project as a test project
pub const IS_TEST_PROJECT: &str = "IsTestProject";

/// Legacy MSBuild property listing project type GUIDs
pub const PROJECT_TYPE_GUIDS: &str = "ProjectTypeGuids";

/// Build metadata of a single project in a workspace
///
/// Identity is the (normalized) file path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedProject {
    file_path: PathBuf,
    properties: BTreeMap<String, String>,
    project_references: Vec<PathBuf>,
}

impl AnalyzedProject {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: normalize_path(file_path),
            properties: BTreeMap::new(),
            project_references: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Adds a reference, skipping paths that are already referenced
    pub fn with_reference(mut self, path: impl AsRef<Path>) -> Self {
        let path = normalize_path(path);
        if !self.project_references.contains(&path) {
            self.project_references.push(path);
        }
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn project_references(&self) -> &[PathBuf] {
        &self.project_references
    }

    pub fn references(&self, path: &Path) -> bool {
        self.project_references.iter().any(|r| r == path)
    }

    /// File name without extension, for display
    pub fn name(&self) -> &str {
        self.file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }
}

impl PartialEq for AnalyzedProject {
    fn eq(&self, other: &Self) -> bool {
        self.file_path == other.file_path
    }
}

impl Eq for AnalyzedProject {}

impl Hash for AnalyzedProject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_path.hash(state);
    }
}
