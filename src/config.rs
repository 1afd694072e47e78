//! Workspace configuration
//!
//! A [`WorkspaceConfig`] describes one unit of work: the root path, the
//! optional solution file grouping the workspace, and the collection criteria
//! handed to the pipeline collaborators. Per-project configurations are
//! derived with [`WorkspaceConfig::for_project`], which clones the input and
//! overrides only the root path, the project under test and the test projects.
//!
//! Settings can also be read from a JSON config file:
//!
//! ```json
//! {
//!   "solution": "App.sln",
//!   "mutate": ["**/*.cs", "!**/Generated/*.cs"],
//!   "test-case-filter": "Category!=Slow",
//!   "target-framework": "net8.0",
//!   "concurrency": 4,
//!   "additional-timeout-ms": 5000
//! }
//! ```

use crate::util::normalize_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ADDITIONAL_TIMEOUT_MS: u64 = 5000;
const MAX_CONCURRENCY: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Root path does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Solution file does not exist: {0}")]
    SolutionNotFound(PathBuf),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What the pipeline collaborators should collect and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCriteria {
    /// Glob patterns of source files to mutate (`!` prefix excludes)
    pub mutate: Vec<String>,

    /// Test case filter passed to the test runner
    pub test_case_filter: Option<String>,

    /// Target framework to analyze multi-targeted projects for
    pub target_framework: Option<String>,

    /// Parallel test runners the engine may use
    pub concurrency: usize,

    /// Added on top of the calibrated baseline timeout
    pub additional_timeout: Duration,
}

impl Default for CollectionCriteria {
    fn default() -> Self {
        Self {
            mutate: Vec::new(),
            test_case_filter: None,
            target_framework: None,
            concurrency: default_concurrency(),
            additional_timeout: Duration::from_millis(DEFAULT_ADDITIONAL_TIMEOUT_MS),
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| (n.get() / 2).max(1))
        .unwrap_or(1)
}

/// Configuration of a workspace or of one derived project pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory (or, once derived, project file) the work is rooted at
    pub root_path: PathBuf,

    /// Solution file grouping the workspace's projects
    pub workspace_root: Option<PathBuf>,

    pub criteria: CollectionCriteria,

    /// Set only on configurations derived for a pairing
    pub project_under_test: Option<PathBuf>,

    /// Set only on configurations derived for a pairing
    pub test_projects: Vec<PathBuf>,
}

impl WorkspaceConfig {
    pub fn new(root_path: impl AsRef<Path>) -> Self {
        Self {
            root_path: normalize_path(root_path),
            workspace_root: None,
            criteria: CollectionCriteria::default(),
            project_under_test: None,
            test_projects: Vec::new(),
        }
    }

    pub fn with_workspace_root(mut self, workspace_root: impl AsRef<Path>) -> Self {
        self.workspace_root = Some(normalize_path(workspace_root));
        self
    }

    pub fn with_criteria(mut self, criteria: CollectionCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Clone of this configuration scoped to one project under test
    pub fn for_project(&self, project_under_test: &Path, test_projects: Vec<PathBuf>) -> Self {
        Self {
            root_path: project_under_test.to_path_buf(),
            project_under_test: Some(project_under_test.to_path_buf()),
            test_projects,
            ..self.clone()
        }
    }

    /// Whether this configuration was derived for a single pairing
    pub fn is_project_scoped(&self) -> bool {
        self.project_under_test.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root_path.exists() {
            return Err(ConfigError::RootNotFound(self.root_path.clone()));
        }

        if let Some(solution) = &self.workspace_root {
            if !solution.is_file() {
                return Err(ConfigError::SolutionNotFound(solution.clone()));
            }
        }

        if self.criteria.concurrency == 0 {
            return Err(ConfigError::ValidationFailed(
                "Concurrency must be at least 1".to_string(),
            ));
        }
        if self.criteria.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::ValidationFailed(format!(
                "Concurrency cannot exceed {}",
                MAX_CONCURRENCY
            )));
        }

        if self.criteria.mutate.iter().any(|p| p.trim().trim_start_matches('!').is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "Mutate patterns cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// On-disk configuration, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub solution: Option<PathBuf>,
    #[serde(default)]
    pub mutate: Vec<String>,
    pub test_case_filter: Option<String>,
    pub target_framework: Option<String>,
    pub concurrency: Option<usize>,
    pub additional_timeout_ms: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies the file's settings to `config`
    ///
    /// A relative `solution` is resolved against `base_dir`.
    pub fn apply(&self, mut config: WorkspaceConfig, base_dir: &Path) -> WorkspaceConfig {
        if let Some(solution) = &self.solution {
            config = config.with_workspace_root(base_dir.join(solution));
        }
        if !self.mutate.is_empty() {
            config.criteria.mutate = self.mutate.clone();
        }
        if self.test_case_filter.is_some() {
            config.criteria.test_case_filter = self.test_case_filter.clone();
        }
        if self.target_framework.is_some() {
            config.criteria.target_framework = self.target_framework.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.criteria.concurrency = concurrency;
        }
        if let Some(timeout) = self.additional_timeout_ms {
            config.criteria.additional_timeout = Duration::from_millis(timeout);
        }
        config
    }
}
