use crate::analyzer::{AnalysisError, BuildAnalyzer};
use crate::config::WorkspaceConfig;
use crate::project::{classify, match_projects, AnalyzedProject, Pairing, ProjectKind};
use crate::util::{normalize_path, normalized_parent, Logger};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Build analysis failed: {0}")]
    Analysis(#[source] AnalysisError),
}

/// Unit of work a configuration describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Many projects grouped by a solution file
    Solution { solution: PathBuf },
    /// The configuration names a single project setup
    SingleProject,
}

impl WorkspaceMode {
    /// Solution mode applies when the solution file sits directly in the root path
    pub fn detect(config: &WorkspaceConfig) -> Self {
        match &config.workspace_root {
            Some(solution)
                if normalized_parent(solution).as_deref()
                    == Some(normalize_path(&config.root_path).as_path()) =>
            {
                WorkspaceMode::Solution {
                    solution: normalize_path(solution),
                }
            }
            _ => WorkspaceMode::SingleProject,
        }
    }
}

/// Classifies and pairs a workspace's projects
#[derive(Clone)]
pub struct WorkspaceResolver {
    analyzer: Arc<dyn BuildAnalyzer>,
    logger: Logger,
}

impl WorkspaceResolver {
    pub fn new(analyzer: Arc<dyn BuildAnalyzer>, logger: Logger) -> Self {
        Self { analyzer, logger }
    }

    /// Resolves `config` into per-pairing configurations
    ///
    /// In solution mode the whole solution is analyzed here; the returned
    /// iterator derives each configuration only when it is pulled. A systemic
    /// analysis failure is fatal; a single project that fails to build is
    /// skipped.
    pub fn resolve(&self, config: &WorkspaceConfig) -> Result<ResolvedProjects, ResolveError> {
        self.logger.scope(|| match WorkspaceMode::detect(config) {
            WorkspaceMode::Solution { solution } => {
                info!(solution = %solution.display(), "Resolving solution");
                let pairings = self.pairings(&solution)?;
                Ok(ResolvedProjects {
                    base: config.clone(),
                    mode: WorkspaceMode::Solution { solution },
                    source: Source::Pairings(pairings.into_iter()),
                })
            }
            WorkspaceMode::SingleProject => {
                debug!(root = %config.root_path.display(), "Resolving single project");
                Ok(ResolvedProjects {
                    base: config.clone(),
                    mode: WorkspaceMode::SingleProject,
                    source: Source::Single(true),
                })
            }
        })
    }

    /// Classified and matched pairings of a solution
    pub fn pairings(&self, solution: &Path) -> Result<Vec<Pairing>, ResolveError> {
        self.logger.scope(|| {
            let projects = self.analyze(solution)?;

            let (under_test, test_projects): (Vec<AnalyzedProject>, Vec<AnalyzedProject>) = projects
                .into_iter()
                .partition(|p| classify(p) == ProjectKind::UnderTest);

            info!(
                under_test = under_test.len(),
                test_projects = test_projects.len(),
                "Classified projects"
            );

            let pairings = match_projects(&under_test, &test_projects);

            for project in &under_test {
                if !pairings.iter().any(|p| &p.project_under_test == project) {
                    debug!(
                        project = %project.file_path().display(),
                        "No test project references this project, skipping"
                    );
                }
            }

            info!(pairings = pairings.len(), "Matched projects");
            Ok(pairings)
        })
    }

    /// Builds every project of the solution
    pub fn analyze(&self, solution: &Path) -> Result<Vec<AnalyzedProject>, ResolveError> {
        self.logger.scope(|| {
            let manager = self.analyzer.open(solution).map_err(systemic_failure)?;

            let mut analyzed = Vec::new();
            for project in manager.projects() {
                match manager.build(&project) {
                    Ok(results) => match results.into_iter().next() {
                        Some(result) => analyzed.push(result),
                        None => warn!(
                            project = %project.display(),
                            "Build produced no result, skipping project"
                        ),
                    },
                    Err(err @ AnalysisError::Aggregate { .. }) => {
                        return Err(systemic_failure(err));
                    }
                    Err(err) => warn!(
                        project = %project.display(),
                        error = %err,
                        "Failed to analyze project, skipping"
                    ),
                }
            }

            debug!(analyzed = analyzed.len(), "Analyzed projects");
            Ok(analyzed)
        })
    }
}

fn systemic_failure(err: AnalysisError) -> ResolveError {
    match err {
        AnalysisError::Aggregate { .. } => ResolveError::Analysis(err.into_root_cause()),
        other => ResolveError::Analysis(other),
    }
}

enum Source {
    Single(bool),
    Pairings(std::vec::IntoIter<Pairing>),
}

/// Configurations derived from a resolved workspace, produced on demand
pub struct ResolvedProjects {
    base: WorkspaceConfig,
    mode: WorkspaceMode,
    source: Source,
}

impl ResolvedProjects {
    pub fn mode(&self) -> &WorkspaceMode {
        &self.mode
    }
}

impl Iterator for ResolvedProjects {
    type Item = WorkspaceConfig;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            Source::Single(pending) => {
                if std::mem::take(pending) {
                    Some(self.base.clone())
                } else {
                    None
                }
            }
            Source::Pairings(pairings) => pairings.next().map(|pairing| {
                self.base.for_project(
                    pairing.project_under_test.file_path(),
                    pairing.test_project_paths(),
                )
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.source {
            Source::Single(pending) => usize::from(*pending),
            Source::Pairings(pairings) => pairings.len(),
        };
        (remaining, Some(remaining))
    }
}

impl std::fmt::Debug for ResolvedProjects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProjects")
            .field("mode", &self.mode)
            .field("remaining", &self.size_hint().0)
            .finish()
    }
}
