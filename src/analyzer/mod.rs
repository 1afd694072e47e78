//! Build analysis seam
//!
//! A [`BuildAnalyzer`] opens a workspace root and hands back a
//! [`BuildManager`] that knows the workspace's projects and can build each
//! into an [`AnalyzedProject`]. [`MsBuildAnalyzer`] is the file-based
//! implementation shipped with the crate.

pub mod msbuild;

pub use msbuild::MsBuildAnalyzer;

use crate::project::AnalyzedProject;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Workspace root not found: {0}")]
    WorkspaceNotFound(PathBuf),

    #[error("Failed to load project {path}: {reason}")]
    ProjectLoad { path: PathBuf, reason: String },

    #[error("Invalid project file {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} build failure(s), first: {}", .causes.len(), first_message(.causes))]
    Aggregate { causes: Vec<AnalysisError> },
}

fn first_message(causes: &[AnalysisError]) -> String {
    causes
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "<none>".to_string())
}

impl AnalysisError {
    /// Unwraps (possibly nested) aggregates down to their first cause
    ///
    /// An aggregate without causes is returned unchanged.
    pub fn into_root_cause(self) -> AnalysisError {
        match self {
            AnalysisError::Aggregate { causes } if !causes.is_empty() => causes
                .into_iter()
                .next()
                .map(AnalysisError::into_root_cause)
                .unwrap_or(AnalysisError::Aggregate { causes: Vec::new() }),
            other => other,
        }
    }
}

/// Handle over an opened workspace
pub trait BuildManager: Send + Sync {
    /// Project files discovered in the workspace, in discovery order
    fn projects(&self) -> Vec<PathBuf>;

    /// Builds one project
    ///
    /// Returns every build result the project produced; an empty vector means
    /// the build gave nothing usable.
    fn build(&self, project: &Path) -> Result<Vec<AnalyzedProject>, AnalysisError>;
}

/// Entry point of the build analysis
pub trait BuildAnalyzer: Send + Sync {
    fn open(&self, workspace_root: &Path) -> Result<Box<dyn BuildManager>, AnalysisError>;
}
