use crate::workspace::ResolveError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to initialize {}: {source}", .project.display())]
    Initialize {
        project: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Baseline run failed for {}: {source}", .project.display())]
    Baseline {
        project: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Mutation run failed for {}: {source}", .project.display())]
    Transform {
        project: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub fn project(&self) -> &PathBuf {
        match self {
            PipelineError::Initialize { project, .. }
            | PipelineError::Baseline { project, .. }
            | PipelineError::Transform { project, .. } => project,
        }
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
