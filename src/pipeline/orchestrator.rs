use super::collaborators::{PipelineInitializer, TransformEngineFactory};
use super::error::OrchestratorError;
use super::runner::{PipelineHandle, ProjectPipeline};
use crate::analyzer::BuildAnalyzer;
use crate::config::WorkspaceConfig;
use crate::reporting::Reporter;
use crate::util::Logger;
use crate::workspace::{ResolvedProjects, WorkspaceResolver};
use futures_util::stream::{self, Stream};
use std::sync::Arc;
use tracing::{error, info};

/// Resolves a workspace and runs one pipeline per project pairing
pub struct PipelineOrchestrator {
    resolver: WorkspaceResolver,
    pipeline: ProjectPipeline,
    logger: Logger,
}

impl PipelineOrchestrator {
    pub fn new(
        analyzer: Arc<dyn BuildAnalyzer>,
        initializer: Arc<dyn PipelineInitializer>,
        engines: Arc<dyn TransformEngineFactory>,
        logger: Logger,
    ) -> Self {
        Self {
            resolver: WorkspaceResolver::new(analyzer, logger.clone()),
            pipeline: ProjectPipeline::new(initializer, engines, logger.clone()),
            logger,
        }
    }

    pub fn resolver(&self) -> &WorkspaceResolver {
        &self.resolver
    }

    /// Lazy sequence of pipeline runs for `config`
    ///
    /// Nothing is analyzed until the first item is requested, and each request
    /// runs at most one pipeline.
    pub fn run_projects(&self, config: &WorkspaceConfig, reporter: Arc<dyn Reporter>) -> ProjectRuns<'_> {
        ProjectRuns {
            orchestrator: self,
            reporter,
            state: RunState::Pending(config.clone()),
            completed: 0,
        }
    }
}

enum RunState {
    Pending(WorkspaceConfig),
    Running(ResolvedProjects),
    Finished,
}

/// Pull-driven sequence of pipeline handles, one per pairing
///
/// After the first error the sequence ends; handles already returned stay valid.
pub struct ProjectRuns<'a> {
    orchestrator: &'a PipelineOrchestrator,
    reporter: Arc<dyn Reporter>,
    state: RunState,
    completed: usize,
}

impl<'a> ProjectRuns<'a> {
    /// Runs the next pairing's pipeline, or returns `None` when all are done
    ///
    /// The first call resolves the workspace on Tokio's blocking pool, so the
    /// returned future must be polled inside a Tokio runtime.
    pub async fn next(&mut self) -> Option<Result<PipelineHandle, OrchestratorError>> {
        let logger = self.orchestrator.logger.clone();

        if let RunState::Pending(config) = &self.state {
            let resolver = self.orchestrator.resolver.clone();
            let config = config.clone();
            // Analysis reads every project file from disk
            let resolved = match tokio::task::spawn_blocking(move || resolver.resolve(&config)).await {
                Ok(resolved) => resolved,
                Err(err) => std::panic::resume_unwind(err.into_panic()),
            };
            match resolved {
                Ok(resolved) => {
                    logger.scope(|| info!(mode = ?resolved.mode(), pairings = resolved.size_hint().0, "Workspace resolved"));
                    self.state = RunState::Running(resolved);
                }
                Err(err) => {
                    logger.scope(|| error!(error = %err, "Failed to resolve workspace"));
                    self.state = RunState::Finished;
                    return Some(Err(err.into()));
                }
            }
        }

        let RunState::Running(resolved) = &mut self.state else {
            return None;
        };

        let Some(config) = resolved.next() else {
            logger.scope(|| info!(completed = self.completed, "All project pipelines complete"));
            self.state = RunState::Finished;
            return None;
        };

        match self.orchestrator.pipeline.run_one(config, Arc::clone(&self.reporter)).await {
            Ok(handle) => {
                self.completed += 1;
                Some(Ok(handle))
            }
            Err(err) => {
                logger.scope(|| error!(error = %err, "Project pipeline failed"));
                self.state = RunState::Finished;
                Some(Err(err.into()))
            }
        }
    }

    /// Number of pipelines that completed so far
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Runs every remaining pairing, stopping at the first error
    pub async fn run_all(mut self) -> Result<Vec<PipelineHandle>, OrchestratorError> {
        let mut handles = Vec::new();
        while let Some(result) = self.next().await {
            handles.push(result?);
        }
        Ok(handles)
    }

    /// The same sequence as a [`Stream`]
    pub fn into_stream(self) -> impl Stream<Item = Result<PipelineHandle, OrchestratorError>> + 'a {
        stream::unfold(self, |mut runs| async move {
            let item = runs.next().await?;
            Some((item, runs))
        })
    }
}
