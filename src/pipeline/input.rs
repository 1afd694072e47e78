//! Per-pairing pipeline state

use crate::config::WorkspaceConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved execution setup of one pairing, produced by the initializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEnvironment {
    pub project_under_test: PathBuf,
    pub test_projects: Vec<PathBuf>,
    /// Identifier of the test runner the environment was built for
    pub test_runner: String,
}

/// State accumulated while a pairing moves through the pipeline
///
/// Created by initialize, completed by the baseline run and the
/// transform-and-verify handoff. Owned by exactly one pairing.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub config: WorkspaceConfig,
    pub environment: ExecutionEnvironment,
    pub baseline_timeout: Option<Duration>,
    pub mutation_ready: bool,
}

impl PipelineInput {
    pub fn new(config: WorkspaceConfig, environment: ExecutionEnvironment) -> Self {
        Self {
            config,
            environment,
            baseline_timeout: None,
            mutation_ready: false,
        }
    }

    /// Time budget for one mutant: calibrated baseline plus the configured margin
    pub fn mutant_timeout(&self) -> Option<Duration> {
        self.baseline_timeout
            .map(|baseline| baseline + self.config.criteria.additional_timeout)
    }
}
