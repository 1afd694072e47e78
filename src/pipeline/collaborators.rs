//! Collaborators the pipeline hands work to
//!
//! The orchestration core decides grouping and order only. Building the
//! execution environment, running the baseline and the mutation engine itself
//! live behind these traits.

use super::input::PipelineInput;
use crate::config::WorkspaceConfig;
use crate::reporting::Reporter;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait PipelineInitializer: Send + Sync {
    /// Resolves the execution environment for a derived configuration
    async fn initialize(&self, config: &WorkspaceConfig) -> Result<PipelineInput>;

    /// Runs the unmodified tests once and returns the calibrated timeout
    async fn baseline_run(&self, input: &PipelineInput, config: &WorkspaceConfig) -> Result<Duration>;
}

/// Creates the transform-and-verify engine for one pairing
pub trait TransformEngineFactory: Send + Sync {
    fn create(
        &self,
        input: &PipelineInput,
        reporter: Arc<dyn Reporter>,
        config: &WorkspaceConfig,
    ) -> Box<dyn TransformEngine>;
}

#[async_trait]
pub trait TransformEngine: Send + Sync {
    /// Runs the full transform/verify cycle, reporting through the engine's sink
    async fn run(&mut self, input: &mut PipelineInput) -> Result<()>;
}
