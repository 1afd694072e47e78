//! Per-pairing pipeline execution
//!
//! [`PipelineOrchestrator`] pulls configurations from the workspace resolver
//! one at a time and runs each through [`ProjectPipeline`]:
//! initialize → baseline run → transform-and-verify handoff.

pub mod collaborators;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod runner;

pub use collaborators::{PipelineInitializer, TransformEngine, TransformEngineFactory};
pub use error::{OrchestratorError, PipelineError};
pub use input::{ExecutionEnvironment, PipelineInput};
pub use orchestrator::{PipelineOrchestrator, ProjectRuns};
pub use runner::{PipelineHandle, ProjectPipeline};
