//! mutorch - solution-aware orchestration of per-project mutation testing
//!
//! A .NET solution groups many projects. Some are production code, some are
//! test projects referencing them. This library classifies the projects,
//! pairs every project under test with the test projects that reference it,
//! and runs a fixed pipeline per pairing: initialize, baseline test run,
//! then transform-and-verify.
//!
//! # Core Concepts
//!
//! - **Workspace resolution**: a [`WorkspaceConfig`] is turned into the lazy
//!   sequence of per-pairing configurations by [`WorkspaceResolver`]
//! - **Build analysis**: project facts come from a [`BuildAnalyzer`]; the
//!   bundled [`MsBuildAnalyzer`] reads `.sln` and project files directly
//! - **Pipeline**: the initializer and transform engine are collaborators
//!   behind traits, driven one pairing at a time by [`PipelineOrchestrator`]
//!
//! # Example Usage
//!
//! ```ignore
//! use mutorch::{MsBuildAnalyzer, PipelineOrchestrator, RealFileSystem, WorkspaceConfig};
//! use mutorch::reporting::LoggingReporter;
//! use mutorch::util::{Logger, LoggingConfig};
//! use std::sync::Arc;
//!
//! async fn run(initializer: Arc<dyn mutorch::PipelineInitializer>,
//!              engines: Arc<dyn mutorch::TransformEngineFactory>) -> anyhow::Result<()> {
//!     let logger = Logger::from_config(&LoggingConfig::from_env());
//!     let analyzer = Arc::new(MsBuildAnalyzer::new(Arc::new(RealFileSystem)));
//!     let orchestrator = PipelineOrchestrator::new(analyzer, initializer, engines, logger.clone());
//!
//!     let config = WorkspaceConfig::new("/repo").with_workspace_root("/repo/App.sln");
//!     let mut runs = orchestrator.run_projects(&config, Arc::new(LoggingReporter));
//!     while let Some(handle) = runs.next().await {
//!         let handle = handle?;
//!         println!("ready: {}", handle.config().root_path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`project`]: classification and matching of analyzed projects
//! - [`analyzer`]: build analysis traits and the MSBuild file reader
//! - [`workspace`]: mode detection and the resolved project sequence
//! - [`pipeline`]: collaborator traits, the per-project runner and the orchestrator

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod fs;
pub mod pipeline;
pub mod project;
pub mod reporting;
pub mod util;
pub mod workspace;

pub use analyzer::{AnalysisError, BuildAnalyzer, BuildManager, MsBuildAnalyzer};
pub use config::{CollectionCriteria, ConfigError, ConfigFile, WorkspaceConfig};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use pipeline::{
    ExecutionEnvironment, OrchestratorError, PipelineError, PipelineHandle, PipelineInitializer,
    PipelineInput, PipelineOrchestrator, ProjectRuns, TransformEngine, TransformEngineFactory,
};
pub use project::{classify, match_projects, AnalyzedProject, Pairing, ProjectKind};
pub use reporting::{LoggingReporter, NoOpReporter, ReportEvent, Reporter};
pub use util::{Logger, LoggingConfig};
pub use workspace::{ResolveError, ResolvedProjects, WorkspaceMode, WorkspaceResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
