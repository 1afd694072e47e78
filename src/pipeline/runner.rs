//! Fixed three-step pipeline for one project pairing

use super::collaborators::{PipelineInitializer, TransformEngine, TransformEngineFactory};
use super::error::PipelineError;
use super::input::PipelineInput;
use crate::config::WorkspaceConfig;
use crate::reporting::Reporter;
use crate::util::Logger;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of a completed pipeline, kept for later inspection by the caller
pub struct PipelineHandle {
    input: PipelineInput,
    engine: Box<dyn TransformEngine>,
}

impl PipelineHandle {
    pub fn input(&self) -> &PipelineInput {
        &self.input
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.input.config
    }

    pub fn into_parts(self) -> (PipelineInput, Box<dyn TransformEngine>) {
        (self.input, self.engine)
    }
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

/// Runs initialize → baseline → transform-and-verify for one configuration
pub struct ProjectPipeline {
    initializer: Arc<dyn PipelineInitializer>,
    engines: Arc<dyn TransformEngineFactory>,
    logger: Logger,
}

impl ProjectPipeline {
    pub fn new(
        initializer: Arc<dyn PipelineInitializer>,
        engines: Arc<dyn TransformEngineFactory>,
        logger: Logger,
    ) -> Self {
        Self {
            initializer,
            engines,
            logger,
        }
    }

    /// Runs the pipeline to completion
    ///
    /// Every step failure is fatal for this configuration; nothing is retried.
    pub async fn run_one(
        &self,
        config: WorkspaceConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<PipelineHandle, PipelineError> {
        self.logger.attach(self.run_steps(config, reporter)).await
    }

    async fn run_steps(
        &self,
        config: WorkspaceConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<PipelineHandle, PipelineError> {
        let project = subject_of(&config);
        let start = Instant::now();
        info!(project = %project.display(), "Starting project pipeline");

        let step_start = Instant::now();
        let mut input = self
            .initializer
            .initialize(&config)
            .await
            .map_err(|source| PipelineError::Initialize {
                project: project.clone(),
                source,
            })?;
        debug!(
            test_runner = %input.environment.test_runner,
            test_projects = input.environment.test_projects.len(),
            duration_ms = step_start.elapsed().as_millis(),
            "Initialize complete"
        );

        let step_start = Instant::now();
        let timeout = self
            .initializer
            .baseline_run(&input, &config)
            .await
            .map_err(|source| PipelineError::Baseline {
                project: project.clone(),
                source,
            })?;
        input.baseline_timeout = Some(timeout);
        debug!(
            timeout_ms = timeout.as_millis(),
            duration_ms = step_start.elapsed().as_millis(),
            "Baseline run complete"
        );

        let step_start = Instant::now();
        let mut engine = self.engines.create(&input, reporter, &config);
        engine
            .run(&mut input)
            .await
            .map_err(|source| PipelineError::Transform {
                project: project.clone(),
                source,
            })?;
        input.mutation_ready = true;
        debug!(
            duration_ms = step_start.elapsed().as_millis(),
            "Transform and verify complete"
        );

        info!(
            project = %project.display(),
            duration_ms = start.elapsed().as_millis(),
            "Project pipeline complete"
        );

        Ok(PipelineHandle { input, engine })
    }
}

/// Project a configuration is about, for error reporting
fn subject_of(config: &WorkspaceConfig) -> PathBuf {
    config
        .project_under_test
        .clone()
        .unwrap_or_else(|| config.root_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::ExecutionEnvironment;
    use crate::reporting::NoOpReporter;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Calls(Mutex<Vec<&'static str>>);

    impl Calls {
        fn push(&self, call: &'static str) {
            self.0.lock().unwrap().push(call);
        }

        fn recorded(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    struct StubInitializer {
        calls: Arc<Calls>,
        fail_initialize: bool,
        fail_baseline: bool,
    }

    #[async_trait]
    impl PipelineInitializer for StubInitializer {
        async fn initialize(&self, config: &WorkspaceConfig) -> Result<PipelineInput> {
            self.calls.push("initialize");
            if self.fail_initialize {
                return Err(anyhow!("no test runner found"));
            }
            Ok(PipelineInput::new(
                config.clone(),
                ExecutionEnvironment {
                    project_under_test: subject_of(config),
                    test_projects: config.test_projects.clone(),
                    test_runner: "vstest".to_string(),
                },
            ))
        }

        async fn baseline_run(&self, _input: &PipelineInput, _config: &WorkspaceConfig) -> Result<Duration> {
            self.calls.push("baseline");
            if self.fail_baseline {
                return Err(anyhow!("2 tests failed"));
            }
            Ok(Duration::from_millis(1500))
        }
    }

    struct StubEngine {
        calls: Arc<Calls>,
        fail: bool,
    }

    #[async_trait]
    impl TransformEngine for StubEngine {
        async fn run(&mut self, input: &mut PipelineInput) -> Result<()> {
            self.calls.push("run");
            assert!(input.baseline_timeout.is_some());
            if self.fail {
                return Err(anyhow!("compilation failed"));
            }
            Ok(())
        }
    }

    struct StubFactory {
        calls: Arc<Calls>,
        fail: bool,
    }

    impl TransformEngineFactory for StubFactory {
        fn create(
            &self,
            _input: &PipelineInput,
            _reporter: Arc<dyn Reporter>,
            _config: &WorkspaceConfig,
        ) -> Box<dyn TransformEngine> {
            self.calls.push("create");
            Box::new(StubEngine {
                calls: Arc::clone(&self.calls),
                fail: self.fail,
            })
        }
    }

    fn pipeline(calls: &Arc<Calls>, fail_initialize: bool, fail_baseline: bool, fail_engine: bool) -> ProjectPipeline {
        ProjectPipeline::new(
            Arc::new(StubInitializer {
                calls: Arc::clone(calls),
                fail_initialize,
                fail_baseline,
            }),
            Arc::new(StubFactory {
                calls: Arc::clone(calls),
                fail: fail_engine,
            }),
            Logger::disabled(),
        )
    }

    fn config() -> WorkspaceConfig {
        WorkspaceConfig::new("/repo").for_project(
            std::path::Path::new("/repo/App/App.csproj"),
            vec![PathBuf::from("/repo/App.Tests/App.Tests.csproj")],
        )
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let calls = Arc::new(Calls::default());
        let handle = pipeline(&calls, false, false, false)
            .run_one(config(), Arc::new(NoOpReporter))
            .await
            .unwrap();

        assert_eq!(calls.recorded(), vec!["initialize", "baseline", "create", "run"]);
        assert_eq!(handle.input().baseline_timeout, Some(Duration::from_millis(1500)));
        assert!(handle.input().mutation_ready);
        assert_eq!(handle.config(), &config());
    }

    #[tokio::test]
    async fn test_handle_keeps_engine_usable() {
        let calls = Arc::new(Calls::default());
        let handle = pipeline(&calls, false, false, false)
            .run_one(config(), Arc::new(NoOpReporter))
            .await
            .unwrap();

        let (mut input, mut engine) = handle.into_parts();
        engine.run(&mut input).await.unwrap();

        assert_eq!(calls.recorded(), vec!["initialize", "baseline", "create", "run", "run"]);
        assert_eq!(input.environment.test_runner, "vstest");
    }

    #[tokio::test]
    async fn test_initialize_failure_stops_pipeline() {
        let calls = Arc::new(Calls::default());
        let err = pipeline(&calls, true, false, false)
            .run_one(config(), Arc::new(NoOpReporter))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Initialize { .. }));
        assert_eq!(err.project(), &PathBuf::from("/repo/App/App.csproj"));
        assert_eq!(calls.recorded(), vec!["initialize"]);
    }

    #[tokio::test]
    async fn test_baseline_failure_is_not_retried() {
        let calls = Arc::new(Calls::default());
        let err = pipeline(&calls, false, true, false)
            .run_one(config(), Arc::new(NoOpReporter))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Baseline { .. }));
        assert!(err.to_string().contains("2 tests failed"));
        assert_eq!(calls.recorded(), vec!["initialize", "baseline"]);
    }

    #[tokio::test]
    async fn test_engine_failure() {
        let calls = Arc::new(Calls::default());
        let err = pipeline(&calls, false, false, true)
            .run_one(config(), Arc::new(NoOpReporter))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Transform { .. }));
        assert_eq!(calls.recorded(), vec!["initialize", "baseline", "create", "run"]);
    }

    #[test]
    fn test_subject_of_single_project_config() {
        let config = WorkspaceConfig::new("/repo/src/App");
        assert_eq!(subject_of(&config), PathBuf::from("/repo/src/App"));
    }
}
