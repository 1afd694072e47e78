//! Shared fixtures for integration tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mutorch::analyzer::{AnalysisError, BuildAnalyzer, BuildManager};
use mutorch::pipeline::{
    ExecutionEnvironment, PipelineInitializer, PipelineInput, TransformEngine,
    TransformEngineFactory,
};
use mutorch::reporting::{ReportEvent, Reporter};
use mutorch::util::normalize_path;
use mutorch::WorkspaceConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;
use tempfile::TempDir;

pub const SOLUTION_NAME: &str = "Shop.sln";

/// A small .NET solution on disk
///
/// ```text
/// Shop.sln
/// src/Shop.Core       under test, referenced by both test projects
/// src/Shop.Api        under test, referenced by Shop.Api.Tests
/// src/Shop.Tools      under test, referenced by no one
/// tests/Shop.Core.Tests   IsTestProject via Microsoft.NET.Test.Sdk
/// tests/Shop.Api.Tests    IsTestProject=true
/// ```
pub struct SolutionFixture {
    pub dir: TempDir,
}

impl SolutionFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let fixture = Self { dir };

        fixture.write(
            SOLUTION_NAME,
            r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Shop.Core", "src\Shop.Core\Shop.Core.csproj", "{0A5B7C1E-0000-0000-0000-000000000001}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Shop.Api", "src\Shop.Api\Shop.Api.csproj", "{0A5B7C1E-0000-0000-0000-000000000002}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Shop.Tools", "src\Shop.Tools\Shop.Tools.csproj", "{0A5B7C1E-0000-0000-0000-000000000003}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "tests", "tests", "{0A5B7C1E-0000-0000-0000-000000000004}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Shop.Core.Tests", "tests\Shop.Core.Tests\Shop.Core.Tests.csproj", "{0A5B7C1E-0000-0000-0000-000000000005}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Shop.Api.Tests", "tests\Shop.Api.Tests\Shop.Api.Tests.csproj", "{0A5B7C1E-0000-0000-0000-000000000006}"
EndProject
Global
EndGlobal
"#,
        );

        fixture.write(
            "src/Shop.Core/Shop.Core.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>"#,
        );
        fixture.write(
            "src/Shop.Api/Shop.Api.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="..\Shop.Core\Shop.Core.csproj" />
  </ItemGroup>
</Project>"#,
        );
        fixture.write(
            "src/Shop.Tools/Shop.Tools.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net6.0</TargetFramework>
    <OutputType>Exe</OutputType>
  </PropertyGroup>
</Project>"#,
        );
        fixture.write(
            "tests/Shop.Core.Tests/Shop.Core.Tests.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.8.0" />
    <PackageReference Include="xunit" Version="2.6.2" />
  </ItemGroup>
  <ItemGroup>
    <ProjectReference Include="..\..\src\Shop.Core\Shop.Core.csproj" />
  </ItemGroup>
</Project>"#,
        );
        fixture.write(
            "tests/Shop.Api.Tests/Shop.Api.Tests.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="..\..\src\Shop.Api\Shop.Api.csproj" />
    <ProjectReference Include="..\..\src\Shop.Core\Shop.Core.csproj" />
  </ItemGroup>
</Project>"#,
        );

        fixture
    }

    pub fn root(&self) -> PathBuf {
        normalize_path(self.dir.path())
    }

    pub fn solution(&self) -> PathBuf {
        self.root().join(SOLUTION_NAME)
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn config(&self) -> WorkspaceConfig {
        WorkspaceConfig::new(self.root()).with_workspace_root(self.solution())
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
    }
}

/// Wraps an analyzer and counts how often a workspace is opened
pub struct CountingAnalyzer {
    inner: Arc<dyn BuildAnalyzer>,
    opens: AtomicUsize,
    open_threads: Mutex<Vec<ThreadId>>,
}

impl CountingAnalyzer {
    pub fn new(inner: Arc<dyn BuildAnalyzer>) -> Self {
        Self {
            inner,
            opens: AtomicUsize::new(0),
            open_threads: Mutex::new(Vec::new()),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Threads the workspace was opened on
    pub fn open_threads(&self) -> Vec<ThreadId> {
        self.open_threads.lock().unwrap().clone()
    }
}

impl BuildAnalyzer for CountingAnalyzer {
    fn open(&self, workspace_root: &Path) -> Result<Box<dyn BuildManager>, AnalysisError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.open_threads.lock().unwrap().push(thread::current().id());
        self.inner.open(workspace_root)
    }
}

/// Ordered log of collaborator calls, shared by the fakes below
#[derive(Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Initializer that records its calls and fails the baseline of one project
pub struct RecordingInitializer {
    pub log: Arc<CallLog>,
    pub failing_baseline: Option<String>,
}

impl RecordingInitializer {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            failing_baseline: None,
        }
    }

    pub fn failing_baseline_for(mut self, project_file_name: &str) -> Self {
        self.failing_baseline = Some(project_file_name.to_string());
        self
    }
}

#[async_trait]
impl PipelineInitializer for RecordingInitializer {
    async fn initialize(&self, config: &WorkspaceConfig) -> Result<PipelineInput> {
        let project = config
            .project_under_test
            .clone()
            .unwrap_or_else(|| config.root_path.clone());
        self.log.push(format!("initialize {}", file_name(&project)));

        Ok(PipelineInput::new(
            config.clone(),
            ExecutionEnvironment {
                project_under_test: project,
                test_projects: config.test_projects.clone(),
                test_runner: "vstest".to_string(),
            },
        ))
    }

    async fn baseline_run(&self, input: &PipelineInput, _config: &WorkspaceConfig) -> Result<Duration> {
        let name = file_name(&input.environment.project_under_test);
        self.log.push(format!("baseline {}", name));

        if self.failing_baseline.as_deref() == Some(name.as_str()) {
            return Err(anyhow!("3 of 12 tests failed in the initial test run"));
        }
        Ok(Duration::from_millis(800))
    }
}

pub struct RecordingEngineFactory {
    pub log: Arc<CallLog>,
}

impl TransformEngineFactory for RecordingEngineFactory {
    fn create(
        &self,
        input: &PipelineInput,
        reporter: Arc<dyn Reporter>,
        _config: &WorkspaceConfig,
    ) -> Box<dyn TransformEngine> {
        Box::new(RecordingEngine {
            log: Arc::clone(&self.log),
            reporter,
            project: input.environment.project_under_test.clone(),
        })
    }
}

struct RecordingEngine {
    log: Arc<CallLog>,
    reporter: Arc<dyn Reporter>,
    project: PathBuf,
}

#[async_trait]
impl TransformEngine for RecordingEngine {
    async fn run(&mut self, input: &mut PipelineInput) -> Result<()> {
        self.log.push(format!("transform {}", file_name(&self.project)));
        self.reporter.on_event(&ReportEvent::MutationRunComplete {
            project: self.project.clone(),
            mutants: 10,
            killed: 7,
            duration: input.mutant_timeout().unwrap_or_default(),
        });
        Ok(())
    }
}

/// Reporter that keeps every event
#[derive(Default)]
pub struct CollectingReporter(Mutex<Vec<ReportEvent>>);

impl CollectingReporter {
    pub fn events(&self) -> Vec<ReportEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl Reporter for CollectingReporter {
    fn on_event(&self, event: &ReportEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}
