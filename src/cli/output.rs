//! Output formatting for `mutorch plan`

use crate::config::WorkspaceConfig;
use crate::workspace::WorkspaceMode;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

/// What a resolve produced: the mode and one entry per derived configuration
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    #[serde(flatten)]
    pub mode: WorkspaceMode,
    pub projects: Vec<PlannedProject>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedProject {
    pub root_path: PathBuf,
    pub project_under_test: Option<PathBuf>,
    pub test_projects: Vec<PathBuf>,
}

impl Plan {
    pub fn new(mode: WorkspaceMode, configs: impl IntoIterator<Item = WorkspaceConfig>) -> Self {
        let projects = configs
            .into_iter()
            .map(|config| PlannedProject {
                root_path: config.root_path,
                project_under_test: config.project_under_test,
                test_projects: config.test_projects,
            })
            .collect();
        Self { mode, projects }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_plan(&self, plan: &Plan) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(plan).context("Failed to serialize plan to JSON")
            }
            OutputFormat::Human => Ok(Self::format_plan_human(plan)),
        }
    }

    fn format_plan_human(plan: &Plan) -> String {
        let mut out = String::new();

        match &plan.mode {
            WorkspaceMode::Solution { solution } => {
                let _ = writeln!(out, "Solution: {}", solution.display());
            }
            WorkspaceMode::SingleProject => {
                let _ = writeln!(out, "Single project mode");
            }
        }

        if plan.projects.is_empty() {
            let _ = writeln!(out, "No project under test is referenced by a test project.");
            return out;
        }

        for project in &plan.projects {
            match &project.project_under_test {
                Some(under_test) => {
                    let _ = writeln!(out, "\n{}", under_test.display());
                    for test in &project.test_projects {
                        let _ = writeln!(out, "  tested by {}", test.display());
                    }
                }
                None => {
                    let _ = writeln!(out, "\n{} (resolved during initialization)", project.root_path.display());
                }
            }
        }

        out
    }
}
