//! File-based MSBuild project analysis (C#, F#, VB)
//!
//! Reads `.sln` solutions and SDK-style or legacy project files directly. Only
//! static declarations are collected: properties from `<PropertyGroup>`
//! elements (conditions are not evaluated, later definitions win) and
//! `<ProjectReference>` items.

use super::{AnalysisError, BuildAnalyzer, BuildManager};
use crate::fs::FileSystem;
use crate::project::{AnalyzedProject, IS_TEST_PROJECT};
use crate::util::{normalize_path, resolve_relative};
use roxmltree::{Document, Node};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

/// Package whose build targets flag a project as a test project
const TEST_SDK_PACKAGE: &str = "Microsoft.NET.Test.Sdk";

pub struct MsBuildAnalyzer {
    fs: Arc<dyn FileSystem>,
    target_framework: Option<String>,
}

impl MsBuildAnalyzer {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            target_framework: None,
        }
    }

    /// Only projects targeting `target_framework` produce a build result
    pub fn with_target_framework(mut self, target_framework: Option<String>) -> Self {
        self.target_framework = target_framework;
        self
    }

    fn solution_projects(&self, solution: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
        let content = self.fs.read_to_string(solution).map_err(|e| AnalysisError::Aggregate {
            causes: vec![AnalysisError::ProjectLoad {
                path: solution.to_path_buf(),
                reason: e.to_string(),
            }],
        })?;

        let solution_dir = solution.parent().unwrap_or(Path::new(""));
        Ok(parse_solution_projects(&content)
            .iter()
            .map(|relative| resolve_relative(solution_dir, relative))
            .collect())
    }

    fn directory_projects(&self, root: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
        let files = self.fs.walk_files(root).map_err(|e| AnalysisError::ProjectLoad {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(files
            .into_iter()
            .filter(|path| is_project_file(path))
            .map(normalize_path)
            .collect())
    }
}

impl BuildAnalyzer for MsBuildAnalyzer {
    fn open(&self, workspace_root: &Path) -> Result<Box<dyn BuildManager>, AnalysisError> {
        let root = normalize_path(workspace_root);
        if !self.fs.exists(&root) {
            return Err(AnalysisError::WorkspaceNotFound(root));
        }

        let projects = if self.fs.is_file(&root) {
            self.solution_projects(&root)?
        } else {
            self.directory_projects(&root)?
        };

        info!(
            workspace = %root.display(),
            projects = projects.len(),
            "Opened workspace"
        );

        Ok(Box::new(MsBuildManager {
            fs: Arc::clone(&self.fs),
            target_framework: self.target_framework.clone(),
            projects,
        }))
    }
}

struct MsBuildManager {
    fs: Arc<dyn FileSystem>,
    target_framework: Option<String>,
    projects: Vec<PathBuf>,
}

impl BuildManager for MsBuildManager {
    fn projects(&self) -> Vec<PathBuf> {
        self.projects.clone()
    }

    fn build(&self, project: &Path) -> Result<Vec<AnalyzedProject>, AnalysisError> {
        let content = self
            .fs
            .read_to_string(project)
            .map_err(|e| AnalysisError::ProjectLoad {
                path: project.to_path_buf(),
                reason: e.to_string(),
            })?;

        let analyzed = parse_project(project, &content)?;

        if let Some(wanted) = &self.target_framework {
            let frameworks = target_frameworks(&analyzed);
            if !frameworks.iter().any(|f| f.eq_ignore_ascii_case(wanted)) {
                debug!(
                    project = %project.display(),
                    target_framework = %wanted,
                    "Project does not target the requested framework"
                );
                return Ok(Vec::new());
            }
        }

        Ok(vec![analyzed])
    }
}

/// Extracts project paths from solution `Project(...)` lines
///
/// Solution folders (entries without a project file extension) are skipped.
/// Paths are returned as written, with `\` normalized to `/`.
pub fn parse_solution_projects(solution_content: &str) -> Vec<String> {
    let mut projects = Vec::new();

    for line in solution_content.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with("Project(") {
            continue;
        }

        let parts: Vec<&str> = trimmed.split('"').collect();
        if parts.len() < 6 {
            continue;
        }

        let project_path = parts[5].replace('\\', "/");
        if is_project_file(Path::new(&project_path)) {
            projects.push(project_path);
        }
    }

    projects
}

/// Parses a project file into an [`AnalyzedProject`]
pub fn parse_project(path: &Path, content: &str) -> Result<AnalyzedProject, AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    };

    let doc = Document::parse(content).map_err(|e| invalid(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "Project" {
        return Err(invalid(format!(
            "expected <Project> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let project_dir = path.parent().unwrap_or(Path::new(""));
    let mut project = AnalyzedProject::new(path);
    let mut uses_test_sdk = false;

    let mut groups = Vec::new();
    evaluated_groups(root, &mut groups);

    for group in groups {
        let elements = group.children().filter(Node::is_element);
        match group.tag_name().name() {
            "PropertyGroup" => {
                for property in elements {
                    let value = property.text().map(str::trim).unwrap_or("");
                    project = project.with_property(property.tag_name().name(), value);
                }
            }
            _ => {
                for item in elements {
                    match item.tag_name().name() {
                        "ProjectReference" => {
                            let Some(include) = item.attribute("Include") else {
                                continue;
                            };
                            for reference in include.split(';').map(str::trim).filter(|r| !r.is_empty()) {
                                let expanded = expand_directory_properties(reference, project_dir);
                                if expanded.contains("$(") {
                                    warn!(
                                        project = %path.display(),
                                        reference = %reference,
                                        "Project reference uses an unsupported MSBuild property"
                                    );
                                }
                                project = project.with_reference(resolve_relative(project_dir, &expanded));
                            }
                        }
                        "PackageReference" => {
                            if item
                                .attribute("Include")
                                .is_some_and(|name| name.trim().eq_ignore_ascii_case(TEST_SDK_PACKAGE))
                            {
                                uses_test_sdk = true;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    if uses_test_sdk && project.property(IS_TEST_PROJECT).is_none() {
        project = project.with_property(IS_TEST_PROJECT, "true");
    }

    Ok(project)
}

/// Property and item groups applied at evaluation time, in document order
///
/// Groups directly under `<Project>` or inside `<Choose>`/`<When>`/`<Otherwise>`
/// count; groups inside `<Target>` only apply when that target runs.
fn evaluated_groups<'a, 'input>(parent: Node<'a, 'input>, groups: &mut Vec<Node<'a, 'input>>) {
    for child in parent.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "PropertyGroup" | "ItemGroup" => groups.push(child),
            "Choose" | "When" | "Otherwise" => evaluated_groups(child, groups),
            _ => {}
        }
    }
}

/// Expands the directory properties of the declaring project file
///
/// `$(MSBuildThisFileDirectory)` carries a trailing separator,
/// `$(MSBuildProjectDirectory)` does not. Property names are case-insensitive.
fn expand_directory_properties(value: &str, project_dir: &Path) -> String {
    let dir = project_dir.to_string_lossy().replace('\\', "/");
    let expanded = replace_ignore_case(value, "$(MSBuildThisFileDirectory)", &format!("{}/", dir));
    replace_ignore_case(&expanded, "$(MSBuildProjectDirectory)", &dir)
}

fn replace_ignore_case(value: &str, pattern: &str, replacement: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();

    let mut result = String::with_capacity(value.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(&pattern) {
        result.push_str(&value[last..start]);
        result.push_str(replacement);
        last = start + pattern.len();
    }
    result.push_str(&value[last..]);
    result
}

fn target_frameworks(project: &AnalyzedProject) -> Vec<String> {
    ["TargetFramework", "TargetFrameworks"]
        .iter()
        .filter_map(|name| project.property(name))
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PROJECT_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
}
