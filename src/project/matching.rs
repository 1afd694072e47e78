//! Pairing projects under test with the test projects referencing them

use super::AnalyzedProject;
use serde::Serialize;
use std::path::PathBuf;

/// A project under test with every test project that references it
///
/// `test_projects` is never empty and keeps discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub project_under_test: AnalyzedProject,
    pub test_projects: Vec<AnalyzedProject>,
}

impl Pairing {
    pub fn test_project_paths(&self) -> Vec<PathBuf> {
        self.test_projects
            .iter()
            .map(|p| p.file_path().to_path_buf())
            .collect()
    }
}

/// Matches each project under test with the test projects referencing it
///
/// A test project matches when one of its project references equals the
/// project's file path exactly. Pairings follow the order of `under_test`;
/// projects no test project references are left out.
pub fn match_projects(under_test: &[AnalyzedProject], test_projects: &[AnalyzedProject]) -> Vec<Pairing> {
    under_test
        .iter()
        .filter_map(|project| {
            let matched: Vec<AnalyzedProject> = test_projects
                .iter()
                .filter(|test| test.references(project.file_path()))
                .cloned()
                .collect();

            if matched.is_empty() {
                None
            } else {
                Some(Pairing {
                    project_under_test: project.clone(),
                    test_projects: matched,
                })
            }
        })
        .collect()
}
