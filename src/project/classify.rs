//! Under-test vs test project classification

use super::{AnalyzedProject, IS_TEST_PROJECT, PROJECT_TYPE_GUIDS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project type GUID that legacy (non-SDK) test projects list in `ProjectTypeGuids`
pub const TEST_PROJECT_TYPE_GUID: &str = "{3AC096D0-A1C2-E12C-1390-A8335801FDAB}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    UnderTest,
    TestProject,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::UnderTest => write!(f, "under test"),
            ProjectKind::TestProject => write!(f, "test project"),
        }
    }
}

/// Classifies a project from its declared properties
///
/// `IsTestProject` wins when present: only the value `false` (any case) makes
/// the project a project under test, every other value makes it a test
/// project. Without it, `ProjectTypeGuids` containing
/// [`TEST_PROJECT_TYPE_GUID`] marks a test project. Projects declaring neither
/// are under test.
pub fn classify(project: &AnalyzedProject) -> ProjectKind {
    if let Some(value) = project.property(IS_TEST_PROJECT) {
        return if value.eq_ignore_ascii_case("false") {
            ProjectKind::UnderTest
        } else {
            ProjectKind::TestProject
        };
    }

    if let Some(guids) = project.property(PROJECT_TYPE_GUIDS) {
        return if guids
            .to_ascii_uppercase()
            .contains(TEST_PROJECT_TYPE_GUID)
        {
            ProjectKind::TestProject
        } else {
            ProjectKind::UnderTest
        };
    }

    ProjectKind::UnderTest
}
