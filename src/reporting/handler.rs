//! Reporter trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events an engine emits while processing one project pairing
#[derive(Debug, Clone)]
pub enum ReportEvent {
    /// Engine took over a project under test
    ProjectStarted {
        project: PathBuf,
        test_projects: usize,
    },

    /// Baseline run finished and the timeout budget is known
    BaselineComplete { project: PathBuf, timeout: Duration },

    /// Transform-and-verify cycle finished
    MutationRunComplete {
        project: PathBuf,
        mutants: usize,
        killed: usize,
        duration: Duration,
    },

    /// Engine gave up on the project
    ProjectFailed { project: PathBuf, error: String },
}

/// Sink for engine events
pub trait Reporter: Send + Sync {
    fn on_event(&self, event: &ReportEvent);
}

/// Reporter that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpReporter;

impl Reporter for NoOpReporter {
    fn on_event(&self, _event: &ReportEvent) {}
}
