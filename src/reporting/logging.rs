//! Logging-based reporter

use super::{ReportEvent, Reporter};
use tracing::{error, info};

/// Reporter that logs events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReporter;

impl Reporter for LoggingReporter {
    fn on_event(&self, event: &ReportEvent) {
        match event {
            ReportEvent::ProjectStarted {
                project,
                test_projects,
            } => {
                info!(project = %project.display(), test_projects, "Mutation testing project");
            }
            ReportEvent::BaselineComplete { project, timeout } => {
                info!(
                    project = %project.display(),
                    timeout_ms = timeout.as_millis(),
                    "Baseline run complete"
                );
            }
            ReportEvent::MutationRunComplete {
                project,
                mutants,
                killed,
                duration,
            } => {
                let score = if *mutants > 0 {
                    *killed as f64 * 100.0 / *mutants as f64
                } else {
                    0.0
                };
                info!(
                    project = %project.display(),
                    mutants,
                    killed,
                    score = format!("{:.1}%", score),
                    duration_ms = duration.as_millis(),
                    "Mutation run complete"
                );
            }
            ReportEvent::ProjectFailed { project, error } => {
                error!(project = %project.display(), error = %error, "Project failed");
            }
        }
    }
}
