//! Reporting sink handed to the transform-and-verify engine

mod handler;
mod logging;

pub use handler::{NoOpReporter, ReportEvent, Reporter};
pub use logging::LoggingReporter;
