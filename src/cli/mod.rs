pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, OutputFormatArg, PlanArgs};
pub use handlers::handle_plan;
pub use output::{OutputFormat, OutputFormatter, Plan, PlannedProject};
