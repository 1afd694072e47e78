use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Solution-aware orchestration of per-project mutation testing
#[derive(Parser, Debug)]
#[command(
    name = "mutorch",
    about = "Solution-aware orchestration of per-project mutation testing",
    version,
    author,
    long_about = "mutorch finds the projects under test in a .NET solution, pairs each with \
                  the test projects referencing it, and runs one mutation testing pipeline \
                  per pairing."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Show the project pairings that would be mutation tested",
        long_about = "Analyzes the solution, classifies every project as under test or test \
                      project, and prints one entry per pairing.\n\n\
                      Examples:\n  \
                      mutorch plan\n  \
                      mutorch plan /path/to/repo --solution /path/to/repo/App.sln\n  \
                      mutorch plan --config-file mutorch.json --format json"
    )]
    Plan(PlanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[arg(value_name = "ROOT", help = "Root path (defaults to current directory)")]
    pub root: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        help = "Solution file; relative paths are resolved against ROOT"
    )]
    pub solution: Option<PathBuf>,

    #[arg(short = 'c', long, value_name = "FILE", help = "JSON config file")]
    pub config_file: Option<PathBuf>,

    #[arg(long, value_name = "TFM", help = "Only analyze projects targeting this framework")]
    pub target_framework: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
