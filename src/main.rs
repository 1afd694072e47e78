use mutorch::cli::commands::{CliArgs, Commands};
use mutorch::cli::handlers::handle_plan;
use mutorch::util::{parse_level, Logger, LoggingConfig};
use mutorch::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let logger = logger_from_args(&args);

    logger.scope(|| {
        debug!("mutorch v{} starting", VERSION);
        debug!("Arguments: {:?}", args);
    });

    let exit_code = match &args.command {
        Commands::Plan(plan_args) => handle_plan(plan_args, logger).await,
    };

    std::process::exit(exit_code);
}

fn logger_from_args(args: &CliArgs) -> Logger {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    Logger::from_config(&config)
}
