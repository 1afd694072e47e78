use super::commands::PlanArgs;
use super::output::{OutputFormat, OutputFormatter, Plan};
use crate::analyzer::MsBuildAnalyzer;
use crate::config::{ConfigFile, WorkspaceConfig};
use crate::fs::RealFileSystem;
use crate::util::Logger;
use crate::workspace::WorkspaceResolver;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_RESOLVE_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

pub async fn handle_plan(args: &PlanArgs, logger: Logger) -> i32 {
    let config = match logger.scope(|| build_config(args)) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let analyzer = MsBuildAnalyzer::new(Arc::new(RealFileSystem))
        .with_target_framework(config.criteria.target_framework.clone());
    let resolver = WorkspaceResolver::new(Arc::new(analyzer), logger.clone());

    // Analysis reads every project file from disk
    let resolved = tokio::task::spawn_blocking(move || {
        resolver
            .resolve(&config)
            .map(|projects| Plan::new(projects.mode().clone(), projects))
    })
    .await;

    let plan = match resolved {
        Ok(Ok(plan)) => plan,
        Ok(Err(e)) => {
            logger.scope(|| error!("Failed to resolve workspace: {}", e));
            return EXIT_RESOLVE_FAILED;
        }
        Err(e) => {
            logger.scope(|| error!("Workspace analysis task failed: {}", e));
            return EXIT_RESOLVE_FAILED;
        }
    };

    logger.scope(|| info!("Resolved {} project pairing(s)", plan.projects.len()));

    let format: OutputFormat = args.format.into();
    match OutputFormatter::new(format).format_plan(&plan) {
        Ok(output) => {
            println!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            logger.scope(|| error!("Failed to format output: {}", e));
            EXIT_RESOLVE_FAILED
        }
    }
}

fn build_config(args: &PlanArgs) -> Result<WorkspaceConfig, i32> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => env::current_dir().map_err(|e| {
            error!("Failed to get current directory: {}", e);
            EXIT_CONFIG_ERROR
        })?,
    };
    let root = absolute(root);
    debug!("Root path: {}", root.display());

    let mut config = WorkspaceConfig::new(&root);

    if let Some(config_file) = &args.config_file {
        let file = ConfigFile::load(config_file).map_err(|e| {
            error!("{}", e);
            EXIT_CONFIG_ERROR
        })?;
        let base_dir = config_file
            .parent()
            .map(|dir| absolute(dir.to_path_buf()))
            .unwrap_or_else(|| root.clone());
        config = file.apply(config, &base_dir);
        debug!("Applied config file: {}", config_file.display());
    }

    if let Some(solution) = &args.solution {
        config = config.with_workspace_root(root.join(solution));
    }
    if args.target_framework.is_some() {
        config.criteria.target_framework = args.target_framework.clone();
    }

    config.validate().map_err(|e| {
        error!("{}", e);
        EXIT_CONFIG_ERROR
    })?;

    Ok(config)
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
