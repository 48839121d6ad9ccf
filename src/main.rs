//! depsync - Dependency compilation reconciler
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use depsync::cli::{commands, Cli, Commands};
use depsync::config::ConfigManager;
use depsync::error::{DepsyncError, DepsyncResult};
use depsync::project::Project;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DepsyncResult<()> {
    let cli = Cli::parse();

    let cwd =
        std::env::current_dir().map_err(|e| DepsyncError::io("getting current directory", e))?;
    let start = match cli.project {
        Some(ref dir) => cwd.join(dir),
        None => cwd.clone(),
    };

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(cwd.join(path)),
        None => ConfigManager::discover(&start),
    };
    let config = config_manager.load().await?;

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("depsync=warn"),
        1 => EnvFilter::new("depsync=info"),
        _ => EnvFilter::new("depsync=debug"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let root = match (cli.project, config_manager.config_dir()) {
        (Some(_), _) => start,
        (None, Some(dir)) => dir.to_path_buf(),
        (None, None) => cwd,
    };
    if let Some(path) = config_manager.path() {
        debug!("Using config: {}", path.display());
    }
    debug!("Project root: {}", root.display());

    let project = Project::new(root, config);

    match cli.command {
        Commands::Compile(args) => commands::compile(args, &project).await,
        Commands::Sync => commands::sync(&project).await,
        Commands::Lock => commands::lock(&project).await,
        Commands::Show(args) => commands::show(args, &project).await,
        Commands::Config(args) => commands::config(args, &config_manager, &project).await,
    }
}
