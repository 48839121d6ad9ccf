//! Config command - show configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{ConfigManager, CONFIG_FILE};
use crate::error::DepsyncResult;
use crate::project::Project;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    project: &Project,
) -> DepsyncResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(project)?,
        Some(ConfigAction::Path) => show_path(manager, project),
    }

    Ok(())
}

fn show_config(project: &Project) -> DepsyncResult<()> {
    let toml = toml::to_string_pretty(&project.config)?;
    println!("{}", toml);
    Ok(())
}

fn show_path(manager: &ConfigManager, project: &Project) {
    match manager.path() {
        Some(path) => println!("{}", path.display()),
        // Where a config would be picked up from
        None => println!("{}", project.root.join(CONFIG_FILE).display()),
    }
}
