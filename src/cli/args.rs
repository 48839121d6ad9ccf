//! CLI argument definitions using clap derive

use crate::comp::target::Platform;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// depsync - Reconcile locked dependency compilations
///
/// Reuses locked `uv pip compile` results while they remain valid for the
/// current platform, Python version, submodule pins and resolver version.
#[derive(Parser, Debug)]
#[command(name = "depsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DEPSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the config file's directory, else the current directory)
    #[arg(short = 'C', long, global = true)]
    pub project: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile dependencies for this platform, reusing the lock when valid
    Compile(CompileArgs),

    /// Compile every platform and Python version, then lock
    Sync,

    /// Merge compilations into the lock file
    Lock,

    /// Show locked compilations
    Show(ShowArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the compile command
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Print the highest-resolution compilation path instead of the lowest
    #[arg(long)]
    pub high: bool,

    /// Platform to compile for (defaults to this machine)
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Python version to compile for (defaults to targets.version, else the interpreter)
    #[arg(long)]
    pub python_version: Option<String>,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Lock key to print (lists all keys if omitted)
    pub key: Option<String>,

    /// Output format for the key list
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Output format for list output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse::<Platform>().map_err(|e| e.to_string())
}
