//! `uv pip compile` resolver
//!
//! Runs the configured uv command in the project root and captures its output.

use crate::error::{DepsyncError, DepsyncResult};
use crate::resolver::{CompileRequest, Resolver};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Resolver backed by `uv`
pub struct UvResolver {
    /// Program and leading arguments, e.g. `["uv"]` or `["python", "-m", "uv"]`
    command: Vec<String>,
    /// Name written in listing version comments
    name: String,
    /// Directory the resolver runs in
    root: PathBuf,
}

impl UvResolver {
    /// Create a resolver running `command` in `root`
    pub fn new(command: Vec<String>, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            name: name.into(),
            root: root.into(),
        }
    }

    /// Arguments after the base command for a compile request
    pub fn compile_args(request: &CompileRequest) -> Vec<String> {
        let mut args = vec![
            "pip".to_string(),
            "compile".to_string(),
            "--exclude-newer".to_string(),
            request.exclude_newer_timestamp(),
            "--python-platform".to_string(),
            request.platform.to_string(),
            "--python-version".to_string(),
            request.python_version.clone(),
            "--resolution".to_string(),
            request.mode.to_string(),
        ];

        if let Some(ref file) = request.override_file {
            args.push("--override".to_string());
            args.push(posix(file));
        }

        args.push("--all-extras".to_string());
        if request.no_deps {
            args.push("--no-deps".to_string());
        }

        args.extend(request.inputs.iter().map(|p| posix(p)));
        args
    }

    /// Run the base command with extra arguments
    async fn exec(&self, args: &[String]) -> DepsyncResult<std::process::Output> {
        let (program, base) = self
            .command
            .split_first()
            .ok_or_else(|| DepsyncError::User("resolver.command is empty".to_string()))?;

        let command_line = self.command_line(args);
        debug!("Executing: {}", command_line);

        Command::new(program)
            .args(base)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DepsyncError::command_failed(command_line, e))
    }

    fn command_line(&self, args: &[String]) -> String {
        self.command
            .iter()
            .chain(args)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Resolver for UvResolver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn version(&self) -> DepsyncResult<String> {
        let args = ["--version".to_string()];
        let output = self.exec(&args).await?;

        if !output.status.success() {
            return Err(DepsyncError::resolver_failure(
                self.command_line(&args),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        parse_version(&String::from_utf8_lossy(&output.stdout))
    }

    async fn compile(&self, request: &CompileRequest) -> DepsyncResult<String> {
        let args = Self::compile_args(request);
        let output = self.exec(&args).await?;

        if !output.status.success() {
            return Err(DepsyncError::resolver_failure(
                self.command_line(&args),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Take the version token from `uv 0.4.18 (Homebrew 2024-09-24)`
fn parse_version(output: &str) -> DepsyncResult<String> {
    output
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| DepsyncError::ResolverVersion(output.trim().to_string()))
}

/// Forward-slash form of a path, the same on every OS
fn posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
