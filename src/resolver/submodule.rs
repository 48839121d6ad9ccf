//! Submodule pins
//!
//! Dev requirement files reference local packages under `submodules/<name>`.
//! Their pinned commits are recorded in every listing so a moved submodule
//! invalidates the locked compilation.

use crate::comp::listing::SubmodulePin;
use crate::error::{DepsyncError, DepsyncResult};
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

static SUBMODULE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"submodules/[^\s]+\b").expect("valid submodule reference regex"));

/// Source of submodule commit pins
#[async_trait]
pub trait SubmoduleInspector: Send + Sync {
    /// Commit the superproject's `HEAD` pins `path` (e.g. `submodules/foo`) to
    async fn pinned_commit(&self, path: &str) -> DepsyncResult<String>;

    /// Pins for every path, in order
    async fn pins(&self, paths: &[String]) -> DepsyncResult<Vec<SubmodulePin>> {
        let mut pins = Vec::with_capacity(paths.len());
        for path in paths {
            let rev = self.pinned_commit(path).await?;
            let name = path.strip_prefix("submodules/").unwrap_or(path);
            pins.push(SubmodulePin::new(name, rev));
        }
        Ok(pins)
    }
}

/// Inspector that asks git
pub struct GitInspector {
    root: PathBuf,
}

impl GitInspector {
    /// Inspect the repository at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SubmoduleInspector for GitInspector {
    async fn pinned_commit(&self, path: &str) -> DepsyncResult<String> {
        let object = format!("HEAD:{path}");
        debug!("Executing: git rev-parse {}", object);

        let output = Command::new("git")
            .args(["rev-parse", &object])
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DepsyncError::command_failed(format!("git rev-parse {object}"), e))?;

        if !output.status.success() {
            return Err(DepsyncError::SubmoduleInspect {
                path: path.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Distinct `submodules/<name>` references in a requirements file, in order
pub fn submodule_paths(requirements: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for found in SUBMODULE_REF.find_iter(requirements) {
        let path = found.as_str();
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }
    paths
}
