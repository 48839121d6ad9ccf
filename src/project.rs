//! Project context: root directory plus configuration
//!
//! Built once at start-up and passed to every command, so targets and paths
//! never come from process-wide state.

use crate::comp::target::{parse_python_version, Platform, Target};
use crate::config::schema::DEFAULT_VERSIONS;
use crate::config::Config;
use crate::error::{DepsyncError, DepsyncResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// A project and its configuration
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory all configured paths are relative to
    pub root: PathBuf,
    /// Effective configuration
    pub config: Config,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Resolve a configured path against the project root
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Lock file location
    pub fn lock_path(&self) -> PathBuf {
        self.path(&self.config.paths.lock)
    }

    /// Compilation directory location
    pub fn comps_dir(&self) -> PathBuf {
        self.path(&self.config.paths.comps)
    }

    /// Target for a platform and Python version, labelled per configuration
    pub fn target(&self, platform: Platform, python_version: impl Into<String>) -> Target {
        Target::new(platform, python_version).with_label(self.config.targets.label(platform))
    }

    /// Supported Python versions: configured list, else the versions file,
    /// else the defaults
    pub async fn python_versions(&self) -> DepsyncResult<Vec<String>> {
        if !self.config.targets.versions.is_empty() {
            return Ok(self.config.targets.versions.clone());
        }

        let file = self.path(&self.config.paths.python_versions);
        if file.is_file() {
            let content = fs::read_to_string(&file)
                .await
                .map_err(|e| DepsyncError::io(format!("reading {}", file.display()), e))?;
            let versions: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            if !versions.is_empty() {
                return Ok(versions);
            }
        }

        Ok(DEFAULT_VERSIONS.iter().map(|v| v.to_string()).collect())
    }

    /// Every configured platform crossed with every supported version
    pub async fn matrix(&self) -> DepsyncResult<Vec<Target>> {
        let versions = self.python_versions().await?;
        Ok(self
            .config
            .targets
            .platforms
            .iter()
            .flat_map(|platform| {
                versions
                    .iter()
                    .map(move |version| self.target(*platform, version.clone()))
            })
            .collect())
    }

    /// Target of this machine, with optional explicit platform and version
    pub async fn current_target(
        &self,
        platform: Option<Platform>,
        python_version: Option<String>,
    ) -> DepsyncResult<Target> {
        let platform = match platform {
            Some(platform) => platform,
            None => Platform::detect()?,
        };

        let version = match python_version.or_else(|| self.config.targets.version.clone()) {
            Some(version) => version,
            None => self.interpreter_version().await?,
        };

        Ok(self.target(platform, version))
    }

    /// Ask the configured interpreter for its `major.minor` version
    async fn interpreter_version(&self) -> DepsyncResult<String> {
        let python = &self.config.targets.python;
        debug!("Executing: {} --version", python);

        let output = Command::new(python)
            .arg("--version")
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DepsyncError::command_failed(format!("{python} --version"), e))?;

        if !output.status.success() {
            return Err(DepsyncError::PythonVersion(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        // Older interpreters print the version on stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = if stdout.trim().is_empty() {
            String::from_utf8_lossy(&output.stderr)
        } else {
            stdout
        };
        parse_python_version(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LabelStyle;
    use tempfile::TempDir;

    #[tokio::test]
    async fn versions_from_config_first() {
        let mut config = Config::default();
        config.targets.versions = vec!["3.13".to_string()];
        let project = Project::new(".", config);
        assert_eq!(project.python_versions().await.unwrap(), vec!["3.13"]);
    }

    #[tokio::test]
    async fn versions_from_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".python-versions"), "3.11\n\n3.12\n").unwrap();
        let project = Project::new(temp.path(), Config::default());
        assert_eq!(project.python_versions().await.unwrap(), vec!["3.11", "3.12"]);
    }

    #[tokio::test]
    async fn versions_default() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path(), Config::default());
        assert_eq!(
            project.python_versions().await.unwrap(),
            vec!["3.9", "3.10", "3.11", "3.12"]
        );
    }

    #[tokio::test]
    async fn matrix_is_platform_major() {
        let mut config = Config::default();
        config.targets.platforms = vec![Platform::Linux, Platform::Windows];
        config.targets.versions = vec!["3.11".to_string(), "3.12".to_string()];
        let project = Project::new(".", config);

        let keys: Vec<_> = project
            .matrix()
            .await
            .unwrap()
            .iter()
            .map(Target::key)
            .collect();
        assert_eq!(
            keys,
            vec!["linux_3.11", "linux_3.12", "windows_3.11", "windows_3.12"]
        );
    }

    #[tokio::test]
    async fn current_target_uses_explicit_values() {
        let mut config = Config::default();
        config.targets.label = LabelStyle::Runner;
        let project = Project::new(".", config);

        let target = project
            .current_target(Some(Platform::Macos), Some("3.10".to_string()))
            .await
            .unwrap();
        assert_eq!(target.key(), "macos-13_3.10");
        assert_eq!(target.platform, Platform::Macos);
    }

    #[tokio::test]
    async fn current_target_uses_configured_version() {
        let mut config = Config::default();
        config.targets.version = Some("3.12".to_string());
        let project = Project::new(".", config);

        let target = project
            .current_target(Some(Platform::Linux), None)
            .await
            .unwrap();
        assert_eq!(target.python_version, "3.12");
    }

    #[test]
    fn paths_resolve_against_root() {
        let project = Project::new("/repo", Config::default());
        assert_eq!(project.lock_path(), PathBuf::from("/repo/lock.json"));
        assert_eq!(project.comps_dir(), PathBuf::from("/repo/.comps"));
    }
}
