//! Configuration management for depsync

pub mod schema;

pub use schema::Config;

use crate::error::{DepsyncError, DepsyncResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Project configuration file name
pub const CONFIG_FILE: &str = "depsync.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a config manager that discovers `depsync.toml` upwards from `start`
    pub fn discover(start: &Path) -> Self {
        let config_path = Self::find_local_config(start);
        if let Some(ref path) = config_path {
            debug!("Found config: {}", path.display());
        }
        Self { config_path }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Walk up from `start` looking for `depsync.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if no file is in use
    pub async fn load(&self) -> DepsyncResult<Config> {
        match self.config_path {
            Some(ref path) if path.exists() => Self::load_from_file(path).await,
            Some(ref path) => Err(DepsyncError::ConfigInvalid {
                path: path.clone(),
                reason: "file not found".to_string(),
            }),
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(path: &Path) -> DepsyncResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| DepsyncError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| DepsyncError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Directory containing the config file, if one is in use
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_path.as_deref().and_then(Path::parent)
    }

    /// Get the config file path
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
