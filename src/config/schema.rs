//! Configuration schema for depsync
//!
//! Configuration is stored in `depsync.toml` at the project root. Every
//! section and field is optional.

use crate::comp::target::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Python versions used when neither the config nor the versions file lists any
pub const DEFAULT_VERSIONS: &[&str] = &["3.9", "3.10", "3.11", "3.12"];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Input and output locations
    pub paths: PathsConfig,

    /// Resolver invocation
    pub resolver: ResolverConfig,

    /// Compilation matrix
    pub targets: TargetsConfig,

    /// Reconciliation behavior
    pub sync: SyncConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// File locations, relative to the project root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Development requirements, including editable local packages
    pub dev: PathBuf,

    /// Lines appended to every listing without resolving their dependencies
    pub nodeps: PathBuf,

    /// Overrides for otherwise incompatible combinations (used if present)
    #[serde(rename = "override")]
    pub override_file: Option<PathBuf>,

    /// Additional resolver inputs, e.g. `pyproject.toml`
    pub extra_inputs: Vec<PathBuf>,

    /// Directory of per-target compilations
    pub comps: PathBuf,

    /// Lock file
    pub lock: PathBuf,

    /// One supported Python version per line
    pub python_versions: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dev: PathBuf::from("requirements/dev.in"),
            nodeps: PathBuf::from("requirements/nodeps.in"),
            override_file: Some(PathBuf::from("requirements/override.txt")),
            extra_inputs: vec![],
            comps: PathBuf::from(".comps"),
            lock: PathBuf::from("lock.json"),
            python_versions: PathBuf::from(".python-versions"),
        }
    }
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Program and leading arguments, e.g. ["bin/uv"] or ["python", "-m", "uv"]
    pub command: Vec<String>,

    /// Name written in listing version comments
    pub name: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            command: vec!["uv".to_string()],
            name: "uv".to_string(),
        }
    }
}

/// How targets are labelled in compilation names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// `requirements_linux_3.12`
    #[default]
    Platform,
    /// `requirements_ubuntu-22.04_3.12`
    Runner,
}

/// Compilation matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Platforms to compile for
    pub platforms: Vec<Platform>,

    /// Python versions to compile for (empty: versions file, then defaults)
    pub versions: Vec<String>,

    /// Label style for compilation names
    pub label: LabelStyle,

    /// Interpreter asked for the current Python version
    pub python: String,

    /// Current Python version, instead of asking the interpreter
    pub version: Option<String>,

    /// Runner label per platform name
    pub runners: BTreeMap<String, String>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            platforms: Platform::all().to_vec(),
            versions: vec![],
            label: LabelStyle::Platform,
            python: "python3".to_string(),
            version: None,
            runners: Platform::all()
                .iter()
                .map(|p| (p.to_string(), p.default_runner().to_string()))
                .collect(),
        }
    }
}

impl TargetsConfig {
    /// Label for a platform under the configured style
    pub fn label(&self, platform: Platform) -> String {
        match self.label {
            LabelStyle::Platform => platform.to_string(),
            LabelStyle::Runner => self
                .runners
                .get(platform.as_str())
                .cloned()
                .unwrap_or_else(|| platform.default_runner().to_string()),
        }
    }
}

/// Reconciliation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Re-resolve the low compilation and compare it with the lock before reusing
    pub verify_reuse: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { verify_reuse: true }
    }
}
