//! Compilation targets and the names derived from them
//!
//! A target is one (platform, Python version) combination. Its listings are
//! written to `requirements_<label>_<version>[_high].txt` and locked under the
//! file stem with the `requirements_` prefix removed.

use crate::error::{DepsyncError, DepsyncResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of every compilation file stem
pub const COMP_PREFIX: &str = "requirements";

/// Separator between the parts of a compilation name
const SEP: &str = "_";

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

impl Platform {
    /// All platforms in matrix order
    pub fn all() -> &'static [Self] {
        &[Self::Linux, Self::Macos, Self::Windows]
    }

    /// Detect the platform this process runs on
    pub fn detect() -> DepsyncResult<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform
    pub fn from_os(os: &str) -> DepsyncResult<Self> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            other => Err(DepsyncError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Identifier passed to the resolver's `--python-platform`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }

    /// Default CI runner label for this platform
    pub fn default_runner(&self) -> &'static str {
        match self {
            Self::Linux => "ubuntu-22.04",
            Self::Macos => "macos-13",
            Self::Windows => "windows-2022",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DepsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_os(s.trim().to_ascii_lowercase().as_str())
    }
}

/// One platform and Python version to compile for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Platform passed to the resolver
    pub platform: Platform,
    /// Label used in compilation names (platform name or runner label)
    pub label: String,
    /// Python version, e.g. "3.12"
    pub python_version: String,
}

impl Target {
    /// Target labelled by its platform name
    pub fn new(platform: Platform, python_version: impl Into<String>) -> Self {
        Self {
            platform,
            label: platform.to_string(),
            python_version: python_version.into(),
        }
    }

    /// Replace the label, e.g. with a runner name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// File stems of this target's compilations
    pub fn names(&self) -> CompNames {
        let low = [COMP_PREFIX, &self.label, &self.python_version].join(SEP);
        let high = [low.as_str(), "high"].join(SEP);
        CompNames { low, high }
    }

    /// Lock key of this target's low compilation
    pub fn key(&self) -> String {
        comp_key(&self.names().low).to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Python {})", self.label, self.python_version)
    }
}

/// File stems of a target's low and high compilations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompNames {
    pub low: String,
    pub high: String,
}

impl CompNames {
    /// Lock keys of both compilations
    pub fn keys(&self) -> (&str, &str) {
        (comp_key(&self.low), comp_key(&self.high))
    }
}

/// Key of a compilation in the lock, given its file stem
pub fn comp_key(name: &str) -> &str {
    name.strip_prefix(COMP_PREFIX)
        .and_then(|rest| rest.strip_prefix(SEP))
        .unwrap_or(name)
}

/// Reduce `Python 3.12.1` (or `3.12.1`) to `3.12`
pub fn parse_python_version(output: &str) -> DepsyncResult<String> {
    let version = output
        .split_whitespace()
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .ok_or_else(|| DepsyncError::PythonVersion(output.trim().to_string()))?;

    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
            Ok(format!("{major}.{minor}"))
        }
        _ => Err(DepsyncError::PythonVersion(output.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Macos);
        assert!(matches!(
            "solaris".parse::<Platform>(),
            Err(DepsyncError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn platform_display_roundtrips() {
        for platform in Platform::all() {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), *platform);
        }
    }

    #[test]
    fn names_for_platform_label() {
        let names = Target::new(Platform::Linux, "3.12").names();
        assert_eq!(names.low, "requirements_linux_3.12");
        assert_eq!(names.high, "requirements_linux_3.12_high");
        assert_eq!(names.keys(), ("linux_3.12", "linux_3.12_high"));
    }

    #[test]
    fn names_for_runner_label() {
        let target = Target::new(Platform::Windows, "3.11").with_label("windows-2022");
        assert_eq!(target.names().low, "requirements_windows-2022_3.11");
        assert_eq!(target.key(), "windows-2022_3.11");
        assert_eq!(target.platform.as_str(), "windows");
    }

    #[test]
    fn comp_key_only_strips_prefix() {
        assert_eq!(comp_key("requirements_macos_3.9_high"), "macos_3.9_high");
        assert_eq!(comp_key("custom_name"), "custom_name");
        assert_eq!(comp_key("requirementsfoo"), "requirementsfoo");
    }

    #[test]
    fn python_version_from_interpreter_output() {
        assert_eq!(parse_python_version("Python 3.12.1\n").unwrap(), "3.12");
        assert_eq!(parse_python_version("3.9.18").unwrap(), "3.9");
        assert!(parse_python_version("Python").is_err());
        assert!(parse_python_version("Python 3").is_err());
    }
}
