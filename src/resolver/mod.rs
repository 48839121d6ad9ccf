//! External collaborators of the reconciler
//!
//! The package resolver and the submodule inspector are injected as traits so
//! reconciliation can run against in-memory fakes:
//! - `UvResolver`: runs `uv pip compile`
//! - `GitInspector`: runs `git rev-parse HEAD:<path>`

pub mod submodule;
pub mod uv;

pub use submodule::{submodule_paths, GitInspector, SubmoduleInspector};
pub use uv::UvResolver;

use crate::comp::target::Platform;
use crate::error::DepsyncResult;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::path::PathBuf;

/// Version selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionMode {
    /// Lowest compatible versions of direct dependencies
    LowestDirect,
    /// Latest compatible versions of everything
    Highest,
}

impl ResolutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowestDirect => "lowest-direct",
            Self::Highest => "highest",
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolver run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Platform to resolve for
    pub platform: Platform,
    /// Python version to resolve for
    pub python_version: String,
    /// Version selection strategy
    pub mode: ResolutionMode,
    /// Resolve direct dependencies only
    pub no_deps: bool,
    /// Ignore distributions uploaded after this instant
    pub exclude_newer: DateTime<Utc>,
    /// Constraint overrides file, if any
    pub override_file: Option<PathBuf>,
    /// Requirement input files, relative to the project root
    pub inputs: Vec<PathBuf>,
}

impl CompileRequest {
    /// `exclude_newer` as an RFC 3339 timestamp with a `Z` suffix
    pub fn exclude_newer_timestamp(&self) -> String {
        self.exclude_newer
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// Package resolver interface
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Name written in the version comment of every listing
    fn name(&self) -> &str;

    /// Installed resolver version
    async fn version(&self) -> DepsyncResult<String>;

    /// Resolve the request and return the `Name==Version` listing it prints
    async fn compile(&self, request: &CompileRequest) -> DepsyncResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn resolution_mode_flags() {
        assert_eq!(ResolutionMode::LowestDirect.to_string(), "lowest-direct");
        assert_eq!(ResolutionMode::Highest.to_string(), "highest");
    }

    #[test]
    fn exclude_newer_uses_z_suffix() {
        let request = CompileRequest {
            platform: Platform::Linux,
            python_version: "3.12".to_string(),
            mode: ResolutionMode::Highest,
            no_deps: false,
            exclude_newer: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            override_file: None,
            inputs: vec![],
        };
        assert_eq!(
            request.exclude_newer_timestamp(),
            "2024-03-01T12:30:00.000000Z"
        );
    }
}
