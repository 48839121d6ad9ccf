//! Error types for depsync
//!
//! All modules use `DepsyncResult<T>` as their return type. Cache validation
//! mismatches are not errors; they are verdicts of the reconciler.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for depsync operations
pub type DepsyncResult<T> = Result<T, DepsyncError>;

/// All errors that can occur in depsync
#[derive(Error, Debug)]
pub enum DepsyncError {
    // Resolver errors
    #[error("Resolver failed: {command}\n{stderr}")]
    ResolverFailure { command: String, stderr: String },

    #[error("Unexpected resolver version output: {0:?}")]
    ResolverVersion(String),

    // Input errors
    #[error("Required input file not found: {0}")]
    MissingInputFile(PathBuf),

    #[error("Failed to inspect submodule {path}: {stderr}")]
    SubmoduleInspect { path: String, stderr: String },

    // Lock store errors
    #[error("Lock file {path} is corrupt: {source}")]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No compilation locked under key: {0}")]
    CompNotFound(String),

    // Target errors
    #[error("Unsupported platform: {0}. depsync supports linux, macos and windows.")]
    UnsupportedPlatform(String),

    #[error("Could not determine Python version: {0}")]
    PythonVersion(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl DepsyncError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a resolver failure from the command line and its stderr
    pub fn resolver_failure(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::ResolverFailure {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingInputFile(_) => {
                Some("Create the file or point the [paths] section of depsync.toml at it")
            }
            Self::StoreCorrupt { .. } => {
                Some("Restore the lock file from version control or delete it to relock")
            }
            Self::UnsupportedPlatform(_) => Some("Pass --platform linux, macos or windows"),
            Self::PythonVersion(_) => {
                Some("Pass --python-version or set targets.version in depsync.toml")
            }
            Self::CompNotFound(_) => Some("Run: depsync show (to list locked keys)"),
            Self::CommandFailed { .. } => Some("Check that the resolver command is installed"),
            _ => None,
        }
    }
}
