//! depsync - Dependency compilation reconciler
//!
//! Keeps per-platform, per-Python-version `uv pip compile` results in a
//! single lock file and reuses them while they stay valid, so routine syncs
//! do not churn pinned versions.

pub mod cli;
pub mod comp;
pub mod config;
pub mod error;
pub mod project;
pub mod resolver;
pub mod ui;

pub use error::{DepsyncError, DepsyncResult};
