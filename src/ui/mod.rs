//! UI module for consistent CLI status output
//!
//! Status lines go to stderr so stdout stays machine readable (paths,
//! listings, JSON). Styling falls back to plain tags in CI and when stderr is
//! not a terminal.
//!
//! # Example
//!
//! ```rust,ignore
//! use depsync::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect();
//!
//! ui::section(&ctx, "Compiling");
//! ui::step_ok_detail(&ctx, "linux (Python 3.12)", "reused");
//! ui::step_warn_hint(&ctx, "No compilations found", "Run: depsync compile");
//! ```

mod context;
mod output;

pub use context::UiContext;
pub use output::{key_value, section, step_ok_detail, step_warn_hint};
