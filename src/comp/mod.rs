//! Dependency compilations and their reconciliation
//!
//! A compilation is the resolved dependency listing of one target. Each
//! target has two: `low` (lowest compatible direct dependencies) and `high`
//! (latest everything). Locked compilations are reused while they remain valid
//! for the current inputs.
//!
//! # Reuse checks
//!
//! | Check | Recompile when |
//! |-------|----------------|
//! | Lock entry | no low compilation is locked for the target |
//! | Resolver | locked resolver version differs from the installed one |
//! | Submodules | pins differ in count or in any name/commit pair |
//! | Directs | a direct dependency is not pinned in the locked low listing |
//! | Low closure | a locked direct pin moved, or a locked package is gone from a fresh low resolution |

pub mod inputs;
pub mod listing;
pub mod reconcile;
pub mod store;
pub mod target;

pub use inputs::Inputs;
pub use listing::{Listing, ListingParser, Requirement, SubmodulePin};
pub use reconcile::{Reconciler, Reconciliation, StaleReason, Verdict};
pub use store::{lock, read_comps, write_comps, LockStore};
pub use target::{comp_key, CompNames, Platform, Target};

/// Low and high compilations of one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comp {
    /// Lowest-direct resolution
    pub low: String,
    /// Highest resolution
    pub high: String,
}
