//! Compilation reconciler
//!
//! Decides per target whether the locked compilation is still valid for the
//! current inputs and recompiles only when it is not. Any doubt resolves to a
//! recompile; a mismatch is a verdict, never an error.

use crate::comp::inputs::Inputs;
use crate::comp::listing::{compose, ListingParser};
use crate::comp::store::LockStore;
use crate::comp::target::Target;
use crate::comp::Comp;
use crate::error::DepsyncResult;
use crate::resolver::{CompileRequest, ResolutionMode, Resolver, SubmoduleInspector};
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Why a locked compilation could not be reused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// Nothing locked for the target
    Missing,
    /// Locked with another resolver version
    ResolverChanged { locked: String, installed: String },
    /// Submodule pins cannot be paired one to one
    SubmoduleMissing { locked: usize, current: usize },
    /// A submodule is pinned to another commit, or pairs with another submodule
    SubmoduleMoved { name: String },
    /// A direct dependency is not pinned in the locked listing
    DirectMissing { name: String },
    /// A locked direct pin no longer appears in a fresh resolution
    DirectChanged { requirement: String },
    /// A locked package no longer appears in a fresh resolution
    DirectRemoved { name: String },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no locked compilation"),
            Self::ResolverChanged { locked, installed } => {
                write!(f, "resolver changed from {locked} to {installed}")
            }
            Self::SubmoduleMissing { locked, current } => {
                write!(f, "{locked} submodule pin(s) locked, {current} current")
            }
            Self::SubmoduleMoved { name } => write!(f, "submodule {name} moved"),
            Self::DirectMissing { name } => write!(f, "direct dependency {name} not locked"),
            Self::DirectChanged { requirement } => {
                write!(f, "{requirement} no longer resolves")
            }
            Self::DirectRemoved { name } => write!(f, "{name} no longer required"),
        }
    }
}

/// Outcome of reconciling one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Reused,
    Recompiled(StaleReason),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reused => write!(f, "reused"),
            Self::Recompiled(reason) => write!(f, "recompiled ({reason})"),
        }
    }
}

/// Compilations for a target and how they were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub comp: Comp,
    pub verdict: Verdict,
}

impl Reconciliation {
    pub fn recompiled(&self) -> bool {
        matches!(self.verdict, Verdict::Recompiled(_))
    }
}

/// Reconciles locked compilations against fresh resolutions
pub struct Reconciler<'a> {
    resolver: &'a dyn Resolver,
    inspector: &'a dyn SubmoduleInspector,
    inputs: Inputs,
    parser: ListingParser,
    exclude_newer: DateTime<Utc>,
    verify_reuse: bool,
    resolver_version: OnceCell<String>,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler. All compilations it produces share one
    /// exclude-newer cutoff, taken now.
    pub fn new(
        resolver: &'a dyn Resolver,
        inspector: &'a dyn SubmoduleInspector,
        inputs: Inputs,
    ) -> Self {
        Self {
            resolver,
            inspector,
            inputs,
            parser: ListingParser::new(resolver.name()),
            exclude_newer: Utc::now(),
            verify_reuse: true,
            resolver_version: OnceCell::new(),
        }
    }

    /// Re-resolve the low compilation before reusing it (on by default)
    pub fn with_verify_reuse(mut self, verify: bool) -> Self {
        self.verify_reuse = verify;
        self
    }

    /// Override the exclude-newer cutoff
    pub fn with_exclude_newer(mut self, cutoff: DateTime<Utc>) -> Self {
        self.exclude_newer = cutoff;
        self
    }

    /// Installed resolver version, asked once
    async fn resolver_version(&self) -> DepsyncResult<&str> {
        let version = self
            .resolver_version
            .get_or_try_init(|| self.resolver.version())
            .await?;
        Ok(version.as_str())
    }

    /// Compile one listing for a target
    pub async fn compile(
        &self,
        target: &Target,
        mode: ResolutionMode,
        no_deps: bool,
    ) -> DepsyncResult<String> {
        let request = CompileRequest {
            platform: target.platform,
            python_version: target.python_version.clone(),
            mode,
            no_deps,
            exclude_newer: self.exclude_newer,
            override_file: self.inputs.override_file().map(Into::into),
            inputs: self.inputs.resolver_inputs(),
        };

        debug!(
            "Compiling {} ({}{})",
            target,
            mode,
            if no_deps { ", no deps" } else { "" }
        );
        let resolved = self.resolver.compile(&request).await?;
        let version = self.resolver_version().await?;
        let pins = self.inspector.pins(&self.inputs.submodule_paths()).await?;

        Ok(compose(
            self.resolver.name(),
            version,
            &pins,
            &resolved,
            self.inputs.nodeps(),
        ))
    }

    /// Compile both listings of a target from scratch
    pub async fn recompile(&self, target: &Target) -> DepsyncResult<Comp> {
        Ok(Comp {
            low: self.compile(target, ResolutionMode::LowestDirect, false).await?,
            high: self.compile(target, ResolutionMode::Highest, false).await?,
        })
    }

    /// Reuse the target's locked compilation if still valid, else recompile
    pub async fn reconcile(&self, target: &Target, store: &LockStore) -> DepsyncResult<Reconciliation> {
        let reason = match store.comp(&target.names()) {
            None => StaleReason::Missing,
            Some(old) => match self.check(target, &old).await? {
                Some(reason) => reason,
                None => {
                    info!("Reusing locked compilation for {}", target);
                    return Ok(Reconciliation {
                        comp: old,
                        verdict: Verdict::Reused,
                    });
                }
            },
        };

        info!("Recompiling {}: {}", target, reason);
        Ok(Reconciliation {
            comp: self.recompile(target).await?,
            verdict: Verdict::Recompiled(reason),
        })
    }

    /// First reason the locked compilation is stale, if any
    async fn check(&self, target: &Target, old: &Comp) -> DepsyncResult<Option<StaleReason>> {
        let locked = self.parser.parse(&old.low);

        if let Some(ref locked_version) = locked.resolver_version {
            let installed = self.resolver_version().await?;
            if locked_version != installed {
                return Ok(Some(StaleReason::ResolverChanged {
                    locked: locked_version.clone(),
                    installed: installed.to_string(),
                }));
            }
        }

        let directs_text = self
            .compile(target, ResolutionMode::LowestDirect, true)
            .await?;
        let directs = self.parser.parse(&directs_text);

        if locked.submodules.len() != directs.submodules.len() {
            return Ok(Some(StaleReason::SubmoduleMissing {
                locked: locked.submodules.len(),
                current: directs.submodules.len(),
            }));
        }
        if let Some((pin, _)) = locked
            .submodules
            .iter()
            .zip(&directs.submodules)
            .find(|(old_pin, new_pin)| old_pin != new_pin)
        {
            return Ok(Some(StaleReason::SubmoduleMoved {
                name: pin.name.clone(),
            }));
        }

        let mut locked_directs = Vec::with_capacity(directs.requirements.len());
        for direct in &directs.requirements {
            match locked.find(&direct.name) {
                Some(pinned) => locked_directs.push(pinned),
                None => {
                    return Ok(Some(StaleReason::DirectMissing {
                        name: direct.name.clone(),
                    }))
                }
            }
        }

        if self.verify_reuse {
            let low_text = self
                .compile(target, ResolutionMode::LowestDirect, false)
                .await?;
            let low = self.parser.parse(&low_text);
            if let Some(changed) = locked_directs.iter().find(|req| !low.contains(req)) {
                return Ok(Some(StaleReason::DirectChanged {
                    requirement: changed.to_string(),
                }));
            }
            if let Some(dropped) = locked
                .requirements
                .iter()
                .find(|req| low.find(&req.name).is_none())
            {
                return Ok(Some(StaleReason::DirectRemoved {
                    name: dropped.name.clone(),
                }));
            }
        }

        debug!(
            "{} direct dependencies of {} match the lock",
            locked_directs.len(),
            target
        );
        Ok(None)
    }
}
