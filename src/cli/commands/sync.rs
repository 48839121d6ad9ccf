//! Sync command - reconcile the whole matrix, then lock

use crate::comp::{lock, write_comps, Inputs, LockStore, Reconciler};
use crate::error::DepsyncResult;
use crate::project::Project;
use crate::ui::{self, UiContext};
use tracing::info;

/// Execute the sync command
pub async fn execute(project: &Project) -> DepsyncResult<()> {
    let ctx = UiContext::detect();

    let targets = project.matrix().await?;
    let inputs = Inputs::load(&project.root, &project.config.paths).await?;
    let lock_path = project.lock_path();
    let comps_dir = project.comps_dir();
    let store = LockStore::load(&lock_path).await?;

    let (resolver, inspector) = super::collaborators(project);
    let reconciler = Reconciler::new(&resolver, &inspector, inputs)
        .with_verify_reuse(project.config.sync.verify_reuse);

    ui::section(&ctx, &format!("Compiling {} target(s)", targets.len()));

    // Targets run one after another; each writes only its own files.
    let mut recompiled = 0;
    for target in &targets {
        let result = reconciler.reconcile(target, &store).await?;
        write_comps(&comps_dir, &target.names(), &result.comp).await?;
        if result.recompiled() {
            recompiled += 1;
        }
        ui::step_ok_detail(&ctx, &target.to_string(), &result.verdict.to_string());
    }

    let store = lock(&lock_path, &comps_dir).await?;
    info!(
        "{} of {} target(s) recompiled, {} lock entries",
        recompiled,
        targets.len(),
        store.len()
    );
    ui::key_value(&ctx, "Recompiled", &format!("{recompiled}/{}", targets.len()));
    println!("{}", lock_path.display());

    Ok(())
}
