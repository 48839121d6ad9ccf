//! Compile command - reconcile this machine's target

use crate::cli::args::CompileArgs;
use crate::comp::{write_comps, Inputs, LockStore, Reconciler};
use crate::error::DepsyncResult;
use crate::project::Project;
use crate::ui::{self, UiContext};

/// Execute the compile command
pub async fn execute(args: CompileArgs, project: &Project) -> DepsyncResult<()> {
    let ctx = UiContext::detect();

    let target = project
        .current_target(args.platform, args.python_version)
        .await?;
    let inputs = Inputs::load(&project.root, &project.config.paths).await?;
    let store = LockStore::load(&project.lock_path()).await?;

    let (resolver, inspector) = super::collaborators(project);
    let reconciler = Reconciler::new(&resolver, &inspector, inputs)
        .with_verify_reuse(project.config.sync.verify_reuse);

    let result = reconciler.reconcile(&target, &store).await?;
    let (low, high) = write_comps(&project.comps_dir(), &target.names(), &result.comp).await?;

    ui::step_ok_detail(&ctx, &target.to_string(), &result.verdict.to_string());
    let path = if args.high { high } else { low };
    println!("{}", path.display());

    Ok(())
}
