//! Lock command - merge compilations into the lock file

use crate::comp::lock;
use crate::error::DepsyncResult;
use crate::project::Project;
use crate::ui::{self, UiContext};

/// Execute the lock command
pub async fn execute(project: &Project) -> DepsyncResult<()> {
    let ctx = UiContext::detect();
    let lock_path = project.lock_path();

    let store = lock(&lock_path, &project.comps_dir()).await?;

    ui::step_ok_detail(
        &ctx,
        "Locked compilations",
        &format!("{} entries", store.len()),
    );
    println!("{}", lock_path.display());

    Ok(())
}
