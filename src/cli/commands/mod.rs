//! CLI command implementations

pub mod compile;
pub mod config;
pub mod lock;
pub mod show;
pub mod sync;

pub use compile::execute as compile;
pub use config::execute as config;
pub use lock::execute as lock;
pub use show::execute as show;
pub use sync::execute as sync;

use crate::project::Project;
use crate::resolver::{GitInspector, UvResolver};

/// Resolver and submodule inspector for a project
fn collaborators(project: &Project) -> (UvResolver, GitInspector) {
    let resolver = UvResolver::new(
        project.config.resolver.command.clone(),
        project.config.resolver.name.clone(),
        &project.root,
    );
    (resolver, GitInspector::new(&project.root))
}
