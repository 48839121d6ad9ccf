//! Show command - print locked compilations

use crate::cli::args::{OutputFormat, ShowArgs};
use crate::comp::{ListingParser, LockStore};
use crate::error::{DepsyncError, DepsyncResult};
use crate::project::Project;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

/// Summary of one lock entry
#[derive(Debug, Serialize)]
struct EntrySummary<'a> {
    key: &'a str,
    resolver_version: Option<String>,
    submodules: usize,
    requirements: usize,
}

/// Execute the show command
pub async fn execute(args: ShowArgs, project: &Project) -> DepsyncResult<()> {
    let store = LockStore::load(&project.lock_path()).await?;

    if let Some(key) = args.key {
        let listing = store
            .get(&key)
            .ok_or_else(|| DepsyncError::CompNotFound(key.clone()))?;
        print!("{}", listing);
        if !listing.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    if store.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_warn_hint(&ctx, "No compilations locked", "Run: depsync sync");
            }
        }
        return Ok(());
    }

    let resolver = project.config.resolver.name.as_str();
    let parser = ListingParser::new(resolver);
    let entries: Vec<_> = store
        .iter()
        .map(|(key, text)| {
            let listing = parser.parse(text);
            EntrySummary {
                key,
                resolver_version: listing.resolver_version,
                submodules: listing.submodules.len(),
                requirements: listing.requirements.len(),
            }
        })
        .collect();

    match args.format {
        OutputFormat::Table => print_table(&entries, resolver),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => entries.iter().for_each(|entry| println!("{}", entry.key)),
    }

    Ok(())
}

fn print_table(entries: &[EntrySummary<'_>], resolver: &str) {
    println!(
        "{:<32} {:<12} {:<12} {:<12}",
        style("KEY").bold(),
        style(resolver.to_uppercase()).bold(),
        style("SUBMODULES").bold(),
        style("PINS").bold()
    );
    println!("{}", "-".repeat(71));

    for entry in entries {
        println!(
            "{:<32} {:<12} {:<12} {:<12}",
            entry.key,
            entry.resolver_version.as_deref().unwrap_or("-"),
            entry.submodules,
            entry.requirements
        );
    }

    println!();
    println!("{} entries", entries.len());
}
