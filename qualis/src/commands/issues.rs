// qualis/src/commands/issues.rs
//
// USE CASE: List persisted issues filtered by lifecycle state.

use std::path::Path;

use anyhow::Context;

use qualis_core::domain::{status_for, Issue, IssueState};
use qualis_core::get_active_issues;
use qualis_core::infrastructure::JsonStatusStore;
use qualis_core::ports::StatusStore;

use super::render;

pub fn execute(project_dir: &Path, state: &str) -> anyhow::Result<()> {
    let store = JsonStatusStore::new(project_dir.join("qa"));
    let results = store
        .load_results()?
        .with_context(|| {
            format!(
                "No results in {}; run 'qualis check' first",
                store.results_path().display()
            )
        })?;
    let statuses = store.load_statuses()?;

    let selected: Vec<&Issue> = match state {
        "all" => results.issues.iter().collect(),
        "active" => {
            // Active = no status entry, or an explicitly active one.
            let active = get_active_issues(&results.issues, &statuses);
            results
                .issues
                .iter()
                .filter(|i| active.iter().any(|a| a.id == i.id))
                .collect()
        }
        other => {
            let wanted: IssueState = other.parse()?;
            results
                .issues
                .iter()
                .filter(|i| {
                    status_for(&statuses, &i.id).map(|s| s.state) == Some(wanted)
                })
                .collect()
        }
    };

    if selected.is_empty() {
        println!("✅ No {} issues.", state);
        return Ok(());
    }

    println!("{}", render::issue_table(&selected));
    println!("📋 {} {} issue(s).", selected.len(), state);

    Ok(())
}
