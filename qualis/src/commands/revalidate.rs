// qualis/src/commands/revalidate.rs
//
// USE CASE: After the user edits the dataset, diff the fresh analysis
// against the persisted one and auto-resolve every issue the edit fixed.

use std::path::Path;

use anyhow::Context;

use qualis_core::application::revalidate_with;
use qualis_core::infrastructure::{load_or_default, CsvLoader, JsonStatusStore};
use qualis_core::ports::StatusStore;
use qualis_core::QaAnalyzer;

pub fn execute(data: &Path, project_dir: &Path) -> anyhow::Result<()> {
    let config = load_or_default(project_dir)?;

    let store = JsonStatusStore::new(project_dir.join("qa"));
    let previous = store
        .load_results()?
        .with_context(|| {
            format!(
                "No previous results in {}; run 'qualis check' first",
                store.results_path().display()
            )
        })?;
    let statuses = store.load_statuses()?;

    let loader = CsvLoader::new()?;
    let records = loader.load(data)?;
    println!("📦 Re-analyzing {} records...", records.len());

    let analyzer = QaAnalyzer::new(config.limits.clone());
    let outcome = revalidate_with(&analyzer, &records, &previous.issues, &statuses);

    if outcome.auto_resolved_count > 0 {
        println!(
            "✨ Auto-resolved {} issue(s) fixed by the edit.",
            outcome.auto_resolved_count
        );
    } else {
        println!("ℹ️  Nothing to auto-resolve.");
    }
    println!(
        "❗ {} issue(s) remain in the fresh analysis.",
        outcome.updated_issues().len()
    );

    // Persist the merged state: fresh results + updated statuses.
    store.save_results(&outcome.results)?;
    store.save_statuses(&outcome.statuses)?;
    println!("💾 Updated results + statuses saved.");

    Ok(())
}
