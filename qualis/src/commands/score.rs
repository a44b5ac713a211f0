// qualis/src/commands/score.rs
//
// USE CASE: Show the quality score as the user currently sees it. Issues
// they resolved or dismissed no longer count against the dataset.

use std::path::Path;

use qualis_core::infrastructure::{load_or_default, CsvLoader, JsonStatusStore};
use qualis_core::ports::StatusStore;
use qualis_core::{recalculate_quality_with_active_issues, QaAnalyzer};

use super::render;

pub fn execute(data: &Path, project_dir: &Path) -> anyhow::Result<()> {
    let config = load_or_default(project_dir)?;

    let loader = CsvLoader::new()?;
    let records = loader.load(data)?;

    let analyzer = QaAnalyzer::new(config.limits.clone());
    let results = analyzer.process(&records);

    let store = JsonStatusStore::new(project_dir.join("qa"));
    let statuses = store.load_statuses()?;

    if statuses.is_empty() {
        render::print_score(&results.quality_score);
        return Ok(());
    }

    let filtered = recalculate_quality_with_active_issues(&records, &results.issues, &statuses);
    println!(
        "ℹ️  {} status entrie(s) applied; score reflects active issues only.",
        statuses.len()
    );
    render::print_score(&filtered);

    Ok(())
}
