// qualis/src/commands/check.rs
//
// USE CASE: Run the full QA analysis over a CSV dataset, display the
// findings, and persist the results bundle for later lifecycle commands.

use std::path::Path;

use tracing::info;

use qualis_core::QaAnalyzer;
use qualis_core::infrastructure::{CsvLoader, JsonStatusStore, load_or_default};
use qualis_core::ports::StatusStore;

use super::render;

pub fn execute(data: &Path, project_dir: &Path, strict: bool, json: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the config (Infra)
    let config = load_or_default(project_dir)?;
    println!("⚙️  Project: {} (v{})", config.name, config.version);

    // B. Load the dataset
    let loader = CsvLoader::new()?;
    let records = loader.load(data)?;
    println!("📦 Loaded {} records from {}", records.len(), data.display());

    // C. Run the analysis (Application Layer)
    let analyzer = QaAnalyzer::new(config.limits.clone());
    let results = analyzer.process(&records);
    info!(
        issues = results.issues.len(),
        critical = results.critical_count(),
        "analysis finished"
    );

    // D. Display
    if json {
        println!("{}", serde_json::to_string_pretty(&results.issues)?);
    } else if results.issues.is_empty() {
        println!("✅ No issues found.");
    } else {
        let refs: Vec<_> = results.issues.iter().collect();
        println!("\n{}", render::issue_table(&refs));
        println!(
            "❗ {} issue(s): {} critical, {} passed / {} failed checks",
            results.issues.len(),
            results.critical_count(),
            results.summary.passed_checks,
            results.summary.failed_checks
        );
    }

    render::print_score(&results.quality_score);

    // E. Persist for the lifecycle commands
    let store = JsonStatusStore::new(project_dir.join("qa"));
    store.save_results(&results)?;
    println!(
        "\n💾 Results saved to {} ({:.2?})",
        store.results_path().display(),
        start.elapsed()
    );

    if strict && results.has_critical_issues() {
        eprintln!("❌ Strict mode: critical issues present.");
        std::process::exit(1);
    }

    Ok(())
}
