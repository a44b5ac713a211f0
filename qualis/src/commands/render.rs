// qualis/src/commands/render.rs
//
// Shared comfy-table builders for issue and score display.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use qualis_core::domain::{IndicatorScore, Issue, QualityScore};

pub fn issue_table(issues: &[&Issue]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Severity", "Check", "Indicator", "Filter", "Message"]);

    for issue in issues {
        table.add_row(vec![
            issue.severity.to_string(),
            issue.check_type.to_string(),
            issue.indicator_name.clone().unwrap_or_else(|| "-".into()),
            issue.filter_name.clone().unwrap_or_else(|| "-".into()),
            issue.message.clone(),
        ]);
    }

    table
}

pub fn indicator_table(indicators: &[IndicatorScore]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Indicator", "Score", "Rating", "Rows", "Crit", "Warn", "Info"]);

    for indicator in indicators {
        table.add_row(vec![
            indicator.name.clone(),
            indicator.score.to_string(),
            indicator.rating.to_string(),
            indicator.row_count.to_string(),
            indicator.issues_count.critical.to_string(),
            indicator.issues_count.warning.to_string(),
            indicator.issues_count.info.to_string(),
        ]);
    }

    table
}

pub fn print_score(score: &QualityScore) {
    println!("\n📊 Overall quality: {}/100 ({})", score.overall, score.rating);
    println!("   Completeness: {:>5.1}", score.breakdown.completeness);
    println!("   Accuracy:     {:>5.1}", score.breakdown.accuracy);
    println!("   Consistency:  {:>5.1}", score.breakdown.consistency);
    println!("   Validity:     {:>5.1}", score.breakdown.validity);

    if !score.indicators.is_empty() {
        println!("\n{}", indicator_table(&score.indicators));
    }
}
