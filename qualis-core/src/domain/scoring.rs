// qualis-core/src/domain/scoring.rs
//
// Severity-weighted scoring. Pure function of (records, issues): callable
// by the analyzer at the end of a run, and re-callable by the lifecycle
// layer against a filtered issue list without a dataset re-scan.

use std::collections::HashMap;

use crate::domain::issue::{CheckType, Issue, Severity};
use crate::domain::record::DataRecord;
use crate::domain::score::{
    IndicatorScore, IssueCounts, QualityScore, Rating, ScoreBreakdown,
};

pub fn calculate_quality_score(records: &[DataRecord], issues: &[Issue]) -> QualityScore {
    // An empty dataset still scores (the synthetic System Error issue then
    // drives the result to zero instead of dividing by zero).
    let total_records = records.len().max(1) as f64;

    let penalty: f64 = issues.iter().map(|i| i.severity.weight()).sum();
    let overall = clamp_score(100.0 - penalty / total_records * 100.0);
    let rating = Rating::from_score(overall);

    QualityScore {
        overall,
        rating,
        breakdown: breakdown(issues, total_records),
        indicators: indicator_scores(records, issues),
    }
}

fn clamp_score(raw: f64) -> u32 {
    raw.clamp(0.0, 100.0).round() as u32
}

/// Dimension scores. Accuracy uses a 50x multiplier where the other three
/// use 100x: anomaly and gap issues are tolerated at twice the density
/// before the dimension bottoms out.
fn breakdown(issues: &[Issue], total_records: f64) -> ScoreBreakdown {
    let count_of = |types: &[CheckType]| -> f64 {
        issues
            .iter()
            .filter(|i| types.contains(&i.check_type))
            .count() as f64
    };

    let completeness = count_of(&[CheckType::MissingData, CheckType::MissingColumns]);
    let validity = count_of(&[CheckType::DataTypeError, CheckType::ValueRange]);
    let consistency = count_of(&[CheckType::DuplicateRecords]);
    let accuracy = count_of(&[CheckType::StatisticalAnomaly, CheckType::TimelineGap]);

    ScoreBreakdown {
        completeness: dimension(completeness, total_records, 100.0),
        validity: dimension(validity, total_records, 100.0),
        consistency: dimension(consistency, total_records, 100.0),
        accuracy: dimension(accuracy, total_records, 50.0),
    }
}

fn dimension(issue_count: f64, total_records: f64, multiplier: f64) -> f64 {
    (100.0 - issue_count / total_records * multiplier)
        .clamp(0.0, 100.0)
        .round()
}

/// Per-indicator scores: the same penalty formula, normalized against each
/// indicator's own row count. Worst first so problem areas surface
/// immediately; name breaks ties for determinism.
fn indicator_scores(records: &[DataRecord], issues: &[Issue]) -> Vec<IndicatorScore> {
    let mut order: Vec<String> = Vec::new();
    let mut row_counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let Some(name) = record.indicator_name.clone() else {
            continue;
        };
        if !row_counts.contains_key(&name) {
            order.push(name.clone());
        }
        *row_counts.entry(name).or_insert(0) += 1;
    }

    let mut scores: Vec<IndicatorScore> = order
        .into_iter()
        .map(|name| {
            let row_count = row_counts.get(&name).copied().unwrap_or(1);
            let scoped: Vec<&Issue> = issues
                .iter()
                .filter(|i| i.indicator_name.as_deref() == Some(name.as_str()))
                .collect();

            let mut counts = IssueCounts::default();
            let mut penalty = 0.0;
            for issue in &scoped {
                penalty += issue.severity.weight();
                match issue.severity {
                    Severity::Critical => counts.critical += 1,
                    Severity::Warning => counts.warning += 1,
                    Severity::Info => counts.info += 1,
                }
            }

            let score = clamp_score(100.0 - penalty / row_count.max(1) as f64 * 100.0);
            IndicatorScore {
                name,
                score,
                rating: Rating::from_score(score),
                row_count,
                issues_count: counts,
            }
        })
        .collect();

    scores.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.name.cmp(&b.name)));
    scores
}
