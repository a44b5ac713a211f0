// qualis-core/src/application/analyzer.rs
//
// The QA run orchestrator: structural checks over the flat list, temporal
// and statistical checks per group, then summary + score assembly. The
// engine is total: malformed business data becomes Issues, never errors,
// and the only defensive path (empty input) produces a synthetic critical
// issue instead of failing.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::domain::checks::{
    global_year_range, group_records, statistical, structural, temporal, CheckCounter,
};
use crate::domain::issue::{CheckType, Issue, IssueDetails, Severity};
use crate::domain::limits::AnalyzerLimits;
use crate::domain::record::DataRecord;
use crate::domain::report::{QaResults, QaSummary};
use crate::domain::scoring::calculate_quality_score;

#[derive(Debug, Clone, Default)]
pub struct QaAnalyzer {
    limits: AnalyzerLimits,
}

impl QaAnalyzer {
    pub fn new(limits: AnalyzerLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &AnalyzerLimits {
        &self.limits
    }

    /// Runs every check over the dataset and assembles a fresh results
    /// bundle. Caller-supplied slices are never mutated.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn process(&self, records: &[DataRecord]) -> QaResults {
        if records.is_empty() {
            return self.empty_input_results();
        }

        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        let mut missing_periods = BTreeMap::new();

        // 1. Structural checks (flat list)
        structural::check_missing_columns(records, &mut issues, &mut counter);
        structural::check_missing_data(
            records,
            self.limits.missing_data_sample,
            &mut issues,
            &mut counter,
        );
        structural::check_data_types(records, &mut issues, &mut counter);
        structural::check_duplicates(records, &mut issues, &mut counter);
        structural::check_value_range(records, &mut issues, &mut counter);

        // 2. Temporal + statistical checks (per indicator x filter group)
        let groups = group_records(records);
        let global_years = global_year_range(records);
        temporal::check_timeline(
            &groups,
            global_years,
            &self.limits,
            &mut issues,
            &mut counter,
            &mut missing_periods,
        );
        statistical::check_statistics(&groups, &self.limits, &mut issues, &mut counter);

        // 3. Assembly
        let mut checks_by_type: BTreeMap<CheckType, usize> = BTreeMap::new();
        for issue in &issues {
            *checks_by_type.entry(issue.check_type).or_insert(0) += 1;
        }

        let total_indicators = count_distinct_indicators(records);
        debug!(
            issues = issues.len(),
            passed = counter.passed,
            failed = counter.failed,
            "analysis complete"
        );

        let quality_score = calculate_quality_score(records, &issues);
        info!(
            overall = quality_score.overall,
            rating = %quality_score.rating,
            "quality score computed"
        );

        QaResults {
            summary: QaSummary {
                total_indicators,
                passed_checks: counter.passed,
                failed_checks: counter.failed,
                checks_by_type,
            },
            issues,
            processed_at: Utc::now(),
            quality_score,
            missing_periods,
        }
    }

    fn empty_input_results(&self) -> QaResults {
        let issue = Issue::new(
            CheckType::SystemError,
            None,
            None,
            Severity::Critical,
            "No data records were provided for analysis".to_string(),
            IssueDetails::SystemError {
                reason: "empty dataset".to_string(),
            },
        );

        let mut checks_by_type = BTreeMap::new();
        checks_by_type.insert(CheckType::SystemError, 1);

        let quality_score = calculate_quality_score(&[], std::slice::from_ref(&issue));

        QaResults {
            summary: QaSummary {
                total_indicators: 0,
                passed_checks: 0,
                failed_checks: 1,
                checks_by_type,
            },
            issues: vec![issue],
            processed_at: Utc::now(),
            quality_score,
            missing_periods: BTreeMap::new(),
        }
    }
}

fn count_distinct_indicators(records: &[DataRecord]) -> usize {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .filter_map(|r| r.indicator_name.as_deref())
        .filter(|name| seen.insert(name.to_string()))
        .count()
}

/// Convenience entry point with the documented default limits.
pub fn process_qa(records: &[DataRecord]) -> QaResults {
    QaAnalyzer::default().process(records)
}
