// qualis-core/src/domain/checks/statistical.rs
//
// Outlier detection over each indicator x filter group. Two triggers feed
// the same Statistical Anomaly check type: a z-score against the group's
// own distribution, and a secondary period-over-period change-rate test for
// jumps the z-score misses. The z-score trigger short-circuits the
// change-rate trigger, so at most one fires per value.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::checks::{CheckCounter, FilterGroup};
use crate::domain::issue::{AnomalyTrigger, CheckType, Issue, IssueDetails, Severity};
use crate::domain::limits::AnalyzerLimits;
use crate::domain::record::DataRecord;

pub fn check_statistics(
    groups: &[FilterGroup<'_>],
    limits: &AnalyzerLimits,
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    let mut analyzed_indicators: HashSet<&str> = HashSet::new();

    for group in groups {
        // Indicator cap: only the first N distinct indicators are analyzed.
        if !analyzed_indicators.contains(group.indicator.as_str()) {
            if analyzed_indicators.len() >= limits.indicator_limit {
                debug!(group = %group.key(), "indicator cap reached, skipping statistics");
                continue;
            }
            analyzed_indicators.insert(group.indicator.as_str());
        }

        if group.records.len() > limits.stats_group_limit {
            debug!(
                group = %group.key(),
                size = group.records.len(),
                "group too large for statistics, skipping"
            );
            continue;
        }

        analyze_group(group, limits, issues, counter);
    }
}

fn analyze_group(
    group: &FilterGroup<'_>,
    limits: &AnalyzerLimits,
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    // Chronologically ordered numeric values; non-numeric cells were already
    // reported by the type check and carry no statistical weight.
    let series: Vec<(&DataRecord, f64)> = group
        .records
        .iter()
        .filter_map(|r| r.numeric_value().map(|v| (*r, v)))
        .collect();

    if series.len() < 2 {
        return;
    }

    let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev <= f64::EPSILON || !std_dev.is_finite() {
        return;
    }

    let average_change = average_consecutive_change(&values);

    for (i, (record, value)) in series.iter().enumerate() {
        let z_score = (value - mean) / std_dev;
        if !z_score.is_finite() {
            counter.pass();
            continue;
        }

        if z_score.abs() > limits.z_score_threshold {
            counter.fail();
            issues.push(anomaly_issue(
                group,
                record,
                *value,
                z_score,
                limits,
                AnomalyTrigger::ZScore,
                format!(
                    "Outlier in {} / {} at {}: value {} deviates {:.2} standard deviations from the mean",
                    group.indicator,
                    group.filter,
                    record.period_label(),
                    value,
                    z_score.abs()
                ),
            ));
            continue;
        }

        // Secondary trigger: a sharp jump from the previous period that the
        // z-score did not catch.
        if i > 0 {
            let previous = values[i - 1];
            if previous != 0.0 {
                let percent_change = (value - previous) / previous.abs() * 100.0;
                if percent_change.is_finite()
                    && percent_change.abs() > 3.0 * average_change
                    && percent_change.abs() > 100.0
                {
                    counter.fail();
                    issues.push(anomaly_issue(
                        group,
                        record,
                        *value,
                        z_score,
                        limits,
                        AnomalyTrigger::SharpChange {
                            percent_change,
                            average_change,
                        },
                        format!(
                            "Sharp change in {} / {} at {}: value jumped {:.1}% from the previous period (group average {:.1}%)",
                            group.indicator,
                            group.filter,
                            record.period_label(),
                            percent_change,
                            average_change
                        ),
                    ));
                    continue;
                }
            }
        }

        counter.pass();
    }
}

/// Mean absolute percent change across consecutive pairs. Pairs starting
/// from zero are skipped (a relative change from zero is undefined).
fn average_consecutive_change(values: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for pair in values.windows(2) {
        if pair[0] != 0.0 {
            let change = (pair[1] - pair[0]) / pair[0].abs() * 100.0;
            if change.is_finite() {
                total += change.abs();
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn anomaly_issue(
    group: &FilterGroup<'_>,
    record: &DataRecord,
    value: f64,
    z_score: f64,
    limits: &AnalyzerLimits,
    trigger: AnomalyTrigger,
    message: String,
) -> Issue {
    // Both triggers grade severity on the z magnitude.
    let severity = if z_score.abs() > limits.z_score_warning {
        Severity::Warning
    } else {
        Severity::Info
    };

    Issue::new(
        CheckType::StatisticalAnomaly,
        Some(group.indicator.clone()),
        Some(group.filter.clone()),
        severity,
        message,
        IssueDetails::StatisticalAnomaly {
            period: record.period_label(),
            year: record.year,
            month: record.valid_month(),
            quarter: record.valid_quarter(),
            value,
            z_score,
            trigger,
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::group_records;
    use crate::domain::record::DataRecord;

    fn yearly_series(indicator: &str, values: &[f64]) -> Vec<DataRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DataRecord::new(indicator, "Total", 2000 + i as i32, *v))
            .collect()
    }

    fn run(records: &[DataRecord]) -> (Vec<Issue>, CheckCounter) {
        let groups = group_records(records);
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        check_statistics(&groups, &AnalyzerLimits::default(), &mut issues, &mut counter);
        (issues, counter)
    }

    #[test]
    fn test_zscore_outlier_is_warning() {
        // Eleven stable points and one spike. Explicit arithmetic:
        // mean = (11 * 10 + 120) / 12 = 19.1667
        // variance = (11 * 9.1667^2 + 100.8333^2) / 12 = 924.3
        // std_dev = 30.40, z(120) = 101 / 30.40 = 3.32 > 3 -> warning.
        let mut values = vec![10.0; 11];
        values.push(120.0);
        let records = yearly_series("GDP", &values);
        let (issues, _) = run(&records);

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.check_type, CheckType::StatisticalAnomaly);
        assert_eq!(issue.severity, Severity::Warning);
        match &issue.details {
            IssueDetails::StatisticalAnomaly { z_score, value, trigger, .. } => {
                assert!(*z_score > 3.0, "z = {}", z_score);
                assert_eq!(*value, 120.0);
                assert_eq!(*trigger, AnomalyTrigger::ZScore);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_sharp_change_trigger_catches_small_sample_spike() {
        // [10, 11, 9, 10, 100, 10]: mean 25, population std_dev 33.55, so
        // z(100) = 2.24 stays under the 2.5 z threshold. The 900% jump from
        // 10 to 100 exceeds both 3x the average consecutive change and the
        // 100% floor, so the change-rate trigger fires instead; z <= 3
        // keeps it at info severity.
        let records = yearly_series("CPI", &[10.0, 11.0, 9.0, 10.0, 100.0, 10.0]);
        let (issues, _) = run(&records);

        let spikes: Vec<&Issue> = issues
            .iter()
            .filter(|i| matches!(
                &i.details,
                IssueDetails::StatisticalAnomaly { value, .. } if *value == 100.0
            ))
            .collect();
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].severity, Severity::Info);
        match &spikes[0].details {
            IssueDetails::StatisticalAnomaly { z_score, trigger, .. } => {
                assert!(z_score.abs() < 2.5, "z = {}", z_score);
                match trigger {
                    AnomalyTrigger::SharpChange { percent_change, .. } => {
                        assert!((percent_change - 900.0).abs() < 1e-6);
                    }
                    other => panic!("unexpected trigger: {:?}", other),
                }
            }
            other => panic!("unexpected details: {:?}", other),
        }
        assert!(spikes[0].message.contains("jumped"));
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        let records = yearly_series("GDP", &[5.0, 5.0, 5.0, 5.0]);
        let (issues, counter) = run(&records);
        assert!(issues.is_empty());
        // Zero stddev: the whole group is skipped, nothing inspected.
        assert_eq!(counter.passed + counter.failed, 0);
    }

    #[test]
    fn test_steady_growth_is_clean() {
        let records = yearly_series("GDP", &[100.0, 110.0, 121.0, 133.0, 146.0]);
        let (issues, counter) = run(&records);
        assert!(issues.is_empty());
        assert_eq!(counter.passed, 5);
    }

    #[test]
    fn test_zero_previous_value_skips_change_rate() {
        let records = yearly_series("Net", &[0.0, 50.0, 0.0, 55.0]);
        let (issues, _) = run(&records);
        // Change-rate needs a nonzero previous value; whether the z-score
        // trigger fires is up to the distribution, but nothing panics and
        // no SharpChange trigger appears.
        assert!(issues.iter().all(|i| !matches!(
            &i.details,
            IssueDetails::StatisticalAnomaly { trigger: AnomalyTrigger::SharpChange { .. }, .. }
        )));
    }

    #[test]
    fn test_group_size_cap_skips_statistics() {
        let limits = AnalyzerLimits {
            stats_group_limit: 5,
            ..Default::default()
        };
        let mut values = vec![10.0; 11];
        values.push(120.0);
        let records = yearly_series("GDP", &values);
        let groups = group_records(&records);
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        check_statistics(&groups, &limits, &mut issues, &mut counter);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_indicator_cap_limits_analysis() {
        let limits = AnalyzerLimits {
            indicator_limit: 1,
            ..Default::default()
        };
        let mut spiky = vec![10.0; 11];
        spiky.push(120.0);
        let mut records = yearly_series("First", &[1.0, 1.1, 1.2]);
        records.extend(yearly_series("Second", &spiky));
        let groups = group_records(&records);
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        check_statistics(&groups, &limits, &mut issues, &mut counter);
        // "Second" sits beyond the cap: its spike goes unanalyzed.
        assert!(issues.is_empty());
    }
}
