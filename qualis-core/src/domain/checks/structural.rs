// qualis-core/src/domain/checks/structural.rs
//
// Dataset-shape checks: required columns, missing fields, value typing,
// duplicate records and negative-value flags. All of them run over the flat
// record list before any grouping happens.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::checks::CheckCounter;
use crate::domain::issue::{CheckType, Issue, IssueDetails, Severity};
use crate::domain::record::{DataRecord, REQUIRED_FIELDS};

/// Coarse dataset-shape check: only record 0 is inspected. A dataset whose
/// first record lacks a required field gets one critical issue naming all
/// required columns.
pub fn check_missing_columns(
    records: &[DataRecord],
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    let Some(first) = records.first() else {
        return;
    };

    let missing = first.missing_required_fields();
    if missing.is_empty() {
        counter.pass();
        return;
    }

    counter.fail();
    issues.push(Issue::new(
        CheckType::MissingColumns,
        first.indicator_name.clone(),
        None,
        Severity::Critical,
        format!(
            "Dataset is missing required columns; expected {}",
            REQUIRED_FIELDS.join(", ")
        ),
        IssueDetails::MissingColumns {
            missing: REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
        },
    ));
}

/// Per-row required-field check over the first `sample_limit` records.
pub fn check_missing_data(
    records: &[DataRecord],
    sample_limit: usize,
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    for (row, record) in records.iter().take(sample_limit).enumerate() {
        let missing = record.missing_required_fields();
        if missing.is_empty() {
            counter.pass();
            continue;
        }

        counter.fail();
        let fields: Vec<String> = missing.iter().map(|s| s.to_string()).collect();
        issues.push(Issue::new(
            CheckType::MissingData,
            record.indicator_name.clone(),
            record.filter_name.clone(),
            Severity::Critical,
            format!("Row {} is missing: {}", row + 1, fields.join(", ")),
            IssueDetails::MissingData { row, fields },
        ));
    }
}

/// Every record whose value is present but not coercible to a finite number
/// is a critical type error.
pub fn check_data_types(
    records: &[DataRecord],
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    for (row, record) in records.iter().enumerate() {
        let Some(value) = &record.value else {
            // Absent values belong to the Missing Data check.
            counter.pass();
            continue;
        };

        if value.as_f64().is_some() {
            counter.pass();
            continue;
        }

        counter.fail();
        issues.push(Issue::new(
            CheckType::DataTypeError,
            record.indicator_name.clone(),
            record.filter_name.clone(),
            Severity::Critical,
            format!(
                "Non-numeric value '{}' for {} in {}",
                value.raw(),
                record.indicator_name.as_deref().unwrap_or("unknown indicator"),
                record.period_label()
            ),
            IssueDetails::DataTypeError {
                row,
                raw_value: value.raw(),
                year: record.year,
                month: record.valid_month(),
                quarter: record.valid_quarter(),
            },
        ));
    }
}

/// Composite-key duplicate scan in original record order. First occurrence
/// of a key passes; every re-occurrence is a critical issue.
pub fn check_duplicates(
    records: &[DataRecord],
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut occurrences = 0usize;

    for record in records {
        let key = format!(
            "{}|{}|{}|{}",
            record.indicator_name.as_deref().unwrap_or(""),
            record.filter_name.as_deref().unwrap_or(""),
            record.year.map(|y| y.to_string()).unwrap_or_default(),
            record.period_tag()
        );

        if seen.insert(key) {
            counter.pass();
            continue;
        }

        occurrences += 1;
        counter.fail();
        let period = record.period_label();
        issues.push(Issue::new(
            CheckType::DuplicateRecords,
            record.indicator_name.clone(),
            record.filter_name.clone(),
            Severity::Critical,
            format!(
                "Duplicate record for {} / {} in {}",
                record.indicator_name.as_deref().unwrap_or("?"),
                record.filter_name.as_deref().unwrap_or("?"),
                period
            ),
            IssueDetails::DuplicateRecord {
                period,
                year: record.year,
                month: record.valid_month(),
                quarter: record.valid_quarter(),
                occurrence: occurrences,
            },
        ));
    }

    if occurrences > 0 {
        debug!(duplicates = occurrences, "duplicate records detected");
    }
}

/// Negative values are flagged at info severity: a plausibility marker, not
/// a correctness failure.
pub fn check_value_range(
    records: &[DataRecord],
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    for record in records {
        let Some(value) = record.numeric_value() else {
            counter.pass();
            continue;
        };

        if value >= 0.0 {
            counter.pass();
            continue;
        }

        counter.fail();
        let period = record.period_label();
        issues.push(Issue::new(
            CheckType::ValueRange,
            record.indicator_name.clone(),
            record.filter_name.clone(),
            Severity::Info,
            format!("Negative value {} in {}", value, period),
            IssueDetails::ValueRange {
                period,
                year: record.year,
                month: record.valid_month(),
                quarter: record.valid_quarter(),
                value,
            },
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::record::FieldValue;

    fn run<F>(records: &[DataRecord], check: F) -> (Vec<Issue>, CheckCounter)
    where
        F: Fn(&[DataRecord], &mut Vec<Issue>, &mut CheckCounter),
    {
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        check(records, &mut issues, &mut counter);
        (issues, counter)
    }

    #[test]
    fn test_missing_columns_inspects_first_record_only() {
        // Record 0 is complete; record 1 is broken but out of reach for
        // this coarse shape check.
        let records = vec![
            DataRecord::new("GDP", "Total", 2023, 1.0),
            DataRecord::default(),
        ];
        let (issues, counter) = run(&records, check_missing_columns);
        assert!(issues.is_empty());
        assert_eq!(counter.passed, 1);

        let records = vec![DataRecord::default(), DataRecord::new("GDP", "Total", 2023, 1.0)];
        let (issues, _) = run(&records, check_missing_columns);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].check_type, CheckType::MissingColumns);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].message.contains("indicator_name"));
    }

    #[test]
    fn test_missing_data_respects_sample_limit() {
        let mut records = vec![DataRecord::new("GDP", "Total", 2023, 1.0); 5];
        records.push(DataRecord::default()); // row 5, beyond the sample
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        check_missing_data(&records, 5, &mut issues, &mut counter);
        assert!(issues.is_empty());
        assert_eq!(counter.passed, 5);

        // Raise the cap and the broken row surfaces.
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        check_missing_data(&records, 100, &mut issues, &mut counter);
        assert_eq!(issues.len(), 1);
        match &issues[0].details {
            IssueDetails::MissingData { row, fields } => {
                assert_eq!(*row, 5);
                assert_eq!(fields.len(), 4);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_data_type_error_on_unparseable_text() {
        let mut bad = DataRecord::new("GDP", "Total", 2023, 0.0);
        bad.value = Some(FieldValue::Text("N.A.".into()));
        let good_text = {
            let mut r = DataRecord::new("GDP", "Total", 2022, 0.0);
            r.value = Some(FieldValue::Text("42".into()));
            r
        };
        let (issues, counter) = run(&[bad, good_text], check_data_types);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].check_type, CheckType::DataTypeError);
        assert!(issues[0].message.contains("N.A."));
        assert_eq!(counter.passed, 1);
        assert_eq!(counter.failed, 1);
    }

    #[test]
    fn test_duplicate_second_occurrence_flagged() {
        // Same (indicator, filter, year, month), different value: still a
        // duplicate: exactly one issue, for the second occurrence.
        let records = vec![
            DataRecord::new("GDP", "Total", 2023, 1.0).with_month(2),
            DataRecord::new("GDP", "Total", 2023, 9.0).with_month(2),
        ];
        let (issues, counter) = run(&records, check_duplicates);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].check_type, CheckType::DuplicateRecords);
        match &issues[0].details {
            IssueDetails::DuplicateRecord { period, occurrence, .. } => {
                assert_eq!(period, "2023-02");
                assert_eq!(*occurrence, 1);
            }
            other => panic!("unexpected details: {:?}", other),
        }
        assert_eq!(counter.passed, 1);
        assert_eq!(counter.failed, 1);
    }

    #[test]
    fn test_monthly_and_quarterly_keys_do_not_collide() {
        let records = vec![
            DataRecord::new("GDP", "Total", 2023, 1.0).with_month(1),
            DataRecord::new("GDP", "Total", 2023, 1.0).with_quarter(1),
            DataRecord::new("GDP", "Total", 2023, 1.0),
        ];
        let (issues, _) = run(&records, check_duplicates);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_negative_value_is_info_flag() {
        let records = vec![
            DataRecord::new("Net Migration", "Total", 2023, -1200.0),
            DataRecord::new("Net Migration", "Total", 2022, 300.0),
        ];
        let (issues, _) = run(&records, check_value_range);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].check_type, CheckType::ValueRange);
    }
}
