// qualis-core/src/domain/checks/temporal.rs
//
// Gap detection. Each indicator x filter group gets one detected frequency
// (monthly beats quarterly beats yearly), then a consecutive-pair walk over
// the sorted records enumerates every missing period. Yearly groups are
// additionally compared against the dataset-wide year range so a series
// that starts late or ends early gets flagged.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::checks::{CheckCounter, FilterGroup};
use crate::domain::issue::{CheckType, Issue, IssueDetails, Severity};
use crate::domain::limits::AnalyzerLimits;
use crate::domain::record::Frequency;

/// A point on the timeline at the group's granularity. `sub` is the month
/// (1-12), the quarter (1-4) or 0 for yearly positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Position {
    year: i32,
    sub: i32,
}

impl Position {
    fn next(self, frequency: Frequency) -> Self {
        match frequency {
            Frequency::Monthly => {
                if self.sub >= 12 {
                    Self { year: self.year + 1, sub: 1 }
                } else {
                    Self { year: self.year, sub: self.sub + 1 }
                }
            }
            Frequency::Quarterly => {
                if self.sub >= 4 {
                    Self { year: self.year + 1, sub: 1 }
                } else {
                    Self { year: self.year, sub: self.sub + 1 }
                }
            }
            Frequency::Yearly => Self { year: self.year + 1, sub: 0 },
        }
    }

    fn label(self, frequency: Frequency) -> String {
        match frequency {
            Frequency::Monthly => format!("{}-{:02}", self.year, self.sub),
            Frequency::Quarterly => format!("{}-Q{}", self.year, self.sub),
            Frequency::Yearly => self.year.to_string(),
        }
    }

    /// Number of steps between two positions at the given granularity.
    fn distance(self, other: Position, frequency: Frequency) -> i64 {
        let span = i64::from(other.year) - i64::from(self.year);
        match frequency {
            Frequency::Monthly => span * 12 + i64::from(other.sub - self.sub),
            Frequency::Quarterly => span * 4 + i64::from(other.sub - self.sub),
            Frequency::Yearly => span,
        }
    }
}

pub fn check_timeline(
    groups: &[FilterGroup<'_>],
    global_years: Option<(i32, i32)>,
    limits: &AnalyzerLimits,
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
    missing_map: &mut BTreeMap<String, Vec<String>>,
) {
    for group in groups {
        let frequency = Frequency::detect(group.records.iter().copied());
        debug!(group = %group.key(), %frequency, "timeline walk");

        let positions = group_positions(group, frequency);

        if frequency == Frequency::Yearly {
            check_year_coverage(group, &positions, global_years, issues, counter);
        }

        check_gaps(group, frequency, &positions, limits, issues, counter, missing_map);
    }
}

/// Placeable records only: the walk needs a year, plus the granularity
/// field the detected frequency relies on.
fn group_positions(group: &FilterGroup<'_>, frequency: Frequency) -> Vec<Position> {
    group
        .records
        .iter()
        .filter_map(|record| {
            let year = record.year?;
            let sub = match frequency {
                Frequency::Monthly => record.valid_month()?,
                Frequency::Quarterly => record.valid_quarter()?,
                Frequency::Yearly => 0,
            };
            Some(Position { year, sub })
        })
        .collect()
}

/// Flags yearly series whose own range is narrower than the dataset's:
/// one warning per missing leading year, one per missing trailing year.
fn check_year_coverage(
    group: &FilterGroup<'_>,
    positions: &[Position],
    global_years: Option<(i32, i32)>,
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
) {
    let (Some((global_min, global_max)), Some(first), Some(last)) =
        (global_years, positions.first(), positions.last())
    else {
        return;
    };

    let group_min = first.year;
    let group_max = last.year;

    if group_min > global_min {
        for year in global_min..group_min {
            counter.fail();
            issues.push(coverage_issue(
                group,
                year,
                format!(
                    "{} / {} starts in {} while the dataset covers {}: year {} is missing",
                    group.indicator, group.filter, group_min, global_min, year
                ),
                year.to_string(),
                group_min.to_string(),
            ));
        }
    } else {
        counter.pass();
    }

    if group_max < global_max {
        for year in (group_max + 1)..=global_max {
            counter.fail();
            issues.push(coverage_issue(
                group,
                year,
                format!(
                    "{} / {} ends in {} while the dataset covers up to {}: year {} is missing",
                    group.indicator, group.filter, group_max, global_max, year
                ),
                group_max.to_string(),
                year.to_string(),
            ));
        }
    } else {
        counter.pass();
    }
}

fn coverage_issue(
    group: &FilterGroup<'_>,
    year: i32,
    message: String,
    from: String,
    to: String,
) -> Issue {
    Issue::new(
        CheckType::TimelineGap,
        Some(group.indicator.clone()),
        Some(group.filter.clone()),
        Severity::Warning,
        message,
        IssueDetails::TimelineGap {
            from,
            to,
            gap: 1,
            missing_periods: vec![year.to_string()],
            frequency: Frequency::Yearly,
        },
    )
}

#[allow(clippy::too_many_arguments)]
fn check_gaps(
    group: &FilterGroup<'_>,
    frequency: Frequency,
    positions: &[Position],
    limits: &AnalyzerLimits,
    issues: &mut Vec<Issue>,
    counter: &mut CheckCounter,
    missing_map: &mut BTreeMap<String, Vec<String>>,
) {
    let cap = match frequency {
        Frequency::Monthly => limits.monthly_gap_cap,
        Frequency::Quarterly => limits.quarterly_gap_cap,
        Frequency::Yearly => limits.yearly_gap_cap,
    };

    for pair in positions.windows(2) {
        let (prev, actual) = (pair[0], pair[1]);
        let expected = prev.next(frequency);

        if actual == expected {
            counter.pass();
            continue;
        }

        // A non-advancing period is a duplicate, already reported by the
        // duplicate scan; the walk only cares about forward holes.
        if actual <= expected {
            counter.pass();
            continue;
        }

        let mut missing = Vec::new();
        let mut cursor = expected;
        while cursor < actual && missing.len() < cap {
            missing.push(cursor.label(frequency));
            cursor = cursor.next(frequency);
        }

        if missing.is_empty() {
            counter.pass();
            continue;
        }

        counter.fail();
        let gap = usize::try_from(prev.distance(actual, frequency) - 1).unwrap_or(missing.len());
        let listed: Vec<String> = missing.iter().take(limits.listed_periods).cloned().collect();

        issues.push(Issue::new(
            CheckType::TimelineGap,
            Some(group.indicator.clone()),
            Some(group.filter.clone()),
            Severity::Warning,
            format!(
                "Timeline gap in {} / {} ({}): {} missing period(s) between {} and {} ({})",
                group.indicator,
                group.filter,
                frequency,
                gap,
                prev.label(frequency),
                actual.label(frequency),
                listed.join(", ")
            ),
            IssueDetails::TimelineGap {
                from: prev.label(frequency),
                to: actual.label(frequency),
                gap,
                missing_periods: listed,
                frequency,
            },
        ));

        missing_map.entry(group.key()).or_default().extend(missing);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::{global_year_range, group_records};
    use crate::domain::record::DataRecord;

    fn walk(records: &[DataRecord]) -> (Vec<Issue>, BTreeMap<String, Vec<String>>) {
        let groups = group_records(records);
        let global = global_year_range(records);
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        let mut missing = BTreeMap::new();
        check_timeline(
            &groups,
            global,
            &AnalyzerLimits::default(),
            &mut issues,
            &mut counter,
            &mut missing,
        );
        (issues, missing)
    }

    #[test]
    fn test_yearly_gap_enumeration() {
        // 2018, 2019, 2022: one gap issue for the 2019 -> 2022 transition.
        let records = vec![
            DataRecord::new("GDP", "Total", 2018, 1.0),
            DataRecord::new("GDP", "Total", 2019, 1.1),
            DataRecord::new("GDP", "Total", 2022, 1.2),
        ];
        let (issues, missing) = walk(&records);
        assert_eq!(issues.len(), 1);
        match &issues[0].details {
            IssueDetails::TimelineGap { from, to, gap, missing_periods, frequency } => {
                assert_eq!(from, "2019");
                assert_eq!(to, "2022");
                assert_eq!(*gap, 2);
                assert_eq!(missing_periods, &vec!["2020".to_string(), "2021".to_string()]);
                assert_eq!(*frequency, Frequency::Yearly);
            }
            other => panic!("unexpected details: {:?}", other),
        }
        assert_eq!(
            missing.get("GDP|Total").unwrap(),
            &vec!["2020".to_string(), "2021".to_string()]
        );
    }

    #[test]
    fn test_monthly_gap_enumeration() {
        let records = vec![
            DataRecord::new("CPI", "Urban", 2023, 1.0).with_month(1),
            DataRecord::new("CPI", "Urban", 2023, 1.1).with_month(4),
        ];
        let (issues, _) = walk(&records);
        assert_eq!(issues.len(), 1);
        match &issues[0].details {
            IssueDetails::TimelineGap { gap, missing_periods, frequency, .. } => {
                assert_eq!(*gap, 2);
                assert_eq!(
                    missing_periods,
                    &vec!["2023-02".to_string(), "2023-03".to_string()]
                );
                assert_eq!(*frequency, Frequency::Monthly);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_monthly_gap_wraps_year_boundary() {
        let records = vec![
            DataRecord::new("CPI", "Urban", 2022, 1.0).with_month(12),
            DataRecord::new("CPI", "Urban", 2023, 1.1).with_month(2),
        ];
        let (issues, _) = walk(&records);
        assert_eq!(issues.len(), 1);
        match &issues[0].details {
            IssueDetails::TimelineGap { missing_periods, .. } => {
                assert_eq!(missing_periods, &vec!["2023-01".to_string()]);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_quarterly_gap_wraps_year_boundary() {
        let records = vec![
            DataRecord::new("GDP", "Total", 2022, 1.0).with_quarter(4),
            DataRecord::new("GDP", "Total", 2023, 1.1).with_quarter(3),
        ];
        let (issues, _) = walk(&records);
        assert_eq!(issues.len(), 1);
        match &issues[0].details {
            IssueDetails::TimelineGap { gap, missing_periods, .. } => {
                assert_eq!(*gap, 2);
                assert_eq!(
                    missing_periods,
                    &vec!["2023-Q1".to_string(), "2023-Q2".to_string()]
                );
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_contiguous_series_is_clean() {
        let records = vec![
            DataRecord::new("GDP", "Total", 2021, 1.0),
            DataRecord::new("GDP", "Total", 2022, 1.1),
            DataRecord::new("GDP", "Total", 2023, 1.2),
        ];
        let (issues, missing) = walk(&records);
        assert!(issues.is_empty());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_late_start_flagged_against_global_range() {
        // "Births" spans 2019-2021; "Deaths" only 2021. Two leading years
        // are missing relative to the widest series in the file.
        let records = vec![
            DataRecord::new("Births", "Total", 2019, 1.0),
            DataRecord::new("Births", "Total", 2020, 1.0),
            DataRecord::new("Births", "Total", 2021, 1.0),
            DataRecord::new("Deaths", "Total", 2021, 1.0),
        ];
        let (issues, _) = walk(&records);
        let deaths: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.indicator_name.as_deref() == Some("Deaths"))
            .collect();
        assert_eq!(deaths.len(), 2);
        let listed: Vec<String> = deaths
            .iter()
            .filter_map(|i| match &i.details {
                IssueDetails::TimelineGap { missing_periods, .. } => {
                    missing_periods.first().cloned()
                }
                _ => None,
            })
            .collect();
        assert_eq!(listed, vec!["2019".to_string(), "2020".to_string()]);
    }

    #[test]
    fn test_early_end_flagged_against_global_range() {
        let records = vec![
            DataRecord::new("Births", "Total", 2019, 1.0),
            DataRecord::new("Births", "Total", 2020, 1.0),
            DataRecord::new("Deaths", "Total", 2019, 1.0),
        ];
        let (issues, _) = walk(&records);
        let deaths: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.indicator_name.as_deref() == Some("Deaths"))
            .collect();
        assert_eq!(deaths.len(), 1);
        assert!(deaths[0].message.contains("ends in 2019"));
    }

    #[test]
    fn test_coverage_check_skips_monthly_groups() {
        // The global-range comparison only applies to yearly groups.
        let records = vec![
            DataRecord::new("Births", "Total", 2019, 1.0),
            DataRecord::new("Births", "Total", 2020, 1.0),
            DataRecord::new("CPI", "Urban", 2020, 1.0).with_month(1),
            DataRecord::new("CPI", "Urban", 2020, 1.0).with_month(2),
        ];
        let (issues, _) = walk(&records);
        assert!(issues
            .iter()
            .all(|i| i.indicator_name.as_deref() != Some("CPI")));
    }

    #[test]
    fn test_duplicate_period_does_not_produce_gap() {
        let records = vec![
            DataRecord::new("GDP", "Total", 2021, 1.0),
            DataRecord::new("GDP", "Total", 2021, 2.0),
            DataRecord::new("GDP", "Total", 2022, 1.1),
        ];
        let (issues, _) = walk(&records);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_enumeration_respects_cap() {
        let records = vec![
            DataRecord::new("GDP", "Total", 1900, 1.0),
            DataRecord::new("GDP", "Total", 2000, 1.1),
        ];
        let groups = group_records(&records);
        let mut issues = Vec::new();
        let mut counter = CheckCounter::default();
        let mut missing = BTreeMap::new();
        let limits = AnalyzerLimits::default();
        check_timeline(&groups, None, &limits, &mut issues, &mut counter, &mut missing);
        assert_eq!(issues.len(), 1);
        match &issues[0].details {
            IssueDetails::TimelineGap { gap, missing_periods, .. } => {
                // 99 years truly missing; enumeration capped at 50 and the
                // listed labels at 10.
                assert_eq!(*gap, 99);
                assert_eq!(missing_periods.len(), limits.listed_periods);
            }
            other => panic!("unexpected details: {:?}", other),
        }
        assert_eq!(missing.get("GDP|Total").unwrap().len(), limits.yearly_gap_cap);
    }
}
