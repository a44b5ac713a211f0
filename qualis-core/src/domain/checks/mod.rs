// qualis-core/src/domain/checks/mod.rs

pub mod statistical;
pub mod structural;
pub mod temporal;

use std::collections::HashMap;

use crate::domain::record::DataRecord;

/// Pass/fail tally shared by every check. One increment per row, period or
/// value a check inspected, not per issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckCounter {
    pub passed: usize,
    pub failed: usize,
}

impl CheckCounter {
    pub fn pass(&mut self) {
        self.passed += 1;
    }

    pub fn fail(&mut self) {
        self.failed += 1;
    }

    pub fn record(&mut self, ok: bool) {
        if ok {
            self.pass();
        } else {
            self.fail();
        }
    }
}

/// All records of one indicator x filter combination, chronologically
/// sorted. Groups keep the dataset's first-seen order so results are
/// deterministic for identical input.
#[derive(Debug)]
pub struct FilterGroup<'a> {
    pub indicator: String,
    pub filter: String,
    pub records: Vec<&'a DataRecord>,
}

impl FilterGroup<'_> {
    /// Map key used for the missing-periods accumulator.
    pub fn key(&self) -> String {
        format!("{}|{}", self.indicator, self.filter)
    }
}

/// Groups records by (indicator, filter), preserving first-seen group order
/// and sorting each group by (year, quarter, month) ascending.
pub fn group_records(records: &[DataRecord]) -> Vec<FilterGroup<'_>> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<FilterGroup<'_>> = Vec::new();

    for record in records {
        let indicator = record.indicator_name.clone().unwrap_or_default();
        let filter = record.filter_name.clone().unwrap_or_default();
        let key = (indicator.clone(), filter.clone());
        let idx = *index.entry(key).or_insert_with(|| {
            groups.push(FilterGroup {
                indicator,
                filter,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].records.push(record);
    }

    for group in &mut groups {
        group.records.sort_by_key(|r| r.sort_key());
    }

    groups
}

/// Min/max year over the whole dataset, any indicator. Used to flag series
/// whose coverage starts late or ends early relative to the widest series.
pub fn global_year_range(records: &[DataRecord]) -> Option<(i32, i32)> {
    let mut range: Option<(i32, i32)> = None;
    for year in records.iter().filter_map(|r| r.year) {
        range = Some(match range {
            None => (year, year),
            Some((min, max)) => (min.min(year), max.max(year)),
        });
    }
    range
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let records = vec![
            DataRecord::new("CPI", "Urban", 2022, 1.0),
            DataRecord::new("GDP", "Total", 2021, 2.0),
            DataRecord::new("CPI", "Urban", 2020, 3.0),
            DataRecord::new("CPI", "Rural", 2021, 4.0),
        ];
        let groups = group_records(&records);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key(), "CPI|Urban");
        assert_eq!(groups[1].key(), "GDP|Total");
        assert_eq!(groups[2].key(), "CPI|Rural");
        // Within the group, chronological order.
        assert_eq!(groups[0].records[0].year, Some(2020));
        assert_eq!(groups[0].records[1].year, Some(2022));
    }

    #[test]
    fn test_global_year_range() {
        let records = vec![
            DataRecord::new("A", "F", 2019, 1.0),
            DataRecord::new("B", "F", 2024, 1.0),
            DataRecord::new("A", "F", 2021, 1.0),
        ];
        assert_eq!(global_year_range(&records), Some((2019, 2024)));
        assert_eq!(global_year_range(&[]), None);
    }

    #[test]
    fn test_counter_tally() {
        let mut counter = CheckCounter::default();
        counter.record(true);
        counter.record(false);
        counter.pass();
        assert_eq!(counter.passed, 2);
        assert_eq!(counter.failed, 1);
    }
}
