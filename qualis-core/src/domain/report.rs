// qualis-core/src/domain/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::issue::{CheckType, Issue, Severity};
use crate::domain::score::QualityScore;

/// Aggregate counters for one analysis run.
///
/// `passed_checks` / `failed_checks` count *inspections* (one increment per
/// row, period or value a check looked at), not issues: several checks pass
/// rows that produced no issue, so the two denominators differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaSummary {
    pub total_indicators: usize,
    pub passed_checks: usize,
    pub failed_checks: usize,
    /// Failed counts per check type. No passed breakdown is kept per type.
    pub checks_by_type: BTreeMap<CheckType, usize>,
}

/// Everything one `process` call produced. Built fresh on every run and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResults {
    pub summary: QaSummary,
    pub issues: Vec<Issue>,
    pub processed_at: DateTime<Utc>,
    pub quality_score: QualityScore,
    /// Missing period labels per `indicator|filter` group.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub missing_periods: BTreeMap<String, Vec<String>>,
}

impl QaResults {
    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn issues_of_type(&self, check_type: CheckType) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.check_type == check_type)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::issue::IssueDetails;

    fn sample_results() -> QaResults {
        let issue = Issue::new(
            CheckType::SystemError,
            None,
            None,
            Severity::Critical,
            "No data provided".to_string(),
            IssueDetails::SystemError {
                reason: "empty dataset".to_string(),
            },
        );
        let mut checks_by_type = BTreeMap::new();
        checks_by_type.insert(CheckType::SystemError, 1);
        QaResults {
            summary: QaSummary {
                total_indicators: 0,
                passed_checks: 0,
                failed_checks: 1,
                checks_by_type,
            },
            issues: vec![issue],
            processed_at: Utc::now(),
            quality_score: QualityScore::default(),
            missing_periods: BTreeMap::new(),
        }
    }

    #[test]
    fn test_critical_detection() {
        let results = sample_results();
        assert!(results.has_critical_issues());
        assert_eq!(results.critical_count(), 1);
        assert_eq!(results.issues_of_type(CheckType::SystemError).len(), 1);
        assert_eq!(results.issues_of_type(CheckType::TimelineGap).len(), 0);
    }

    #[test]
    fn test_results_serialize_round_trip() {
        let results = sample_results();
        let json = serde_json::to_string(&results).unwrap();
        let back: QaResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}
