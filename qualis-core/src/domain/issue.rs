// qualis-core/src/domain/issue.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh64::xxh64;

use crate::domain::record::Frequency;

/// Fixed taxonomy of defect categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    MissingColumns,
    MissingData,
    DataTypeError,
    DuplicateRecords,
    TimelineGap,
    ValueRange,
    StatisticalAnomaly,
    SystemError,
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingColumns => "Missing Columns",
            Self::MissingData => "Missing Data",
            Self::DataTypeError => "Data Type Error",
            Self::DuplicateRecords => "Duplicate Records",
            Self::TimelineGap => "Timeline Gap",
            Self::ValueRange => "Value Range",
            Self::StatisticalAnomaly => "Statistical Anomaly",
            Self::SystemError => "System Error",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Penalty weight applied by the quality scorer.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Critical => 10.0,
            Self::Warning => 5.0,
            Self::Info => 2.0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// What fired a statistical anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyTrigger {
    ZScore,
    SharpChange {
        percent_change: f64,
        average_change: f64,
    },
}

/// Check-specific evidence, one variant per `CheckType`.
///
/// The discriminated shape keeps the wire format self-describing while
/// giving every check a strongly typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueDetails {
    MissingColumns {
        missing: Vec<String>,
    },
    MissingData {
        row: usize,
        fields: Vec<String>,
    },
    DataTypeError {
        row: usize,
        raw_value: String,
        year: Option<i32>,
        month: Option<i32>,
        quarter: Option<i32>,
    },
    DuplicateRecord {
        period: String,
        year: Option<i32>,
        month: Option<i32>,
        quarter: Option<i32>,
        occurrence: usize,
    },
    TimelineGap {
        from: String,
        to: String,
        gap: usize,
        /// First few missing labels only; `gap` carries the full count.
        missing_periods: Vec<String>,
        frequency: Frequency,
    },
    ValueRange {
        period: String,
        year: Option<i32>,
        month: Option<i32>,
        quarter: Option<i32>,
        value: f64,
    },
    StatisticalAnomaly {
        period: String,
        year: Option<i32>,
        month: Option<i32>,
        quarter: Option<i32>,
        value: f64,
        z_score: f64,
        trigger: AnomalyTrigger,
    },
    SystemError {
        reason: String,
    },
}

impl IssueDetails {
    /// Period coordinates used for semantic matching across analyzer runs.
    /// Gap and dataset-level issues carry no single period and match on
    /// scope alone.
    pub fn period_fields(&self) -> (Option<i32>, Option<i32>, Option<i32>) {
        match self {
            Self::DataTypeError { year, month, quarter, .. }
            | Self::DuplicateRecord { year, month, quarter, .. }
            | Self::ValueRange { year, month, quarter, .. }
            | Self::StatisticalAnomaly { year, month, quarter, .. } => (*year, *month, *quarter),
            Self::MissingColumns { .. }
            | Self::MissingData { .. }
            | Self::TimelineGap { .. }
            | Self::SystemError { .. } => (None, None, None),
        }
    }

    /// Compact discriminator folded into the issue id so that two defects of
    /// the same type in the same scope still get distinct ids.
    fn fingerprint(&self) -> String {
        match self {
            Self::MissingColumns { .. } => "columns".to_string(),
            Self::MissingData { row, .. } => format!("row:{}", row),
            Self::DataTypeError { row, .. } => format!("type:{}", row),
            Self::DuplicateRecord { period, occurrence, .. } => {
                format!("dup:{}:{}", period, occurrence)
            }
            Self::TimelineGap { from, to, .. } => format!("gap:{}->{}", from, to),
            Self::ValueRange { period, .. } => format!("neg:{}", period),
            Self::StatisticalAnomaly { period, .. } => format!("anomaly:{}", period),
            Self::SystemError { .. } => "system".to_string(),
        }
    }
}

/// One detected defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Deterministic id: xxh64 over checkType|indicator|filter|fingerprint.
    /// Stable across re-runs on identical data, so callers can persist ids
    /// without bookkeeping around regeneration.
    pub id: String,
    pub check_type: CheckType,
    pub indicator_name: Option<String>,
    pub filter_name: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub details: IssueDetails,
}

impl Issue {
    pub fn new(
        check_type: CheckType,
        indicator_name: Option<String>,
        filter_name: Option<String>,
        severity: Severity,
        message: String,
        details: IssueDetails,
    ) -> Self {
        let seed = format!(
            "{}|{}|{}|{}",
            check_type,
            indicator_name.as_deref().unwrap_or(""),
            filter_name.as_deref().unwrap_or(""),
            details.fingerprint()
        );
        let id = format!("{:016x}", xxh64(seed.as_bytes(), 0));
        Self {
            id,
            check_type,
            indicator_name,
            filter_name,
            severity,
            message,
            details,
        }
    }

    /// Semantic identity: (checkType, indicator, filter, year, month, quarter).
    /// Lifecycle matching uses this, never the id, so an issue survives a
    /// re-run even if its message wording changes.
    pub fn semantic_key(&self) -> SemanticKey<'_> {
        let (year, month, quarter) = self.details.period_fields();
        SemanticKey {
            check_type: self.check_type,
            indicator_name: self.indicator_name.as_deref(),
            filter_name: self.filter_name.as_deref(),
            year,
            month,
            quarter,
        }
    }

    pub fn matches(&self, other: &Issue) -> bool {
        self.semantic_key() == other.semantic_key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticKey<'a> {
    pub check_type: CheckType,
    pub indicator_name: Option<&'a str>,
    pub filter_name: Option<&'a str>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub quarter: Option<i32>,
}
