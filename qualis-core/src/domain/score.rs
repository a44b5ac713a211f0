// qualis-core/src/domain/score.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality band derived from the rounded overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Rating {
    /// Thresholds apply to the already-rounded 0..=100 score, so 94.999
    /// rates as excellent once rounded to 95.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 95 => Self::Excellent,
            s if s >= 80 => Self::Good,
            s if s >= 60 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Dimension scores, each 0-100. Accuracy is deliberately more tolerant
/// per issue than the other three dimensions (50x multiplier vs 100x).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub completeness: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub validity: f64,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self {
            completeness: 100.0,
            accuracy: 100.0,
            consistency: 100.0,
            validity: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl IssueCounts {
    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub name: String,
    pub score: u32,
    pub rating: Rating,
    pub row_count: usize,
    pub issues_count: IssueCounts,
}

/// Composite 0-100 quality metric for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub overall: u32,
    pub rating: Rating,
    pub breakdown: ScoreBreakdown,
    /// Sorted ascending by score, worst indicators first.
    pub indicators: Vec<IndicatorScore>,
}

impl Default for QualityScore {
    fn default() -> Self {
        Self {
            overall: 100,
            rating: Rating::Excellent,
            breakdown: ScoreBreakdown::default(),
            indicators: Vec::new(),
        }
    }
}
