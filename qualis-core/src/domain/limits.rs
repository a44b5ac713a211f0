// qualis-core/src/domain/limits.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;

/// Performance caps and detection thresholds.
///
/// The defaults match the behavior of a UI-thread deployment (bounded
/// sampling, group-size skip, indicator cap). A backend with dedicated
/// worker capacity can raise them per deployment via YAML or env overrides
/// instead of a code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalyzerLimits {
    /// How many leading records the Missing Data check samples.
    #[serde(default = "default_missing_data_sample")]
    #[validate(range(min = 1))]
    pub missing_data_sample: usize,

    /// Filter groups larger than this are skipped by the statistical pass.
    #[serde(default = "default_stats_group_limit")]
    #[validate(range(min = 1))]
    pub stats_group_limit: usize,

    /// How many distinct indicators the statistical pass analyzes.
    #[serde(default = "default_indicator_limit")]
    #[validate(range(min = 1))]
    pub indicator_limit: usize,

    /// |z| above this flags an outlier.
    #[serde(default = "default_z_score_threshold")]
    #[validate(range(min = 0.1))]
    pub z_score_threshold: f64,

    /// |z| above this upgrades an anomaly from info to warning.
    #[serde(default = "default_z_score_warning")]
    #[validate(range(min = 0.1))]
    pub z_score_warning: f64,

    /// Enumeration caps per gap, by frequency.
    #[serde(default = "default_monthly_gap_cap")]
    #[validate(range(min = 1))]
    pub monthly_gap_cap: usize,

    #[serde(default = "default_quarterly_gap_cap")]
    #[validate(range(min = 1))]
    pub quarterly_gap_cap: usize,

    #[serde(default = "default_yearly_gap_cap")]
    #[validate(range(min = 1))]
    pub yearly_gap_cap: usize,

    /// How many missing period labels a gap issue lists verbatim.
    #[serde(default = "default_listed_periods")]
    #[validate(range(min = 1))]
    pub listed_periods: usize,
}

impl Default for AnalyzerLimits {
    fn default() -> Self {
        Self {
            missing_data_sample: default_missing_data_sample(),
            stats_group_limit: default_stats_group_limit(),
            indicator_limit: default_indicator_limit(),
            z_score_threshold: default_z_score_threshold(),
            z_score_warning: default_z_score_warning(),
            monthly_gap_cap: default_monthly_gap_cap(),
            quarterly_gap_cap: default_quarterly_gap_cap(),
            yearly_gap_cap: default_yearly_gap_cap(),
            listed_periods: default_listed_periods(),
        }
    }
}

impl AnalyzerLimits {
    /// Full validation pass, including the cross-field constraint the derive
    /// cannot express (warning threshold must sit above the flag threshold).
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidLimits(e.to_string()))?;
        if self.z_score_warning < self.z_score_threshold {
            return Err(DomainError::InvalidLimits(format!(
                "z_score_warning ({}) must be >= z_score_threshold ({})",
                self.z_score_warning, self.z_score_threshold
            )));
        }
        Ok(())
    }
}

fn default_missing_data_sample() -> usize {
    100
}
fn default_stats_group_limit() -> usize {
    500
}
fn default_indicator_limit() -> usize {
    100
}
fn default_z_score_threshold() -> f64 {
    2.5
}
fn default_z_score_warning() -> f64 {
    3.0
}
fn default_monthly_gap_cap() -> usize {
    100
}
fn default_quarterly_gap_cap() -> usize {
    100
}
fn default_yearly_gap_cap() -> usize {
    50
}
fn default_listed_periods() -> usize {
    10
}
