// qualis-core/src/domain/record.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A raw cell value as it arrives from a loader.
/// Datasets in the wild carry numbers serialized as strings, so the numeric
/// view (`as_f64`) coerces text on demand instead of rejecting it upfront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the cell. Non-finite numbers and unparseable text
    /// yield `None`; the caller decides whether that is a defect.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// The raw representation, for error messages.
    pub fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// One observation of a statistical series.
///
/// Every business field is optional at the type level: a record missing its
/// indicator or value is still a valid `DataRecord`. The analyzer turns the
/// missing field into an Issue instead of refusing the input (the engine
/// never fails on malformed business data).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    #[serde(default)]
    pub indicator_name: Option<String>,
    #[serde(default)]
    pub filter_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub year: Option<i32>,
    #[serde(default)]
    pub value: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub month: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub quarter: Option<i32>,
}

pub const REQUIRED_FIELDS: [&str; 4] = ["indicator_name", "filter_name", "year", "value"];

impl DataRecord {
    pub fn new(
        indicator: impl Into<String>,
        filter: impl Into<String>,
        year: i32,
        value: f64,
    ) -> Self {
        Self {
            indicator_name: Some(indicator.into()),
            filter_name: Some(filter.into()),
            year: Some(year),
            value: Some(FieldValue::Number(value)),
            month: None,
            quarter: None,
        }
    }

    #[must_use]
    pub fn with_month(mut self, month: i32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn with_quarter(mut self, quarter: i32) -> Self {
        self.quarter = Some(quarter);
        self
    }

    /// Month if it falls in the valid 1..=12 range.
    pub fn valid_month(&self) -> Option<i32> {
        self.month.filter(|m| (1..=12).contains(m))
    }

    /// Quarter if it falls in the valid 1..=4 range.
    pub fn valid_quarter(&self) -> Option<i32> {
        self.quarter.filter(|q| (1..=4).contains(q))
    }

    /// Names of the required fields this record lacks (null or empty string).
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.indicator_name.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("indicator_name");
        }
        if self.filter_name.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("filter_name");
        }
        if self.year.is_none() {
            missing.push("year");
        }
        if self.value.as_ref().is_none_or(FieldValue::is_empty_text) {
            missing.push("value");
        }
        missing
    }

    /// Composite tag used for duplicate detection: `M{month}` beats
    /// `Q{quarter}` beats plain `Y`, mirroring the granularity precedence.
    pub fn period_tag(&self) -> String {
        if let Some(m) = self.valid_month() {
            format!("M{}", m)
        } else if let Some(q) = self.valid_quarter() {
            format!("Q{}", q)
        } else {
            "Y".to_string()
        }
    }

    /// Human period label: `2023-03`, `2023-Q1` or `2023`.
    pub fn period_label(&self) -> String {
        let year = self.year.unwrap_or_default();
        if let Some(m) = self.valid_month() {
            format!("{}-{:02}", year, m)
        } else if let Some(q) = self.valid_quarter() {
            format!("{}-Q{}", year, q)
        } else {
            year.to_string()
        }
    }

    /// Chronological sort key: (year, quarter, month), missing parts first.
    pub fn sort_key(&self) -> (i32, i32, i32) {
        (
            self.year.unwrap_or(i32::MIN),
            self.valid_quarter().unwrap_or(0),
            self.valid_month().unwrap_or(0),
        )
    }

    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(FieldValue::as_f64)
    }
}

/// Detected temporal granularity of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Precedence: monthly beats quarterly beats yearly, even in mixed
    /// groups: a single record with a valid month flips the whole group.
    pub fn detect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DataRecord>,
    {
        let mut has_quarter = false;
        for record in records {
            if record.valid_month().is_some() {
                return Self::Monthly;
            }
            has_quarter |= record.valid_quarter().is_some();
        }
        if has_quarter {
            Self::Quarterly
        } else {
            Self::Yearly
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// Accepts integers, floats and numeric strings; junk ("n/a", "nan", "")
/// becomes `None` rather than a deserialization failure.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Int(i)) => i32::try_from(i).ok(),
        Some(Raw::Float(f)) if f.is_finite() && f.fract() == 0.0 => Some(f as i32),
        Some(Raw::Float(_)) => None,
        Some(Raw::Text(s)) => s.trim().parse::<i32>().ok(),
    };
    Ok(parsed)
}
