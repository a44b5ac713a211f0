// qualis-core/src/infrastructure/loader.rs
//
// CSV adapter: turns a delimited file into the flat record list the engine
// consumes. Parsing is deliberately lenient: a junk year or month becomes
// `None` and the analyzer reports it as an Issue; the loader only fails on
// real I/O or structural CSV problems.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use regex::Regex;
use tracing::{info, instrument};

use crate::domain::record::{DataRecord, FieldValue};
use crate::infrastructure::error::InfrastructureError;

/// Header names the loader recognizes. `indicator`, `filter`, `year` and
/// `value` are required; granularity comes from `month`, `quarter` or a
/// combined `period` column (`2023`, `2023-07`, `2023-Q3`).
const HEADER_INDICATOR: &str = "indicator";
const HEADER_FILTER: &str = "filter";
const HEADER_YEAR: &str = "year";
const HEADER_VALUE: &str = "value";
const HEADER_MONTH: &str = "month";
const HEADER_QUARTER: &str = "quarter";
const HEADER_PERIOD: &str = "period";

pub struct CsvLoader {
    // Compiled once at construction, reused across every row.
    period_pattern: Regex,
}

impl CsvLoader {
    pub fn new() -> Result<Self, InfrastructureError> {
        let period_pattern = Regex::new(r"^(\d{4})(?:-(?:Q([1-4])|(\d{1,2})))?$")
            .map_err(|e| InfrastructureError::ConfigError(format!("Invalid period regex: {}", e)))?;
        Ok(Self { period_pattern })
    }

    #[instrument(skip(self))]
    pub fn load(&self, path: &Path) -> Result<Vec<DataRecord>, InfrastructureError> {
        let file = File::open(path)?;
        let records = self.load_from_reader(file)?;
        info!(path = ?path, rows = records.len(), "dataset loaded");
        Ok(records)
    }

    pub fn load_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<DataRecord>, InfrastructureError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| -> Option<usize> {
            headers.iter().position(|h| h.eq_ignore_ascii_case(name))
        };

        let idx_indicator = column(HEADER_INDICATOR)
            .ok_or_else(|| InfrastructureError::MissingHeader(HEADER_INDICATOR.to_string()))?;
        let idx_filter = column(HEADER_FILTER)
            .ok_or_else(|| InfrastructureError::MissingHeader(HEADER_FILTER.to_string()))?;
        let idx_value = column(HEADER_VALUE)
            .ok_or_else(|| InfrastructureError::MissingHeader(HEADER_VALUE.to_string()))?;

        // Either a plain year column or a combined period column must exist.
        let idx_year = column(HEADER_YEAR);
        let idx_period = column(HEADER_PERIOD);
        if idx_year.is_none() && idx_period.is_none() {
            return Err(InfrastructureError::MissingHeader(HEADER_YEAR.to_string()));
        }
        let idx_month = column(HEADER_MONTH);
        let idx_quarter = column(HEADER_QUARTER);

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let cell = |idx: Option<usize>| -> Option<&str> {
                idx.and_then(|i| row.get(i)).filter(|s| !s.is_empty())
            };

            let mut record = DataRecord {
                indicator_name: cell(Some(idx_indicator)).map(String::from),
                filter_name: cell(Some(idx_filter)).map(String::from),
                year: cell(idx_year).and_then(parse_lenient_int),
                value: cell(Some(idx_value)).map(parse_value),
                month: cell(idx_month).and_then(parse_lenient_int),
                quarter: cell(idx_quarter).and_then(parse_lenient_int),
            };

            // A combined period column fills whatever the dedicated
            // columns left empty.
            if let Some(period) = cell(idx_period) {
                self.apply_period(&mut record, period);
            }

            records.push(record);
        }

        Ok(records)
    }

    fn apply_period(&self, record: &mut DataRecord, period: &str) {
        let Some(caps) = self.period_pattern.captures(period.trim()) else {
            return;
        };
        if record.year.is_none() {
            record.year = caps.get(1).and_then(|m| m.as_str().parse().ok());
        }
        if record.quarter.is_none() {
            record.quarter = caps.get(2).and_then(|m| m.as_str().parse().ok());
        }
        if record.month.is_none() {
            record.month = caps.get(3).and_then(|m| m.as_str().parse().ok());
        }
    }
}

/// "n/a", "nan" and unparseable text map to None; the analyzer decides
/// whether the absence is a defect.
fn parse_lenient_int(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
    {
        return None;
    }
    trimmed.parse::<i32>().ok()
}

/// Values keep their raw text when not numeric so the type check can show
/// the offending cell verbatim.
fn parse_value(raw: &str) -> FieldValue {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(raw.to_string()),
    }
}
