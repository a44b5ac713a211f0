// qualis-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(qualis::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- DATASET (CSV) ---
    #[error("CSV Parsing Error: {0}")]
    #[diagnostic(
        code(qualis::infra::csv),
        help("Check the delimiter and that every row has as many cells as the header.")
    )]
    Csv(#[from] csv::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(qualis::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    // --- RESULTS / STATUSES (JSON) ---
    #[error("JSON Error: {0}")]
    #[diagnostic(
        code(qualis::infra::json),
        help("The results/statuses file is corrupt or from an incompatible version.")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(qualis::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Dataset column '{0}' not found in the CSV header")]
    #[diagnostic(
        code(qualis::infra::missing_column),
        help("Expected headers: indicator, filter, year, value and optionally month, quarter or period.")
    )]
    MissingHeader(String),
}
