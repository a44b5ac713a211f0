// qualis-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid analyzer limits: {0}")]
    #[diagnostic(
        code(qualis::domain::limits),
        help("Every cap must be >= 1 and z_score_warning must sit above z_score_threshold.")
    )]
    InvalidLimits(String),

    #[error("Unknown issue state '{0}'")]
    #[diagnostic(
        code(qualis::domain::status),
        help("Expected one of: active, resolved, dismissed.")
    )]
    UnknownState(String),
}
