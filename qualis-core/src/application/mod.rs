pub mod analyzer;
pub mod lifecycle;

pub use analyzer::{process_qa, QaAnalyzer};
pub use lifecycle::{
    get_active_issues, recalculate_quality_with_active_issues, revalidate_issues_after_edit,
    revalidate_with, RevalidationOutcome,
};
