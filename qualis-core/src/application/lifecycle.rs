// qualis-core/src/application/lifecycle.rs
//
// Issue lifecycle after a data edit: re-run the analyzer, diff the old
// issue list against the fresh one on semantic identity, auto-resolve what
// the edit fixed, and recompute quality from the still-active subset.
// Nothing here persists anything; callers merge and save the returned
// collections through their own store.

use tracing::{debug, instrument};

use crate::application::analyzer::QaAnalyzer;
use crate::domain::issue::Issue;
use crate::domain::record::DataRecord;
use crate::domain::report::QaResults;
use crate::domain::score::QualityScore;
use crate::domain::scoring::calculate_quality_score;
use crate::domain::status::{status_for, IssueState, IssueStatus};

/// Outcome of one revalidation pass. `statuses` is the caller's collection
/// plus the auto-resolution entries. The input slice itself is untouched.
#[derive(Debug, Clone)]
pub struct RevalidationOutcome {
    /// The full fresh analysis bundle, ready to persist as-is.
    pub results: QaResults,
    pub statuses: Vec<IssueStatus>,
    pub auto_resolved_count: usize,
}

impl RevalidationOutcome {
    /// The freshly computed issue list (with fresh deterministic ids).
    pub fn updated_issues(&self) -> &[Issue] {
        &self.results.issues
    }
}

/// Re-validates after an edit using the given analyzer (so configured
/// limits carry over to the re-run).
#[instrument(skip_all, fields(records = records.len(), previous = previous_issues.len()))]
pub fn revalidate_with(
    analyzer: &QaAnalyzer,
    records: &[DataRecord],
    previous_issues: &[Issue],
    statuses: &[IssueStatus],
) -> RevalidationOutcome {
    let fresh = analyzer.process(records);
    let mut updated_statuses: Vec<IssueStatus> = statuses.to_vec();
    let mut auto_resolved_count = 0usize;

    for old in previous_issues {
        let still_exists = fresh.issues.iter().any(|new| new.matches(old));
        if still_exists {
            continue;
        }

        // Only untouched or explicitly active issues auto-resolve; a user's
        // resolved/dismissed verdict stands.
        let current = status_for(&updated_statuses, &old.id).map(|s| s.state);
        if !matches!(current, None | Some(IssueState::Active)) {
            continue;
        }

        debug!(issue = %old.id, check = %old.check_type, "auto-resolving fixed issue");
        let entry = IssueStatus::auto_resolved(old.id.clone());
        match updated_statuses.iter_mut().find(|s| s.issue_id == old.id) {
            Some(existing) => *existing = entry,
            None => updated_statuses.push(entry),
        }
        auto_resolved_count += 1;
    }

    RevalidationOutcome {
        results: fresh,
        statuses: updated_statuses,
        auto_resolved_count,
    }
}

/// Convenience entry point with the default analyzer limits.
pub fn revalidate_issues_after_edit(
    records: &[DataRecord],
    previous_issues: &[Issue],
    statuses: &[IssueStatus],
) -> RevalidationOutcome {
    revalidate_with(&QaAnalyzer::default(), records, previous_issues, statuses)
}

/// Issues with no status entry, or whose latest entry is still active.
/// Issues without an id are kept as a defensive fallback.
pub fn get_active_issues(issues: &[Issue], statuses: &[IssueStatus]) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| {
            if issue.id.is_empty() {
                return true;
            }
            match status_for(statuses, &issue.id) {
                None => true,
                Some(status) => status.state == IssueState::Active,
            }
        })
        .cloned()
        .collect()
}

/// Quality as the user currently sees it: resolving or dismissing an issue
/// improves the score immediately, without a dataset re-scan.
pub fn recalculate_quality_with_active_issues(
    records: &[DataRecord],
    issues: &[Issue],
    statuses: &[IssueStatus],
) -> QualityScore {
    let active = get_active_issues(issues, statuses);
    calculate_quality_score(records, &active)
}
