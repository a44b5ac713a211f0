// qualis-core/src/ports/store.rs

// This file defines what the lifecycle layer needs from persistence,
// without knowing how it is done. The engine itself is pure; statuses and
// results are threaded through this seam instead of ambient storage, so a
// caller can plug a file, a database or an in-memory map.

use crate::domain::report::QaResults;
use crate::domain::status::IssueStatus;
use crate::error::QualisError;

pub trait StatusStore {
    /// Every persisted status entry. Missing backing storage yields an
    /// empty collection, not an error.
    fn load_statuses(&self) -> Result<Vec<IssueStatus>, QualisError>;

    fn save_statuses(&self, statuses: &[IssueStatus]) -> Result<(), QualisError>;

    /// The last persisted analysis run, if any.
    fn load_results(&self) -> Result<Option<QaResults>, QualisError>;

    fn save_results(&self, results: &QaResults) -> Result<(), QualisError>;
}
