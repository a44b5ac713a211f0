// qualis-core/src/domain/status.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Lifecycle state a user (or the revalidation pass) assigns to an issue,
/// independent of whether the issue still exists in the latest analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Active,
    Resolved,
    Dismissed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Resolved => write!(f, "resolved"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

impl FromStr for IssueState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(DomainError::UnknownState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMetadata {
    #[serde(default)]
    pub auto_resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One status entry. The core produces and consumes these; it never deletes
/// them; persistence belongs to the caller (see `ports::store`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub issue_id: String,
    pub state: IssueState,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StatusMetadata>,
}

impl IssueStatus {
    pub fn new(issue_id: impl Into<String>, state: IssueState, updated_by: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            state,
            updated_at: Utc::now(),
            updated_by: updated_by.into(),
            metadata: None,
        }
    }

    /// Marks an entry the revalidation pass closed on its own after a data
    /// edit removed the underlying defect.
    pub fn auto_resolved(issue_id: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            state: IssueState::Resolved,
            updated_at: Utc::now(),
            updated_by: "qualis".to_string(),
            metadata: Some(StatusMetadata {
                auto_resolved: true,
                note: None,
            }),
        }
    }
}

/// Latest status entry for an issue id, if any. Later entries win so a
/// collection carrying history still resolves to the current state.
pub fn status_for<'a>(statuses: &'a [IssueStatus], issue_id: &str) -> Option<&'a IssueStatus> {
    statuses.iter().rev().find(|s| s.issue_id == issue_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parsing() {
        assert_eq!("Active".parse::<IssueState>().unwrap(), IssueState::Active);
        assert_eq!(
            "dismissed".parse::<IssueState>().unwrap(),
            IssueState::Dismissed
        );
        assert!("gone".parse::<IssueState>().is_err());
    }

    #[test]
    fn test_latest_entry_wins() {
        let history = vec![
            IssueStatus::new("abc", IssueState::Active, "alice"),
            IssueStatus::new("abc", IssueState::Dismissed, "bob"),
        ];
        let latest = status_for(&history, "abc").unwrap();
        assert_eq!(latest.state, IssueState::Dismissed);
        assert_eq!(latest.updated_by, "bob");
        assert!(status_for(&history, "zzz").is_none());
    }

    #[test]
    fn test_auto_resolved_metadata() {
        let status = IssueStatus::auto_resolved("abc");
        assert_eq!(status.state, IssueState::Resolved);
        assert!(status.metadata.unwrap().auto_resolved);
        assert_eq!(status.updated_by, "qualis");
    }
}
