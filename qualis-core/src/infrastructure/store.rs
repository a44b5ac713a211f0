// qualis-core/src/infrastructure/store.rs
//
// File-backed adapter for the StatusStore port: one JSON file per
// collection inside a project directory. Writes are atomic so a crash
// mid-save never leaves a half-written statuses file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::domain::report::QaResults;
use crate::domain::status::IssueStatus;
use crate::error::QualisError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::store::StatusStore;

const STATUSES_FILE: &str = "statuses.json";
const RESULTS_FILE: &str = "results.json";

pub struct JsonStatusStore {
    dir: PathBuf,
}

impl JsonStatusStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn statuses_path(&self) -> PathBuf {
        self.dir.join(STATUSES_FILE)
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join(RESULTS_FILE)
    }

    fn ensure_dir(&self) -> Result<(), QualisError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Serializes pretty JSON and lands it via a temp file + rename, so a
    /// crash mid-save leaves either the old file or the new one, never a
    /// truncated mix.
    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<(), QualisError> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| QualisError::InternalError(format!("Serialization: {}", e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(InfrastructureError::Io)?;
        tmp.write_all(content.as_bytes()).map_err(InfrastructureError::Io)?;
        tmp.persist(path)
            .map_err(|e| InfrastructureError::Io(e.error))?;
        Ok(())
    }
}

impl StatusStore for JsonStatusStore {
    fn load_statuses(&self) -> Result<Vec<IssueStatus>, QualisError> {
        let path = self.statuses_path();
        if !path.exists() {
            debug!(path = ?path, "no statuses file yet, starting empty");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let statuses = serde_json::from_str(&content)
            .map_err(crate::infrastructure::error::InfrastructureError::JsonError)?;
        Ok(statuses)
    }

    fn save_statuses(&self, statuses: &[IssueStatus]) -> Result<(), QualisError> {
        self.write_json(&self.statuses_path(), &statuses)
    }

    fn load_results(&self) -> Result<Option<QaResults>, QualisError> {
        let path = self.results_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let results = serde_json::from_str(&content)
            .map_err(crate::infrastructure::error::InfrastructureError::JsonError)?;
        Ok(Some(results))
    }

    fn save_results(&self, results: &QaResults) -> Result<(), QualisError> {
        self.write_json(&self.results_path(), results)
    }
}
