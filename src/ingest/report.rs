//! Run accounting and the failure artifact

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::LoadError;
use crate::record::Record;

/// One record that failed row-level insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRow {
    /// The record, retained verbatim for offline inspection
    pub record: serde_json::Value,
    /// Why the insert failed
    pub reason: String,
}

/// Accounting for one ingestion run.
///
/// Created fresh per run; persisted to the failure artifact only when at
/// least one row failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Rows attempted
    pub attempted: usize,
    /// Rows committed
    pub inserted: usize,
    /// Rows skipped as duplicates
    pub skipped: usize,
    /// Rows that failed insertion
    pub failed: Vec<FailedRow>,
}

impl IngestionReport {
    /// Start a fresh report
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            attempted: 0,
            inserted: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }

    /// Record a committed row
    pub fn record_inserted(&mut self) {
        self.attempted += 1;
        self.inserted += 1;
    }

    /// Record a duplicate skip
    pub fn record_skipped(&mut self) {
        self.attempted += 1;
        self.skipped += 1;
    }

    /// Record a row-level failure, keeping the record verbatim
    pub fn record_failed(&mut self, record: &Record, reason: String) {
        self.attempted += 1;
        self.failed.push(FailedRow {
            record: record.to_json(),
            reason,
        });
    }

    /// Whether any row failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Write the failure artifact when non-empty.
    ///
    /// Returns whether a file was written.
    pub fn write_artifact(&self, path: &Path) -> Result<bool, LoadError> {
        if self.failed.is_empty() {
            return Ok(false);
        }

        let artifact = |reason: String| LoadError::Artifact {
            path: path.display().to_string(),
            reason,
        };

        let body =
            serde_json::to_string_pretty(&self.failed).map_err(|e| artifact(e.to_string()))?;
        let mut file = File::create(path).map_err(|e| artifact(e.to_string()))?;
        file.write_all(body.as_bytes())
            .map_err(|e| artifact(e.to_string()))?;
        Ok(true)
    }
}

impl Default for IngestionReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counters() {
        let mut report = IngestionReport::new();
        report.record_inserted();
        report.record_inserted();
        report.record_skipped();

        let record = Record::from_json(&serde_json::json!({"id": "bad"})).unwrap();
        report.record_failed(&record, "type mismatch".to_string());

        assert_eq!(report.attempted, 4);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_artifact_skipped_when_clean() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("problematic_entries.json");

        let report = IngestionReport::new();
        assert!(!report.write_artifact(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("problematic_entries.json");

        let mut report = IngestionReport::new();
        let record = Record::from_json(&serde_json::json!({"id": 1, "name": "x"})).unwrap();
        report.record_failed(&record, "boom".to_string());
        assert!(report.write_artifact(&path).unwrap());

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<FailedRow> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].record["id"], 1);
        assert_eq!(parsed[0].reason, "boom");
    }
}
