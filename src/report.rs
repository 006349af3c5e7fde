//! Run reports.
//!
//! A report is the persisted artifact of one run: its parameters, its
//! counters and every collision found. Reports are written once, at the end
//! of a run, as CSV (results only) or JSON (everything).

use crate::error::{ReportError, ReportResult};
use crate::output::{to_json, write_csv};
use crate::scanner::{CollisionResult, RunSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Format of a report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// One row per result with a header row
    #[default]
    Csv,
    /// Full report including run parameters and counters
    Json,
}

/// The record of one collision run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run was started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Total run duration in milliseconds.
    pub duration_ms: u64,
    /// Port list used.
    pub ports: String,
    /// Concurrency used.
    pub concurrency: usize,
    /// Targets generated.
    pub total: usize,
    /// Targets dispatched.
    pub attempted: usize,
    /// Targets with a result.
    pub found: usize,
    /// Whether the run was stopped early.
    pub stopped: bool,
    /// Collision results, in completion order.
    pub results: Vec<CollisionResult>,
}

impl RunReport {
    /// Start a report for a run about to begin.
    pub fn new(ports: impl Into<String>, concurrency: usize) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            completed_at: now,
            duration_ms: 0,
            ports: ports.into(),
            concurrency,
            total: 0,
            attempted: 0,
            found: 0,
            stopped: false,
            results: Vec::new(),
        }
    }

    /// Finalize the report with the run's outcome.
    pub fn finalize(mut self, summary: RunSummary, results: Vec<CollisionResult>) -> Self {
        self.completed_at = Utc::now();
        self.duration_ms = (self.completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self.total = summary.total;
        self.attempted = summary.attempted;
        self.found = summary.found;
        self.stopped = summary.stopped;
        self.results = results;
        self
    }

    /// One-line summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "checked {} of {} targets, found {} results [{:.2}s]{}",
            self.attempted,
            self.total,
            self.found,
            self.duration_ms as f64 / 1000.0,
            if self.stopped { " (stopped)" } else { "" }
        )
    }

    /// Write the report to a file.
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> ReportResult<()> {
        let file = File::create(path).map_err(|e| ReportError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);

        match format {
            ReportFormat::Csv => write_csv(&mut writer, &self.results)?,
            ReportFormat::Json => writer.write_all(to_json(self)?.as_bytes())?,
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::read_csv;
    use crate::types::Port;

    fn result(domain: &str, title: &str) -> CollisionResult {
        CollisionResult {
            url: "https://10.1.2.3:443".to_string(),
            domain: domain.to_string(),
            ip: "10.1.2.3".parse().unwrap(),
            port: Port::HTTPS,
            title: title.to_string(),
            status_code: 200,
            content_length: 512,
        }
    }

    fn summary(found: usize) -> RunSummary {
        RunSummary {
            total: 10,
            attempted: 8,
            found,
            stopped: true,
        }
    }

    #[test]
    fn test_finalize() {
        let report = RunReport::new("80,443", 50)
            .finalize(summary(1), vec![result("a.example.com", "A")]);

        assert_eq!(report.total, 10);
        assert_eq!(report.attempted, 8);
        assert_eq!(report.found, 1);
        assert!(report.completed_at >= report.started_at);
        assert!(report.summary().contains("checked 8 of 10 targets"));
        assert!(report.summary().ends_with("(stopped)"));
    }

    #[test]
    fn test_write_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let results = vec![result("a.example.com", "Hello, world"), result("b.example.com", "")];
        let report = RunReport::new("443", 10).finalize(summary(2), results.clone());

        report.write_to(&path, ReportFormat::Csv).unwrap();

        let parsed = read_csv(File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed, results);
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = RunReport::new("80,443", 50).finalize(summary(1), vec![result("a.example.com", "A")]);

        report.write_to(&path, ReportFormat::Json).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: RunReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.results, report.results);
        assert_eq!(parsed.ports, "80,443");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let report = RunReport::new("80", 1);
        let err = report
            .write_to(Path::new("/nonexistent/dir/report.csv"), ReportFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, ReportError::WriteFailed { .. }));
    }
}
