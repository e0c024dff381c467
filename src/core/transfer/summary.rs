//! Transfer outcomes and batch summaries
//!
//! Every item a transfer touches ends up as exactly one [`TransferOutcome`]; a
//! [`BatchSummary`] keeps the running counts.

use super::TransferOp;
use crate::core::report::Issue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Result status of one transferred item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Skipped,
    Failed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferStatus::Success => "success",
            TransferStatus::Skipped => "skipped",
            TransferStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one item (a file, a bundle entry or a resource)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    /// File name, bundle entry or `Type/id` the outcome refers to
    pub identifier: String,

    pub status: TransferStatus,

    /// Short explanation (created id, skip reason, error message)
    pub reason: Option<String>,

    /// Number of resources this outcome stands for. 1 except for a committed
    /// atomic transaction, which counts every entry.
    pub resources: usize,

    /// Server-reported issues, if any
    pub issues: Vec<Issue>,
}

impl TransferOutcome {
    fn new(identifier: impl Into<String>, status: TransferStatus, reason: String) -> Self {
        Self {
            identifier: identifier.into(),
            status,
            reason: Some(reason),
            resources: 1,
            issues: Vec::new(),
        }
    }

    pub fn success(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(identifier, TransferStatus::Success, reason.into())
    }

    pub fn skipped(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(identifier, TransferStatus::Skipped, reason.into())
    }

    pub fn failed(identifier: impl Into<String>, reason: impl ToString) -> Self {
        Self::new(identifier, TransferStatus::Failed, reason.to_string())
    }

    /// Set the number of resources covered
    pub fn with_resources(mut self, resources: usize) -> Self {
        self.resources = resources;
        self
    }

    /// Attach server issues
    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status == TransferStatus::Failed
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier, self.status)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

/// Summary of a bulk transfer
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Operation the batch ran, if any
    pub op: Option<TransferOp>,

    /// Resources attempted (succeeded + failed + skipped)
    pub attempted: usize,

    pub succeeded: usize,

    pub failed: usize,

    pub skipped: usize,

    /// Per-item outcomes in processing order
    pub outcomes: Vec<TransferOutcome>,

    pub started_at: DateTime<Utc>,

    pub duration: Duration,
}

impl BatchSummary {
    /// Create an empty summary for an operation
    pub fn new(op: TransferOp) -> Self {
        Self {
            op: Some(op),
            ..Self::default()
        }
    }

    /// Build a summary from already collected outcomes
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = TransferOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    /// Record one outcome and update the counters
    pub fn record(&mut self, outcome: TransferOutcome) {
        let n = outcome.resources;
        self.attempted += n;
        match outcome.status {
            TransferStatus::Success => self.succeeded += n,
            TransferStatus::Skipped => self.skipped += n,
            TransferStatus::Failed => self.failed += n,
        }
        self.outcomes.push(outcome);
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Failed outcomes
    pub fn failures(&self) -> impl Iterator<Item = &TransferOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// No failures
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            op = self.op.map(|op| op.to_string()).unwrap_or_default(),
            attempted = self.attempted,
            succeeded = self.succeeded,
            failed = self.failed,
            skipped = self.skipped,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Transfer completed"
        );

        if self.failed > 0 {
            tracing::warn!(failed = self.failed, "Transfer completed with failures");
            for outcome in self.failures() {
                tracing::warn!(
                    item = %outcome.identifier,
                    reason = outcome.reason.as_deref().unwrap_or(""),
                    "Transfer failure"
                );
            }
        }
    }

    /// Printable summary block
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Transfer Summary\n");
        out.push_str("================\n");
        if let Some(op) = self.op {
            out.push_str(&format!("Operation:  {op}\n"));
        }
        out.push_str(&format!(
            "Started:    {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("Attempted:  {}\n", self.attempted));
        out.push_str(&format!("Succeeded:  {}\n", self.succeeded));
        out.push_str(&format!("Failed:     {}\n", self.failed));
        out.push_str(&format!("Skipped:    {}\n", self.skipped));
        out.push_str(&format!("Duration:   {:.2}s\n", self.duration.as_secs_f64()));

        let failures: Vec<_> = self.failures().collect();
        if !failures.is_empty() {
            out.push_str("\nFailures:\n");
            for outcome in failures {
                out.push_str(&format!("  - {outcome}\n"));
                for issue in &outcome.issues {
                    out.push_str(&format!("      {issue}\n"));
                }
            }
        }
        out
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self {
            op: None,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
        }
    }
}
