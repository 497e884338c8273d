//! Validation report.
//!
//! The report is the whole contract with consumers: a headline verdict,
//! one outcome per check (status, count, ordered violations), the
//! ingestion errors that prevented checks from running, and summary
//! metrics. It serializes to byte-stable JSON.

mod summary;

pub use summary::TimetableSummary;

use serde::Serialize;

use crate::error::IngestError;
use crate::models::{CheckKind, Violation};

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Ran and found nothing.
    Pass,
    /// Ran and found violations.
    Fail,
    /// Could not run because its input was rejected.
    Skipped,
}

/// Headline verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub check: CheckKind,
    pub status: CheckStatus,
    /// Number of violations.
    pub count: usize,
    /// Human-readable one-line summary.
    pub summary: String,
    pub violations: Vec<Violation>,
}

/// Complete validation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub verdict: Verdict,
    /// One outcome per check, in [`CheckKind::ALL`] order.
    pub checks: Vec<CheckOutcome>,
    pub ingestion_errors: Vec<IngestError>,
    pub summary: TimetableSummary,
}

impl CheckOutcome {
    /// Outcome of a check that ran.
    pub fn completed(check: CheckKind, violations: Vec<Violation>) -> Self {
        let count = violations.len();
        let (status, summary) = if violations.is_empty() {
            (CheckStatus::Pass, format!("{check}: no violations"))
        } else {
            (CheckStatus::Fail, format!("{check}: {count} violation(s)"))
        };
        Self {
            check,
            status,
            count,
            summary,
            violations,
        }
    }

    /// Outcome of a check that could not run.
    pub fn skipped(check: CheckKind, reason: impl AsRef<str>) -> Self {
        Self {
            check,
            status: CheckStatus::Skipped,
            count: 0,
            summary: format!("{check}: skipped ({})", reason.as_ref()),
            violations: Vec::new(),
        }
    }

    /// Whether the check ran and found nothing.
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

impl Report {
    /// Aggregates check outcomes. Outcomes are put in report order; the
    /// verdict passes only if every check passed and nothing was rejected.
    pub fn aggregate(
        mut checks: Vec<CheckOutcome>,
        ingestion_errors: Vec<IngestError>,
        summary: TimetableSummary,
    ) -> Self {
        checks.sort_by_key(|c| c.check);
        let verdict = if ingestion_errors.is_empty() && checks.iter().all(CheckOutcome::passed) {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        Self {
            verdict,
            checks,
            ingestion_errors,
            summary,
        }
    }

    /// Whether the timetable is certified.
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Outcome of a given check.
    pub fn check(&self, kind: CheckKind) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.check == kind)
    }

    /// Total violations across all checks.
    pub fn violation_count(&self) -> usize {
        self.checks.iter().map(|c| c.count).sum()
    }

    /// Renders the report as JSON.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
