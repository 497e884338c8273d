//! Timetable validation entry point.
//!
//! Runs the whole pipeline over the three input tables:
//!
//! 1. Normalize each table (rejected tables are recorded, not raised)
//! 2. Build the lookup indexes, once, before any check starts
//! 3. Run the six checks; each reads the shared indexes only
//! 4. Aggregate outcomes, ingestion errors, and summary metrics
//!
//! Validation is pure: identical input yields an identical report,
//! regardless of input row order.

use log::{debug, info};

use crate::checks::{
    capacity_breaches, faculty_double_bookings, invalid_slots, room_double_bookings,
    student_overlaps, weekly_pattern_breaks,
};
use crate::config::PolicyConfig;
use crate::error::{ConfigError, Table};
use crate::index::ScheduleIndex;
use crate::models::{CheckKind, Violation};
use crate::normalize::{normalize, Normalized, RawRecord};
use crate::report::{CheckOutcome, Report, TimetableSummary};

/// Validates a timetable under the default policy.
pub fn validate(schedule: &[RawRecord], enrolment: &[RawRecord], matrix: &[RawRecord]) -> Report {
    let policy = PolicyConfig::default();
    evaluate(&normalize(schedule, enrolment, matrix, &policy), &policy)
}

/// Validates a timetable under a custom policy.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] if the policy is unusable. Problems
/// with the input data never produce an error; they are reported.
pub fn validate_with(
    schedule: &[RawRecord],
    enrolment: &[RawRecord],
    matrix: &[RawRecord],
    policy: &PolicyConfig,
) -> Result<Report, ConfigError> {
    policy.validate()?;
    Ok(evaluate(&normalize(schedule, enrolment, matrix, policy), policy))
}

/// Runs every check over already-normalized input.
///
/// `policy` must be the one `normalized` was produced with.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] if the policy is unusable.
pub fn check(normalized: &Normalized, policy: &PolicyConfig) -> Result<Report, ConfigError> {
    policy.validate()?;
    Ok(evaluate(normalized, policy))
}

fn evaluate(normalized: &Normalized, policy: &PolicyConfig) -> Report {
    let snapshot = &normalized.snapshot;
    let index = ScheduleIndex::build(snapshot);
    debug!(
        "indexed {} room cells, {} faculty cells, {} date/slot buckets",
        index.rooms.len(),
        index.faculty.len(),
        index.date_slot_sections.len()
    );

    let schedule_ok = !normalized.rejected.contains(&Table::Schedule);
    let matrix_ok = !normalized.rejected.contains(&Table::ConflictMatrix);
    let roster_ok = !normalized.rejected.contains(&Table::Enrolment);
    let mut ingestion_errors = normalized.errors.clone();

    let mut outcomes = vec![
        gated(schedule_ok, CheckKind::RoomDoubleBooking, || room_double_bookings(&index)),
        gated(schedule_ok, CheckKind::FacultyDoubleBooking, || faculty_double_bookings(&index)),
        gated(schedule_ok, CheckKind::WeeklyPattern, || weekly_pattern_breaks(&index)),
        gated(schedule_ok, CheckKind::SlotValidity, || invalid_slots(&index, policy)),
    ];

    outcomes.push(if !schedule_ok {
        CheckOutcome::skipped(CheckKind::StudentOverlap, "schedule table rejected")
    } else if !matrix_ok {
        CheckOutcome::skipped(CheckKind::StudentOverlap, "conflict matrix rejected")
    } else {
        CheckOutcome::completed(
            CheckKind::StudentOverlap,
            student_overlaps(&index, &snapshot.matrix),
        )
    });

    outcomes.push(if !schedule_ok {
        CheckOutcome::skipped(CheckKind::CapacityPolicy, "schedule table rejected")
    } else {
        match capacity_breaches(&snapshot.sessions, &index, &policy.capacity_windows) {
            Ok(violations) => CheckOutcome::completed(CheckKind::CapacityPolicy, violations),
            Err(errors) => {
                ingestion_errors.extend(errors);
                CheckOutcome::skipped(CheckKind::CapacityPolicy, "non-numeric rooms")
            }
        }
    });

    let conflicts: Vec<Violation> = outcomes
        .iter()
        .filter(|o| {
            matches!(
                o.check,
                CheckKind::RoomDoubleBooking
                    | CheckKind::FacultyDoubleBooking
                    | CheckKind::StudentOverlap
            )
        })
        .flat_map(|o| o.violations.iter().cloned())
        .collect();
    let summary = TimetableSummary::calculate(snapshot, &index, &conflicts, roster_ok);

    let report = Report::aggregate(outcomes, ingestion_errors, summary);
    info!(
        "timetable verdict {:?}: {} violation(s), {} ingestion error(s)",
        report.verdict,
        report.violation_count(),
        report.ingestion_errors.len()
    );
    report
}

/// Runs a schedule-based check unless the schedule table was rejected.
fn gated(
    schedule_ok: bool,
    kind: CheckKind,
    run: impl FnOnce() -> Vec<Violation>,
) -> CheckOutcome {
    if schedule_ok {
        CheckOutcome::completed(kind, run())
    } else {
        CheckOutcome::skipped(kind, "schedule table rejected")
    }
}
