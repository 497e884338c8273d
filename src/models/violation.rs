//! Policy violation model.
//!
//! Violations are the expected output of a successful validation run:
//! each carries enough detail for a consumer to show what collided
//! where, without access to the engine's indexes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Day, Session, SlotUse};

/// The integrity checks a report covers, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Two sessions in one room at the same week/day/slot.
    RoomDoubleBooking,
    /// One faculty member teaching two sessions at the same week/day/slot.
    FacultyDoubleBooking,
    /// Two sections sharing students meet on the same date and slot.
    StudentOverlap,
    /// A section's weekly (day, slot) set changes between weeks.
    WeeklyPattern,
    /// A session uses a slot not offered on its day.
    SlotValidity,
    /// A session uses a room above the week's ceiling.
    CapacityPolicy,
}

impl CheckKind {
    /// All checks in report order.
    pub const ALL: [CheckKind; 6] = [
        CheckKind::RoomDoubleBooking,
        CheckKind::FacultyDoubleBooking,
        CheckKind::StudentOverlap,
        CheckKind::WeeklyPattern,
        CheckKind::SlotValidity,
        CheckKind::CapacityPolicy,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            CheckKind::RoomDoubleBooking => "room_double_booking",
            CheckKind::FacultyDoubleBooking => "faculty_double_booking",
            CheckKind::StudentOverlap => "student_overlap",
            CheckKind::WeeklyPattern => "weekly_pattern",
            CheckKind::SlotValidity => "slot_validity",
            CheckKind::CapacityPolicy => "capacity_policy",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single policy violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// More than one session occupies a room cell.
    RoomDoubleBooking {
        week: u32,
        day: Day,
        slot: String,
        room: String,
        sessions: Vec<Session>,
    },
    /// More than one session is taught by the same faculty in a cell.
    FacultyDoubleBooking {
        week: u32,
        day: Day,
        slot: String,
        faculty: String,
        sessions: Vec<Session>,
    },
    /// Two sections with shared students meet at the same date and slot.
    StudentOverlap {
        date: NaiveDate,
        slot: String,
        first_section: String,
        second_section: String,
        shared_students: u32,
    },
    /// A week's occupancy pattern diverges from the section's first week.
    PatternViolation {
        section_id: String,
        reference_week: u32,
        week: u32,
        expected: Vec<SlotUse>,
        found: Vec<SlotUse>,
    },
    /// A session uses a slot not allowed on its day.
    InvalidSlot { session: Session, allowed: Vec<String> },
    /// A session's room number exceeds the ceiling for its week.
    RoomOverCapacity {
        session: Session,
        room_number: u32,
        ceiling: u32,
    },
}

impl Violation {
    /// The check that produces this violation.
    pub fn check(&self) -> CheckKind {
        match self {
            Violation::RoomDoubleBooking { .. } => CheckKind::RoomDoubleBooking,
            Violation::FacultyDoubleBooking { .. } => CheckKind::FacultyDoubleBooking,
            Violation::StudentOverlap { .. } => CheckKind::StudentOverlap,
            Violation::PatternViolation { .. } => CheckKind::WeeklyPattern,
            Violation::InvalidSlot { .. } => CheckKind::SlotValidity,
            Violation::RoomOverCapacity { .. } => CheckKind::CapacityPolicy,
        }
    }

    /// Sessions named by this violation (empty for pair- and pattern-level ones).
    pub fn sessions(&self) -> &[Session] {
        match self {
            Violation::RoomDoubleBooking { sessions, .. }
            | Violation::FacultyDoubleBooking { sessions, .. } => sessions,
            Violation::InvalidSlot { session, .. } | Violation::RoomOverCapacity { session, .. } => {
                std::slice::from_ref(session)
            }
            Violation::StudentOverlap { .. } | Violation::PatternViolation { .. } => &[],
        }
    }
}

fn section_list(sessions: &[Session]) -> String {
    sessions
        .iter()
        .map(|s| s.section_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RoomDoubleBooking {
                week,
                day,
                slot,
                room,
                sessions,
            } => write!(
                f,
                "Room {room} double-booked in week {week}, {day} {slot}: {}",
                section_list(sessions)
            ),
            Violation::FacultyDoubleBooking {
                week,
                day,
                slot,
                faculty,
                sessions,
            } => write!(
                f,
                "Faculty {faculty} double-booked in week {week}, {day} {slot}: {}",
                section_list(sessions)
            ),
            Violation::StudentOverlap {
                date,
                slot,
                first_section,
                second_section,
                shared_students,
            } => write!(
                f,
                "Sections {first_section} and {second_section} share {shared_students} student(s) and both meet on {date} at {slot}"
            ),
            Violation::PatternViolation {
                section_id,
                reference_week,
                week,
                ..
            } => write!(
                f,
                "Section {section_id} meets in a different weekly pattern in week {week} than in week {reference_week}"
            ),
            Violation::InvalidSlot { session, .. } => write!(
                f,
                "Section {} uses slot {} which is not offered on {}",
                session.section_id, session.slot, session.day
            ),
            Violation::RoomOverCapacity {
                session,
                room_number,
                ceiling,
            } => write!(
                f,
                "Section {} uses room {room_number} in week {} where the ceiling is {ceiling}",
                session.section_id, session.week
            ),
        }
    }
}
