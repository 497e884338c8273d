//! Timetable summary metrics.
//!
//! Headline figures a dashboard shows next to the verdict.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Sessions | Normalized schedule rows |
//! | Students | Distinct students in the roster |
//! | Sections | Distinct sections in schedule or roster |
//! | Rooms | Distinct rooms in use |
//! | Avg Class Size | Mean roster size over sections with students (truncated) |
//! | Clash Rate | Sessions named by any conflict / sessions |
//!
//! Students and Avg Class Size come from the roster and are `None` when
//! the roster table was rejected.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::index::ScheduleIndex;
use crate::models::{Session, Violation};
use crate::snapshot::Snapshot;

/// Summary metrics of a validated timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableSummary {
    pub total_sessions: usize,
    /// `None` when the roster was rejected.
    pub total_students: Option<usize>,
    pub total_sections: usize,
    pub rooms_in_use: usize,
    /// Mean enrolment per section with at least one student, truncated.
    /// `None` when the roster was rejected.
    pub avg_class_size: Option<usize>,
    /// Fraction of sessions involved in a room, faculty, or student conflict (0.0..1.0).
    pub clash_rate: f64,
}

impl TimetableSummary {
    /// Computes the summary from the snapshot, its index, and the
    /// violations found by the conflict checks. Roster metrics are
    /// skipped unless `roster_ok`.
    pub fn calculate(
        snapshot: &Snapshot,
        index: &ScheduleIndex<'_>,
        violations: &[Violation],
        roster_ok: bool,
    ) -> Self {
        let rooms: BTreeSet<&str> = snapshot.sessions.iter().map(|s| s.room.as_str()).collect();

        let avg_class_size = if index.section_students.is_empty() {
            0
        } else {
            let enrolled: usize = index.section_students.values().map(BTreeSet::len).sum();
            enrolled / index.section_students.len()
        };

        let mut clashing: HashSet<&Session> = HashSet::new();
        let mut overlap_cells = HashSet::new();
        for v in violations {
            clashing.extend(v.sessions());
            if let Violation::StudentOverlap {
                date,
                slot,
                first_section,
                second_section,
                ..
            } = v
            {
                overlap_cells.insert((*date, slot.as_str(), first_section.as_str()));
                overlap_cells.insert((*date, slot.as_str(), second_section.as_str()));
            }
        }
        if !overlap_cells.is_empty() {
            clashing.extend(snapshot.sessions.iter().filter(|s| {
                overlap_cells.contains(&(s.date, s.slot.as_str(), s.section_id.as_str()))
            }));
        }

        let clash_rate = if snapshot.sessions.is_empty() {
            0.0
        } else {
            clashing.len() as f64 / snapshot.sessions.len() as f64
        };

        Self {
            total_sessions: snapshot.sessions.len(),
            total_students: roster_ok.then(|| snapshot.student_count()),
            total_sections: snapshot.sections.len(),
            rooms_in_use: rooms.len(),
            avg_class_size: roster_ok.then_some(avg_class_size),
            clash_rate,
        }
    }

    /// Whether the timetable is clash-free.
    pub fn is_clash_free(&self) -> bool {
        self.clash_rate == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Enrolment, Section};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn sample_snapshot() -> Snapshot {
        let mut snap = Snapshot {
            sessions: vec![
                Session::new(d(6), 1, "09:00", "3", "A-1"),
                Session::new(d(6), 1, "09:00", "4", "B-1"),
                Session::new(d(6), 1, "10:45", "3", "C-1"),
                Session::new(d(7), 1, "09:00", "3", "A-1"),
            ],
            enrolments: vec![
                Enrolment::new("S1", "A-1"),
                Enrolment::new("S1", "B-1"),
                Enrolment::new("S2", "A-1"),
                Enrolment::new("S3", "A-1"),
            ],
            ..Default::default()
        };
        for id in ["A-1", "B-1", "C-1"] {
            snap.sections.insert(id.into(), Section::new(id, id));
        }
        snap
    }

    #[test]
    fn test_summary_counts() {
        let snap = sample_snapshot();
        let index = ScheduleIndex::build(&snap);
        let s = TimetableSummary::calculate(&snap, &index, &[], true);
        assert_eq!(s.total_sessions, 4);
        assert_eq!(s.total_students, Some(3));
        assert_eq!(s.total_sections, 3);
        assert_eq!(s.rooms_in_use, 2);
        // A-1: 3 students, B-1: 1 student → 4 / 2
        assert_eq!(s.avg_class_size, Some(2));
        assert!(s.is_clash_free());
    }

    #[test]
    fn test_rejected_roster_skips_roster_metrics() {
        let snap = sample_snapshot();
        let index = ScheduleIndex::build(&snap);
        let s = TimetableSummary::calculate(&snap, &index, &[], false);
        assert_eq!(s.total_students, None);
        assert_eq!(s.avg_class_size, None);
        assert_eq!(s.total_sessions, 4);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["total_students"].is_null());
    }

    #[test]
    fn test_clash_rate_from_overlap() {
        let snap = sample_snapshot();
        let index = ScheduleIndex::build(&snap);
        let overlap = Violation::StudentOverlap {
            date: d(6),
            slot: "09:00".into(),
            first_section: "A-1".into(),
            second_section: "B-1".into(),
            shared_students: 1,
        };
        let s = TimetableSummary::calculate(&snap, &index, &[overlap], true);
        assert!((s.clash_rate - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_clash_rate_counts_sessions_once() {
        let snap = sample_snapshot();
        let index = ScheduleIndex::build(&snap);
        let both = vec![snap.sessions[0].clone(), snap.sessions[1].clone()];
        let room = Violation::RoomDoubleBooking {
            week: 1,
            day: crate::models::Day::Monday,
            slot: "09:00".into(),
            room: "3".into(),
            sessions: both.clone(),
        };
        let faculty = Violation::FacultyDoubleBooking {
            week: 1,
            day: crate::models::Day::Monday,
            slot: "09:00".into(),
            faculty: "FAC-01".into(),
            sessions: both,
        };
        let s = TimetableSummary::calculate(&snap, &index, &[room, faculty], true);
        assert!((s.clash_rate - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_summary_empty() {
        let snap = Snapshot::default();
        let index = ScheduleIndex::build(&snap);
        let s = TimetableSummary::calculate(&snap, &index, &[], true);
        assert_eq!(s.total_sessions, 0);
        assert_eq!(s.avg_class_size, Some(0));
        assert!((s.clash_rate - 0.0).abs() < 1e-10);
    }
}
