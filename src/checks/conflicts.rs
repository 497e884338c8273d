//! Conflict detection: room, faculty, and student-overlap checks.
//!
//! Every check reports all violations it finds, in index order:
//! - room and faculty: by (week, day, slot, identifier)
//! - student overlap: by (date, slot, section pair)
//!
//! A room cell key already includes the slot, so any cell holding
//! more than one session is a genuine overlap; sequential use of a room
//! lands in different cells.

use crate::index::ScheduleIndex;
use crate::models::{ConflictMatrix, Violation};

/// Rooms holding more than one session in the same week/day/slot.
pub fn room_double_bookings(index: &ScheduleIndex<'_>) -> Vec<Violation> {
    index
        .rooms
        .iter()
        .filter(|(_, sessions)| sessions.len() > 1)
        .map(|((cell, room), sessions)| Violation::RoomDoubleBooking {
            week: cell.week,
            day: cell.day,
            slot: cell.slot.to_string(),
            room: room.to_string(),
            sessions: sessions.iter().map(|&s| s.clone()).collect(),
        })
        .collect()
}

/// Faculty teaching more than one session in the same week/day/slot.
pub fn faculty_double_bookings(index: &ScheduleIndex<'_>) -> Vec<Violation> {
    index
        .faculty
        .iter()
        .filter(|(_, sessions)| sessions.len() > 1)
        .map(|((cell, faculty), sessions)| Violation::FacultyDoubleBooking {
            week: cell.week,
            day: cell.day,
            slot: cell.slot.to_string(),
            faculty: faculty.to_string(),
            sessions: sessions.iter().map(|&s| s.clone()).collect(),
        })
        .collect()
}

/// Section pairs with shared students that meet on the same date and slot.
///
/// Pairs missing from the matrix count as zero shared students. Cells
/// at or above the matrix sentinel are ignored.
pub fn student_overlaps(index: &ScheduleIndex<'_>, matrix: &ConflictMatrix) -> Vec<Violation> {
    let mut violations = Vec::new();

    for ((date, slot), sections) in &index.date_slot_sections {
        if sections.len() < 2 {
            continue;
        }
        let active: Vec<&str> = sections.iter().copied().collect();
        for (i, first) in active.iter().enumerate() {
            for second in &active[i + 1..] {
                if let Some(shared) = matrix.conflict(first, second) {
                    violations.push(Violation::StudentOverlap {
                        date: *date,
                        slot: slot.to_string(),
                        first_section: first.to_string(),
                        second_section: second.to_string(),
                        shared_students: shared,
                    });
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, Session};
    use crate::snapshot::Snapshot;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn snapshot(sessions: Vec<Session>) -> Snapshot {
        let mut snap = Snapshot {
            sessions,
            ..Default::default()
        };
        for s in &snap.sessions {
            let course = crate::models::course_of(&s.section_id, '-');
            let section = Section::new(&s.section_id, course).with_faculty(format!("F-{course}"));
            snap.sections.insert(s.section_id.clone(), section);
        }
        snap
    }

    #[test]
    fn test_room_double_booking_single_violation() {
        let snap = snapshot(vec![
            Session::new(d(6), 1, "09:00", "8", "FIN101-A"),
            Session::new(d(6), 1, "09:00", "8", "MKT201-A"),
            Session::new(d(6), 1, "10:45", "8", "OPS300-A"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let v = room_double_bookings(&index);
        assert_eq!(v.len(), 1);
        match &v[0] {
            Violation::RoomDoubleBooking { room, sessions, .. } => {
                assert_eq!(room, "8");
                assert_eq!(sessions.len(), 2);
                assert_eq!(sessions[0].section_id, "FIN101-A");
                assert_eq!(sessions[1].section_id, "MKT201-A");
            }
            other => panic!("unexpected violation {other:?}"),
        }
    }

    #[test]
    fn test_room_sequential_use_ok() {
        let snap = snapshot(vec![
            Session::new(d(6), 1, "09:00", "8", "FIN101-A"),
            Session::new(d(6), 1, "10:45", "8", "MKT201-A"),
            Session::new(d(13), 2, "09:00", "8", "MKT201-A"),
        ]);
        let index = ScheduleIndex::build(&snap);
        assert!(room_double_bookings(&index).is_empty());
    }

    #[test]
    fn test_faculty_double_booking() {
        // Two sections of one course share a faculty identity.
        let snap = snapshot(vec![
            Session::new(d(6), 1, "09:00", "3", "FIN101-A"),
            Session::new(d(6), 1, "09:00", "4", "FIN101-B"),
            Session::new(d(6), 1, "09:00", "5", "MKT201-A"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let v = faculty_double_bookings(&index);
        assert_eq!(v.len(), 1);
        assert!(matches!(
            &v[0],
            Violation::FacultyDoubleBooking { faculty, sessions, .. }
                if faculty == "F-FIN101" && sessions.len() == 2
        ));
    }

    #[test]
    fn test_student_overlap_and_sentinel() {
        let snap = snapshot(vec![
            Session::new(d(6), 1, "09:00", "3", "A-1"),
            Session::new(d(6), 1, "09:00", "4", "B-1"),
        ]);
        let index = ScheduleIndex::build(&snap);

        let matrix = ConflictMatrix::default().with_cell("A-1", "B-1", 5);
        let v = student_overlaps(&index, &matrix);
        assert_eq!(
            v,
            vec![Violation::StudentOverlap {
                date: d(6),
                slot: "09:00".into(),
                first_section: "A-1".into(),
                second_section: "B-1".into(),
                shared_students: 5,
            }]
        );

        let matrix = ConflictMatrix::default().with_cell("B-1", "A-1", 9999);
        assert!(student_overlaps(&index, &matrix).is_empty());
    }

    #[test]
    fn test_absent_pair_is_not_conflict() {
        let snap = snapshot(vec![
            Session::new(d(6), 1, "09:00", "3", "A-1"),
            Session::new(d(6), 1, "09:00", "4", "B-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let matrix = ConflictMatrix::default().with_cell("A-1", "C-1", 7);
        assert!(student_overlaps(&index, &matrix).is_empty());
    }

    #[test]
    fn test_student_overlap_keyed_by_date() {
        // Same weekly cell, different dates: no overlap.
        let snap = snapshot(vec![
            Session::new(d(6), 1, "09:00", "3", "A-1"),
            Session::new(d(13), 2, "09:00", "4", "B-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let matrix = ConflictMatrix::default().with_cell("A-1", "B-1", 2);
        assert!(student_overlaps(&index, &matrix).is_empty());
    }

    #[test]
    fn test_student_overlap_ordering() {
        let snap = snapshot(vec![
            Session::new(d(7), 1, "09:00", "3", "C-1"),
            Session::new(d(7), 1, "09:00", "4", "A-1"),
            Session::new(d(6), 1, "10:45", "3", "B-1"),
            Session::new(d(6), 1, "10:45", "4", "A-1"),
            Session::new(d(7), 1, "09:00", "5", "B-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let matrix = ConflictMatrix::default()
            .with_cell("A-1", "B-1", 1)
            .with_cell("A-1", "C-1", 2)
            .with_cell("B-1", "C-1", 3);
        let keys: Vec<(u32, String, String)> = student_overlaps(&index, &matrix)
            .into_iter()
            .map(|v| match v {
                Violation::StudentOverlap {
                    date,
                    first_section,
                    second_section,
                    ..
                } => (chrono::Datelike::day(&date), first_section, second_section),
                other => panic!("unexpected violation {other:?}"),
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                (6, "A-1".into(), "B-1".into()),
                (7, "A-1".into(), "B-1".into()),
                (7, "A-1".into(), "C-1".into()),
                (7, "B-1".into(), "C-1".into()),
            ]
        );
    }
}
