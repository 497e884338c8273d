//! Pattern and policy checks.
//!
//! - Weekly recurrence: a section occupies the same (day, slot) set in
//!   every week it meets.
//! - Slot validity: each session's slot is offered on its day.
//! - Capacity: each session's room number is within its week's ceiling.
//!
//! These checks read only the index's session views and are
//! independent of each other and of the conflict checks.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::PolicyConfig;
use crate::error::IngestError;
use crate::index::ScheduleIndex;
use crate::models::{room_number, CapacityPolicy, Session, SlotUse, Violation};

/// Sections whose weekly occupancy differs from their first week.
///
/// One violation per diverging week. Sections meeting in a single week
/// pass trivially.
pub fn weekly_pattern_breaks(index: &ScheduleIndex<'_>) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (section_id, sessions) in &index.section_sessions {
        let mut weeks: BTreeMap<u32, BTreeSet<SlotUse>> = BTreeMap::new();
        for session in sessions {
            weeks
                .entry(session.week)
                .or_default()
                .insert(session.slot_use());
        }

        let mut iter = weeks.iter();
        let Some((&reference_week, expected)) = iter.next() else {
            continue;
        };
        for (&week, found) in iter {
            if found != expected {
                violations.push(Violation::PatternViolation {
                    section_id: section_id.to_string(),
                    reference_week,
                    week,
                    expected: expected.iter().cloned().collect(),
                    found: found.iter().cloned().collect(),
                });
            }
        }
    }

    violations
}

/// Sessions whose slot is not offered on their day.
pub fn invalid_slots(index: &ScheduleIndex<'_>, policy: &PolicyConfig) -> Vec<Violation> {
    index
        .sessions
        .iter()
        .filter_map(|&session| {
            let allowed = policy.allowed_slots(session.day);
            (!allowed.contains(&session.slot)).then(|| Violation::InvalidSlot {
                session: session.clone(),
                allowed: allowed.to_vec(),
            })
        })
        .collect()
}

/// Sessions whose room number exceeds their week's ceiling.
///
/// Every room must resolve to a numeric tier; if any does not, the check
/// cannot be decided and the unresolvable rooms are returned as errors.
/// Row indices in those errors refer to the snapshot's session order.
pub fn capacity_breaches(
    sessions: &[Session],
    index: &ScheduleIndex<'_>,
    capacity: &CapacityPolicy,
) -> Result<Vec<Violation>, Vec<IngestError>> {
    let errors: Vec<IngestError> = sessions
        .iter()
        .enumerate()
        .filter(|(_, s)| room_number(&s.room).is_none())
        .map(|(row, s)| IngestError::NonNumericRoom {
            row,
            room: s.room.clone(),
        })
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(index
        .sessions
        .iter()
        .filter_map(|&session| {
            let number = room_number(&session.room)?;
            let ceiling = capacity.ceiling(session.week)?;
            (number > ceiling).then(|| Violation::RoomOverCapacity {
                session: session.clone(),
                room_number: number,
                ceiling,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;
    use crate::snapshot::Snapshot;
    use chrono::NaiveDate;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn snapshot(sessions: Vec<Session>) -> Snapshot {
        Snapshot {
            sessions,
            ..Default::default()
        }
    }

    #[test]
    fn test_pattern_single_divergent_week() {
        // Week 1: Mon + Wed at 09:00; week 2: Mon only.
        let snap = snapshot(vec![
            Session::new(d(1, 6), 1, "09:00", "3", "A-1"),
            Session::new(d(1, 8), 1, "09:00", "3", "A-1"),
            Session::new(d(1, 13), 2, "09:00", "3", "A-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let v = weekly_pattern_breaks(&index);
        assert_eq!(v.len(), 1);
        match &v[0] {
            Violation::PatternViolation {
                section_id,
                reference_week,
                week,
                expected,
                found,
            } => {
                assert_eq!(section_id, "A-1");
                assert_eq!(*reference_week, 1);
                assert_eq!(*week, 2);
                assert_eq!(expected.len(), 2);
                assert_eq!(
                    found,
                    &vec![SlotUse {
                        day: Day::Monday,
                        slot: "09:00".into()
                    }]
                );
            }
            other => panic!("unexpected violation {other:?}"),
        }
    }

    #[test]
    fn test_pattern_consistent_and_single_week() {
        let snap = snapshot(vec![
            Session::new(d(1, 6), 1, "09:00", "3", "A-1"),
            Session::new(d(1, 13), 2, "09:00", "4", "A-1"),
            Session::new(d(1, 20), 3, "09:00", "3", "A-1"),
            Session::new(d(1, 7), 1, "12:30", "3", "B-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        assert!(weekly_pattern_breaks(&index).is_empty());
    }

    #[test]
    fn test_invalid_slot_on_reduced_day() {
        // 2025-01-11 is a Saturday.
        let snap = snapshot(vec![
            Session::new(d(1, 11), 1, "16:15", "3", "A-1"),
            Session::new(d(1, 11), 1, "09:00", "3", "B-1"),
            Session::new(d(1, 10), 1, "16:15", "3", "C-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let policy = PolicyConfig::default();
        let v = invalid_slots(&index, &policy);
        assert_eq!(v.len(), 1);
        assert!(matches!(
            &v[0],
            Violation::InvalidSlot { session, allowed }
                if session.section_id == "A-1" && allowed.len() == 3
        ));
    }

    #[test]
    fn test_capacity_ceiling() {
        let capacity = CapacityPolicy::default().with_window(1, 12).with_window(5, 10);
        let snap = snapshot(vec![
            Session::new(d(2, 3), 5, "09:00", "12", "A-1"),
            Session::new(d(2, 3), 5, "10:45", "8", "B-1"),
            Session::new(d(1, 6), 1, "09:00", "12", "C-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let v = capacity_breaches(&snap.sessions, &index, &capacity).unwrap();
        assert_eq!(v.len(), 1);
        assert!(matches!(
            &v[0],
            Violation::RoomOverCapacity { session, room_number: 12, ceiling: 10 }
                if session.section_id == "A-1"
        ));
    }

    #[test]
    fn test_capacity_non_numeric_room() {
        let capacity = CapacityPolicy::default().with_window(1, 12);
        let snap = snapshot(vec![
            Session::new(d(1, 6), 1, "09:00", "12", "A-1"),
            Session::new(d(1, 6), 1, "10:45", "Hall", "B-1"),
        ]);
        let index = ScheduleIndex::build(&snap);
        let errors = capacity_breaches(&snap.sessions, &index, &capacity).unwrap_err();
        assert_eq!(
            errors,
            vec![IngestError::NonNumericRoom {
                row: 1,
                room: "Hall".into()
            }]
        );
    }
}
