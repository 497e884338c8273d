//! Lookup indexes for conflict detection.
//!
//! Built in one pass over the snapshot's sessions and enrolments, then
//! shared read-only by every check. All maps are ordered, and every
//! bucket is sorted once construction ends, so iteration order is a
//! function of the data alone, not of input row order.
//!
//! | Index | Key | Value |
//! |-------|-----|-------|
//! | `rooms` | (week, day, slot, room) | sessions |
//! | `faculty` | (week, day, slot, faculty) | sessions |
//! | `section_sessions` | section | sessions |
//! | `section_students` | section | students |
//! | `date_slot_sections` | (date, slot) | active sections |

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Day, Session};
use crate::snapshot::Snapshot;

/// A cell of the weekly grid in a specific week.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekSlot<'a> {
    pub week: u32,
    pub day: Day,
    pub slot: &'a str,
}

/// Indexes over a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex<'a> {
    /// Sessions per room cell.
    pub rooms: BTreeMap<(WeekSlot<'a>, &'a str), Vec<&'a Session>>,
    /// Sessions per faculty cell.
    pub faculty: BTreeMap<(WeekSlot<'a>, &'a str), Vec<&'a Session>>,
    /// Sessions per section.
    pub section_sessions: BTreeMap<&'a str, Vec<&'a Session>>,
    /// Deduplicated students per section.
    pub section_students: BTreeMap<&'a str, BTreeSet<&'a str>>,
    /// Active sections per calendar date and slot.
    pub date_slot_sections: BTreeMap<(NaiveDate, &'a str), BTreeSet<&'a str>>,
    /// All sessions in sorted order.
    pub sessions: Vec<&'a Session>,
}

impl<'a> ScheduleIndex<'a> {
    /// Builds every index from a snapshot.
    ///
    /// Sessions whose section has no faculty identity are left out of
    /// the faculty index.
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut index = Self::default();

        for session in &snapshot.sessions {
            let cell = WeekSlot {
                week: session.week,
                day: session.day,
                slot: session.slot.as_str(),
            };
            index
                .rooms
                .entry((cell.clone(), session.room.as_str()))
                .or_default()
                .push(session);
            if let Some(faculty) = snapshot
                .faculty_of(&session.section_id)
                .filter(|f| !f.is_empty())
            {
                index
                    .faculty
                    .entry((cell, faculty))
                    .or_default()
                    .push(session);
            }
            index
                .section_sessions
                .entry(session.section_id.as_str())
                .or_default()
                .push(session);
            index
                .date_slot_sections
                .entry((session.date, session.slot.as_str()))
                .or_default()
                .insert(session.section_id.as_str());
            index.sessions.push(session);
        }

        for enrolment in &snapshot.enrolments {
            index
                .section_students
                .entry(enrolment.section_id.as_str())
                .or_default()
                .insert(enrolment.student_id.as_str());
        }

        for bucket in index
            .rooms
            .values_mut()
            .chain(index.faculty.values_mut())
            .chain(index.section_sessions.values_mut())
        {
            bucket.sort();
        }
        index.sessions.sort();
        index
    }
}
