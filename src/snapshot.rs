//! Immutable snapshot of normalized input.
//!
//! The snapshot owns everything the checks read. It replaces any kind
//! of process-wide data cache: build one per run, pass it by reference.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ConflictMatrix, Enrolment, Section, Session};

/// Normalized sessions, sections, enrolments, and conflict matrix.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Sessions in input order.
    pub sessions: Vec<Session>,
    /// Sections keyed by id.
    pub sections: BTreeMap<String, Section>,
    /// Deduplicated enrolments, sorted by student then section.
    pub enrolments: Vec<Enrolment>,
    pub matrix: ConflictMatrix,
}

/// One student's sections and their meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentTimetable {
    pub student_id: String,
    /// Enrolled sections, sorted.
    pub sections: Vec<String>,
    /// Meetings of those sections, sorted by date then slot.
    pub sessions: Vec<Session>,
}

impl Snapshot {
    /// Looks up a section.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Faculty identity teaching a section.
    pub fn faculty_of(&self, section_id: &str) -> Option<&str> {
        self.section(section_id).map(|s| s.faculty.as_str())
    }

    /// Number of distinct students in the roster.
    pub fn student_count(&self) -> usize {
        self.enrolments
            .iter()
            .map(|e| e.student_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// A student's timetable, or `None` if the student is not enrolled anywhere.
    pub fn student_timetable(&self, student_id: &str) -> Option<StudentTimetable> {
        let sections: BTreeSet<&str> = self
            .enrolments
            .iter()
            .filter(|e| e.student_id == student_id)
            .map(|e| e.section_id.as_str())
            .collect();
        if sections.is_empty() {
            return None;
        }

        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| sections.contains(s.section_id.as_str()))
            .cloned()
            .collect();
        sessions.sort();

        Some(StudentTimetable {
            student_id: student_id.to_string(),
            sections: sections.into_iter().map(str::to_string).collect(),
            sessions,
        })
    }

    /// Sessions held in a room, sorted by date then slot.
    pub fn sessions_in_room(&self, room: &str) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.sessions.iter().filter(|s| s.room == room).collect();
        sessions.sort();
        sessions
    }
}
