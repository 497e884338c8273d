//! Course section and enrolment models.
//!
//! A section is a course offering. Its department and faculty are not
//! part of the source data; they are synthesized from the course code
//! by [`crate::bucket`] so every run agrees on them.

use serde::{Deserialize, Serialize};

/// A course section with its derived attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier (e.g. `"FIN101-A"`).
    pub id: String,
    /// Course code: the section id up to its last separator.
    pub course: String,
    /// Department bucket name.
    pub department: String,
    /// Synthetic faculty identity (e.g. `"FAC-07"`).
    pub faculty: String,
}

/// A student enrolled in a section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Enrolment {
    pub student_id: String,
    pub section_id: String,
}

impl Section {
    /// Creates a section with the given course; derived attributes start empty.
    pub fn new(id: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            course: course.into(),
            department: String::new(),
            faculty: String::new(),
        }
    }

    /// Sets the department bucket.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the faculty identity.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = faculty.into();
        self
    }
}

impl Enrolment {
    pub fn new(student_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            section_id: section_id.into(),
        }
    }
}

/// Course code of a section id: everything before the last `separator`.
///
/// Returns the whole id when the separator does not occur or would
/// leave an empty course.
pub fn course_of(section_id: &str, separator: char) -> &str {
    match section_id.rfind(separator) {
        Some(pos) if pos > 0 => &section_id[..pos],
        _ => section_id,
    }
}
