//! Timetable domain models.
//!
//! Provides the canonical in-memory entities that the normalizer
//! produces and the checks consume. All of them are plain data:
//! immutable once built, no I/O, no caches.
//!
//! # Source Mappings
//!
//! | Model | Schedule export | Roster / matrix |
//! |-------|-----------------|-----------------|
//! | Session | one timetable row | - |
//! | Section | `Course_Section` | `Section_Label` |
//! | Enrolment | - | one roster row |
//! | ConflictMatrix | - | square overlap table |

mod capacity;
mod day;
mod matrix;
mod section;
mod session;
mod violation;

pub use capacity::{room_number, whole_number, CapacityPolicy, CapacityWindow};
pub use day::Day;
pub use matrix::{ConflictMatrix, DEFAULT_SENTINEL};
pub use section::{course_of, Enrolment, Section};
pub use session::{Session, SlotUse};
pub use violation::{CheckKind, Violation};
