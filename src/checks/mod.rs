//! Integrity checks over an indexed snapshot.
//!
//! - **`conflicts`**: room, faculty, and student-overlap double-bookings
//! - **`policy`**: weekly recurrence, slot validity, room capacity
//!
//! Checks never fail on violations; violations are their output.

mod conflicts;
mod policy;

pub use conflicts::{faculty_double_bookings, room_double_bookings, student_overlaps};
pub use policy::{capacity_breaches, invalid_slots, weekly_pattern_breaks};
