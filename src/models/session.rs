//! Session (class meeting) model.
//!
//! A session is one meeting of a course section: a date, a canonical
//! time slot, and a room. Sessions are immutable once normalized.
//!
//! # Ordering
//! Sessions order by date, slot, room, then section, so any collection
//! of sessions can be sorted into report order directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Day;

/// One scheduled class meeting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Session {
    /// Calendar date of the meeting.
    pub date: NaiveDate,
    /// Canonical time-slot key (e.g. `"09:00"`).
    pub slot: String,
    /// Room identifier as given by the schedule.
    pub room: String,
    /// Course-section identifier.
    pub section_id: String,
    /// Week index (1-based).
    pub week: u32,
    /// Day of the week.
    pub day: Day,
}

/// A (day, slot) cell of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotUse {
    pub day: Day,
    pub slot: String,
}

impl Session {
    /// Creates a new session. The day is taken from the date.
    pub fn new(
        date: NaiveDate,
        week: u32,
        slot: impl Into<String>,
        room: impl Into<String>,
        section_id: impl Into<String>,
    ) -> Self {
        use chrono::Datelike;
        Self {
            date,
            slot: slot.into(),
            room: room.into(),
            section_id: section_id.into(),
            week,
            day: date.weekday().into(),
        }
    }

    /// The weekly grid cell this session occupies.
    pub fn slot_use(&self) -> SlotUse {
        SlotUse {
            day: self.day,
            slot: self.slot.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_from_date() {
        // 2025-01-06 is a Monday
        let s = Session::new(date(2025, 1, 6), 1, "09:00", "8", "FIN101-A");
        assert_eq!(s.day, Day::Monday);
    }

    #[test]
    fn test_session_ordering() {
        let a = Session::new(date(2025, 1, 6), 1, "10:45", "1", "B");
        let b = Session::new(date(2025, 1, 6), 1, "09:00", "9", "A");
        let c = Session::new(date(2025, 1, 5), 1, "16:15", "9", "A");
        let mut v = vec![a.clone(), b.clone(), c.clone()];
        v.sort();
        assert_eq!(v, vec![c, b, a]);
    }

    #[test]
    fn test_slot_use() {
        let s = Session::new(date(2025, 1, 8), 1, "12:30", "3", "MKT201-B");
        assert_eq!(
            s.slot_use(),
            SlotUse {
                day: Day::Wednesday,
                slot: "12:30".into()
            }
        );
    }
}
