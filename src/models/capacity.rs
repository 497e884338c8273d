//! Room-capacity windows.
//!
//! Rooms are numbered by capacity tier. Which tiers may be used depends
//! on the calendar period: each [`CapacityWindow`] opens at a week and
//! sets the highest room number allowed from then on, until the next
//! window opens.
//!
//! # Precedence
//! The window with the greatest `from_week <= week` applies. Weeks
//! before the first window have no ceiling.

use serde::{Deserialize, Serialize};

/// A step of the room-ceiling function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityWindow {
    /// First week (inclusive) this ceiling applies to.
    pub from_week: u32,
    /// Highest room number allowed.
    pub max_room: u32,
}

/// Step function from week to maximum room number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CapacityWindow>", into = "Vec<CapacityWindow>")]
pub struct CapacityPolicy {
    windows: Vec<CapacityWindow>,
}

impl CapacityWindow {
    pub fn new(from_week: u32, max_room: u32) -> Self {
        Self {
            from_week,
            max_room,
        }
    }
}

impl CapacityPolicy {
    /// Creates a policy from windows. Windows are sorted by `from_week`.
    pub fn new(mut windows: Vec<CapacityWindow>) -> Self {
        windows.sort_by_key(|w| w.from_week);
        Self { windows }
    }

    /// Adds a window.
    pub fn with_window(mut self, from_week: u32, max_room: u32) -> Self {
        self.windows.push(CapacityWindow::new(from_week, max_room));
        self.windows.sort_by_key(|w| w.from_week);
        self
    }

    /// The configured windows, ordered by `from_week`.
    pub fn windows(&self) -> &[CapacityWindow] {
        &self.windows
    }

    /// Highest room number allowed in `week`, or `None` if unconstrained.
    pub fn ceiling(&self, week: u32) -> Option<u32> {
        self.windows
            .iter()
            .take_while(|w| w.from_week <= week)
            .last()
            .map(|w| w.max_room)
    }

    /// Whether a room number is allowed in `week`.
    pub fn allows(&self, week: u32, room_number: u32) -> bool {
        self.ceiling(week).map_or(true, |max| room_number <= max)
    }

    /// Whether two windows open on the same week.
    pub fn has_duplicate_weeks(&self) -> bool {
        self.windows
            .windows(2)
            .any(|pair| pair[0].from_week == pair[1].from_week)
    }
}

impl From<Vec<CapacityWindow>> for CapacityPolicy {
    fn from(windows: Vec<CapacityWindow>) -> Self {
        Self::new(windows)
    }
}

impl From<CapacityPolicy> for Vec<CapacityWindow> {
    fn from(policy: CapacityPolicy) -> Self {
        policy.windows
    }
}

/// Parses a whole number, accepting the `12.0` form spreadsheet exports
/// write for integers. Fractional, negative and non-numeric text is `None`.
pub fn whole_number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}

/// Numeric capacity tier of a room identifier: its trailing number.
///
/// `"12"`, `"12.0"`, `"R12"` and `"Room 12"` all resolve to 12; `"Hall"`
/// and `"12.5"` have no tier.
pub fn room_number(room: &str) -> Option<u32> {
    let trimmed = room.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, _)| i)?;
    let tail = trimmed[start..].trim_start_matches('.');
    if !tail.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    whole_number(tail)
}
