//! Validation policy configuration.
//!
//! Everything institution-specific lives here: the slot grid, the
//! alias table mapping free-text slot descriptions onto it, the room
//! ceiling step function, bucket counts for derived attributes, and
//! the column names of the input tables.
//!
//! A policy is plain data (`serde`), buildable in code with `with_*`
//! methods or loaded from TOML. Missing TOML keys take their defaults.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::ConfigError;
use crate::models::{CapacityPolicy, CapacityWindow, Day, DEFAULT_SENTINEL};

/// Canonical slots with their end times, used to build default aliases.
const DEFAULT_GRID: [(&str, &str); 5] = [
    ("09:00", "10:30"),
    ("10:45", "12:15"),
    ("12:30", "14:00"),
    ("14:30", "16:00"),
    ("16:15", "17:45"),
];

/// Number of leading grid slots offered on the reduced day.
const DEFAULT_REDUCED_SLOTS: usize = 3;

/// Column names of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub date: String,
    pub week: String,
    pub day: String,
    pub slot: String,
    pub room: String,
    pub section: String,
    pub student: String,
    pub enrolment_section: String,
    /// Candidate names of the conflict matrix's row-label column.
    pub matrix_index: Vec<String>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            date: "Date".into(),
            week: "Week".into(),
            day: "Day".into(),
            slot: "Time_Slot".into(),
            room: "Room_Number".into(),
            section: "Course_Section".into(),
            student: "StudentID".into(),
            enrolment_section: "Section_Label".into(),
            matrix_index: vec!["".into(), "Section".into(), "Unnamed: 0".into()],
        }
    }
}

/// Validation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Input column names.
    pub columns: Columns,
    /// `chrono` formats tried in order when parsing dates.
    pub date_formats: Vec<String>,
    /// Free-text slot description → canonical slot key.
    pub slot_aliases: BTreeMap<String, String>,
    /// Slots offered on ordinary days.
    pub weekday_slots: Vec<String>,
    /// The designated short day, if any.
    pub reduced_day: Option<Day>,
    /// Slots offered on the reduced day.
    pub reduced_slots: Vec<String>,
    /// Room ceiling step function.
    pub capacity_windows: CapacityPolicy,
    /// Diagonal sentinel of the conflict matrix.
    pub sentinel: u32,
    /// Department names; a course's department is its bucket in this list.
    pub departments: Vec<String>,
    /// Number of synthetic faculty identities.
    pub faculty_pool: u32,
    /// Separator between course code and section suffix.
    pub section_separator: char,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let mut slot_aliases = BTreeMap::new();
        for (start, end) in DEFAULT_GRID {
            let short = start.trim_start_matches('0');
            for alias in [
                format!("{start}-{end}"),
                format!("{start} - {end}"),
                format!("{short}-{end}"),
                short.to_string(),
            ] {
                if alias != start {
                    slot_aliases.insert(alias, start.to_string());
                }
            }
        }
        for (i, (start, _)) in DEFAULT_GRID.iter().enumerate() {
            slot_aliases.insert(format!("Slot {}", i + 1), start.to_string());
        }

        let weekday_slots: Vec<String> = DEFAULT_GRID.iter().map(|(s, _)| s.to_string()).collect();
        let reduced_slots = weekday_slots[..DEFAULT_REDUCED_SLOTS].to_vec();

        Self {
            columns: Columns::default(),
            date_formats: vec![
                "%Y-%m-%d".into(),
                "%d-%m-%Y".into(),
                "%d/%m/%Y".into(),
                "%d %b %Y".into(),
            ],
            slot_aliases,
            weekday_slots,
            reduced_day: Some(Day::Saturday),
            reduced_slots,
            capacity_windows: CapacityPolicy::new(vec![
                CapacityWindow::new(1, 12),
                CapacityWindow::new(5, 10),
            ]),
            sentinel: DEFAULT_SENTINEL,
            departments: vec![
                "Strategy".into(),
                "Finance".into(),
                "Marketing".into(),
                "Operations".into(),
                "Economics".into(),
                "Organisational Behaviour".into(),
            ],
            faculty_pool: 24,
            section_separator: '-',
        }
    }
}

impl PolicyConfig {
    /// Parses a policy from TOML and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let policy: Self = toml::from_str(text)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reads a policy from a TOML file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Sets the room ceiling step function.
    pub fn with_capacity(mut self, capacity: CapacityPolicy) -> Self {
        self.capacity_windows = capacity;
        self
    }

    /// Sets the reduced day (`None` = every day offers the full grid).
    pub fn with_reduced_day(mut self, day: Option<Day>) -> Self {
        self.reduced_day = day;
        self
    }

    /// Adds a slot alias.
    pub fn with_slot_alias(mut self, raw: impl Into<String>, key: impl Into<String>) -> Self {
        self.slot_aliases.insert(raw.into(), key.into());
        self
    }

    /// Sets the conflict-matrix sentinel.
    pub fn with_sentinel(mut self, sentinel: u32) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Sets the faculty pool size.
    pub fn with_faculty_pool(mut self, pool: u32) -> Self {
        self.faculty_pool = pool;
        self
    }

    /// Slots offered on `day`.
    pub fn allowed_slots(&self, day: Day) -> &[String] {
        if self.reduced_day == Some(day) {
            &self.reduced_slots
        } else {
            &self.weekday_slots
        }
    }

    /// Every canonical slot key.
    pub fn canonical_slots(&self) -> BTreeSet<&str> {
        self.weekday_slots
            .iter()
            .chain(&self.reduced_slots)
            .map(String::as_str)
            .collect()
    }

    /// Checks that the policy is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.weekday_slots.is_empty() {
            return invalid("weekday_slots is empty".into());
        }
        if self.reduced_day.is_some() && self.reduced_slots.is_empty() {
            return invalid("reduced_day is set but reduced_slots is empty".into());
        }
        if self.departments.is_empty() {
            return invalid("departments is empty".into());
        }
        if self.faculty_pool == 0 {
            return invalid("faculty_pool must be positive".into());
        }
        if self.sentinel == 0 {
            return invalid("sentinel must be positive".into());
        }
        if self.date_formats.is_empty() {
            return invalid("date_formats is empty".into());
        }
        if self.capacity_windows.has_duplicate_weeks() {
            return invalid("capacity_windows has two windows opening on the same week".into());
        }

        let canonical = self.canonical_slots();
        if let Some(key) = canonical.iter().find(|key| !is_clock_key(key)) {
            return invalid(format!("slot key {key:?} is not a zero-padded HH:MM time"));
        }
        for (raw, key) in &self.slot_aliases {
            if !canonical.contains(key.as_str()) {
                return invalid(format!(
                    "slot alias {raw:?} maps to {key:?}, which is not an offered slot"
                ));
            }
        }
        Ok(())
    }
}

/// Slot keys are compared as text, so they must be `HH:MM` to sort by time.
fn is_clock_key(key: &str) -> bool {
    key.len() == 5 && NaiveTime::parse_from_str(key, "%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let p = PolicyConfig::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.slot_aliases["9:00-10:30"], "09:00");
        assert_eq!(p.slot_aliases["Slot 5"], "16:15");
        assert_eq!(p.slot_aliases["12:30 - 14:00"], "12:30");
    }

    #[test]
    fn test_allowed_slots_reduced_day() {
        let p = PolicyConfig::default();
        assert_eq!(p.allowed_slots(Day::Monday).len(), 5);
        assert_eq!(p.allowed_slots(Day::Saturday), &["09:00", "10:45", "12:30"]);

        let p = p.with_reduced_day(None);
        assert_eq!(p.allowed_slots(Day::Saturday).len(), 5);
    }

    #[test]
    fn test_rejects_zero_faculty_pool() {
        let p = PolicyConfig::default().with_faculty_pool(0);
        assert!(matches!(p.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_alias_outside_grid() {
        let p = PolicyConfig::default().with_slot_alias("Evening", "19:00");
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("Evening"));
    }

    #[test]
    fn test_rejects_unpadded_slot_key() {
        let mut p = PolicyConfig::default();
        p.weekday_slots = vec!["9:00".into(), "10:45".into()];
        p.reduced_slots = vec!["9:00".into()];
        p.slot_aliases.clear();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("\"9:00\""));

        p.weekday_slots = vec!["09:00".into(), "10:45".into()];
        p.reduced_slots = vec!["09:00".into()];
        assert!(p.validate().is_ok());
        assert!(!is_clock_key("Morning"));
    }

    #[test]
    fn test_with_sentinel() {
        let p = PolicyConfig::default().with_sentinel(500);
        assert_eq!(p.sentinel, 500);
        assert!(p.validate().is_ok());
        assert!(PolicyConfig::default().with_sentinel(0).validate().is_err());
    }

    #[test]
    fn test_from_toml_overrides() {
        let text = r#"
            sentinel = 500
            faculty_pool = 8
            reduced_day = "Friday"

            [[capacity_windows]]
            from_week = 1
            max_room = 20

            [[capacity_windows]]
            from_week = 9
            max_room = 6

            [columns]
            room = "Room"
        "#;
        let p = PolicyConfig::from_toml_str(text).unwrap();
        assert_eq!(p.sentinel, 500);
        assert_eq!(p.faculty_pool, 8);
        assert_eq!(p.reduced_day, Some(Day::Friday));
        assert_eq!(p.capacity_windows.ceiling(10), Some(6));
        assert_eq!(p.columns.room, "Room");
        assert_eq!(p.columns.date, "Date");
        assert_eq!(p.weekday_slots.len(), 5);
    }

    #[test]
    fn test_from_toml_parse_error() {
        let err = PolicyConfig::from_toml_str("sentinel = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
