//! Error types.
//!
//! Two families:
//! - [`IngestError`]: a record that could not be normalized. These are
//!   data, not failures of the engine; they are collected into the
//!   report and abort the table (or check) they belong to.
//! - [`ConfigError`]: an unusable policy configuration. Returned as a
//!   `Result` before any validation starts.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The three input tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Schedule,
    Enrolment,
    ConflictMatrix,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Table::Schedule => "schedule",
            Table::Enrolment => "enrolment",
            Table::ConflictMatrix => "conflict matrix",
        })
    }
}

/// A record that could not be normalized.
///
/// Row indices are 0-based positions in the input sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestError {
    /// A required field is missing or unparseable.
    #[error("malformed {table} record at row {row}: {reason}")]
    MalformedRecord {
        table: Table,
        row: usize,
        reason: String,
    },

    /// A time-slot description has no canonical slot.
    #[error("unmapped time slot {raw:?} at schedule row {row}")]
    UnmappedSlot { row: usize, raw: String },

    /// A room identifier has no numeric capacity tier.
    #[error("room {room:?} at schedule row {row} has no numeric capacity tier")]
    NonNumericRoom { row: usize, room: String },
}

impl IngestError {
    pub(crate) fn malformed(table: Table, row: usize, reason: impl Into<String>) -> Self {
        IngestError::MalformedRecord {
            table,
            row,
            reason: reason.into(),
        }
    }

    /// The table the offending record came from.
    pub fn table(&self) -> Table {
        match self {
            IngestError::MalformedRecord { table, .. } => *table,
            IngestError::UnmappedSlot { .. } | IngestError::NonNumericRoom { .. } => {
                Table::Schedule
            }
        }
    }
}

/// An unusable policy configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration parsed but violates a policy rule.
    #[error("invalid policy: {0}")]
    Invalid(String),

    /// The TOML document could not be parsed.
    #[error("policy parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The policy file could not be read.
    #[error("cannot read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_messages() {
        let e = IngestError::UnmappedSlot {
            row: 3,
            raw: "7:15 PM".into(),
        };
        assert_eq!(e.to_string(), "unmapped time slot \"7:15 PM\" at schedule row 3");
        assert_eq!(e.table(), Table::Schedule);

        let e = IngestError::malformed(Table::Enrolment, 0, "empty StudentID");
        assert_eq!(e.to_string(), "malformed enrolment record at row 0: empty StudentID");
        assert_eq!(e.table(), Table::Enrolment);
    }

    #[test]
    fn test_ingest_error_serialization() {
        let e = IngestError::NonNumericRoom {
            row: 1,
            room: "Hall".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "non_numeric_room");
        assert_eq!(json["room"], "Hall");
    }
}
