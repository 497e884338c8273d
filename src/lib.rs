//! Timetable integrity validation.
//!
//! Certifies that a generated class schedule is free of room, faculty,
//! and student-overlap conflicts and follows the institution's slot,
//! recurrence, and room-capacity policies. The schedule optimizer and
//! any presentation layer are external; this crate only judges.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Session`, `Section`, `Enrolment`,
//!   `ConflictMatrix`, `CapacityPolicy`, `Violation`
//! - **`normalize`**: Raw table rows → models; ingestion errors
//! - **`index`**: Lookup indexes shared by all checks
//! - **`checks`**: Conflict detection and policy checks
//! - **`report`**: Verdict aggregation and summary metrics
//! - **`validation`**: The `validate` entry point
//!
//! # Example
//!
//! ```
//! use schedule_integrity::{validate, RawRecord};
//!
//! let row = |pairs: &[(&str, &str)]| -> RawRecord {
//!     pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
//! };
//! let schedule = vec![row(&[
//!     ("Date", "2025-01-06"),
//!     ("Week", "1"),
//!     ("Day", "Monday"),
//!     ("Time_Slot", "09:00"),
//!     ("Room_Number", "8"),
//!     ("Course_Section", "FIN101-A"),
//! ])];
//! let report = validate(&schedule, &[], &[]);
//! assert!(report.passed());
//! ```

pub mod bucket;
pub mod checks;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod normalize;
pub mod report;
pub mod snapshot;
pub mod validation;

pub use config::PolicyConfig;
pub use error::{ConfigError, IngestError, Table};
pub use normalize::{normalize, Normalized, RawRecord};
pub use report::{CheckOutcome, CheckStatus, Report, TimetableSummary, Verdict};
pub use snapshot::{Snapshot, StudentTimetable};
pub use validation::{check, validate, validate_with};
