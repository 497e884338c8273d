//! Record normalization.
//!
//! Turns raw table rows (column name → cell text) into the canonical
//! models. Every table is normalized independently; a table with any
//! bad row is rejected as a whole and all of its errors are reported,
//! not just the first.
//!
//! Derived attributes filled in here:
//! - week index, from the date when the schedule has no week column
//! - canonical slot key, via the policy's alias table
//! - course, department, and faculty of every section seen

use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::bucket::{department_of, faculty_of};
use crate::config::PolicyConfig;
use crate::error::{IngestError, Table};
use crate::models::{course_of, whole_number, ConflictMatrix, Day, Enrolment, Section, Session};
use crate::snapshot::Snapshot;

/// One raw input row: column name → cell text.
pub type RawRecord = BTreeMap<String, String>;

/// Result of normalizing all three tables.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The accepted data. Rejected tables contribute nothing.
    pub snapshot: Snapshot,
    /// Every ingestion error, grouped by table in input order.
    pub errors: Vec<IngestError>,
    /// Tables rejected because of errors.
    pub rejected: BTreeSet<Table>,
}

/// Normalizes the schedule, enrolment, and conflict-matrix tables.
///
/// `policy` is expected to have passed [`PolicyConfig::validate`]; with a
/// zero faculty pool every section is left without faculty. The
/// [`check`](crate::validation::check) that consumes the result enforces it.
pub fn normalize(
    schedule: &[RawRecord],
    enrolment: &[RawRecord],
    matrix: &[RawRecord],
    policy: &PolicyConfig,
) -> Normalized {
    let mut errors = Vec::new();
    let mut rejected = BTreeSet::new();

    let sessions = accept(
        Table::Schedule,
        normalize_schedule(schedule, policy),
        &mut errors,
        &mut rejected,
    );
    let enrolments = accept(
        Table::Enrolment,
        normalize_enrolment(enrolment, policy),
        &mut errors,
        &mut rejected,
    );
    let matrix = accept(
        Table::ConflictMatrix,
        normalize_matrix(matrix, policy),
        &mut errors,
        &mut rejected,
    );

    let sections = derive_sections(&sessions, &enrolments, policy);
    debug!(
        "normalized {} sessions, {} enrolments, {} matrix cells, {} sections",
        sessions.len(),
        enrolments.len(),
        matrix.len(),
        sections.len()
    );

    Normalized {
        snapshot: Snapshot {
            sessions,
            sections,
            enrolments,
            matrix,
        },
        errors,
        rejected,
    }
}

fn accept<T: Default>(
    table: Table,
    result: Result<T, Vec<IngestError>>,
    errors: &mut Vec<IngestError>,
    rejected: &mut BTreeSet<Table>,
) -> T {
    match result {
        Ok(value) => value,
        Err(table_errors) => {
            warn!("{table} table rejected with {} error(s)", table_errors.len());
            errors.extend(table_errors);
            rejected.insert(table);
            T::default()
        }
    }
}

/// Trimmed, non-empty cell value.
fn cell<'a>(row: &'a RawRecord, column: &str) -> Option<&'a str> {
    row.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Strips whitespace and stray quoting characters from a date cell.
pub fn clean_date(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    let cleaned = clean_date(raw);
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
}

fn slot_lookup_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Maps free-text slot descriptions onto canonical slot keys.
#[derive(Debug, Clone)]
pub struct SlotTable {
    lookup: HashMap<String, String>,
}

impl SlotTable {
    /// Builds the table from the policy's canonical slots and aliases.
    pub fn from_policy(policy: &PolicyConfig) -> Self {
        let mut lookup = HashMap::new();
        for key in policy.canonical_slots() {
            lookup.insert(slot_lookup_key(key), key.to_string());
        }
        for (raw, key) in &policy.slot_aliases {
            lookup.insert(slot_lookup_key(raw), key.clone());
        }
        Self { lookup }
    }

    /// Canonical key for a raw description (whitespace- and case-insensitive).
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.lookup.get(&slot_lookup_key(raw)).map(String::as_str)
    }
}

struct ScheduleRow {
    row: usize,
    date: NaiveDate,
    week: Option<u32>,
    slot: String,
    room: String,
    section_id: String,
}

fn parse_schedule_row(
    index: usize,
    row: &RawRecord,
    policy: &PolicyConfig,
    slots: &SlotTable,
    errors: &mut Vec<IngestError>,
) -> Option<ScheduleRow> {
    let cols = &policy.columns;
    let before = errors.len();
    let mut missing = |column: &str| {
        errors.push(IngestError::malformed(
            Table::Schedule,
            index,
            format!("empty {column}"),
        ))
    };

    let section_id = cell(row, &cols.section);
    if section_id.is_none() {
        missing(&cols.section);
    }
    let room = cell(row, &cols.room);
    if room.is_none() {
        missing(&cols.room);
    }
    let day_raw = cell(row, &cols.day);
    if day_raw.is_none() {
        missing(&cols.day);
    }
    let date_raw = cell(row, &cols.date).filter(|d| !clean_date(d).is_empty());
    if date_raw.is_none() {
        missing(&cols.date);
    }
    let slot_raw = cell(row, &cols.slot);
    if slot_raw.is_none() {
        missing(&cols.slot);
    }

    let day = day_raw.and_then(|raw| {
        let day = Day::parse(raw);
        if day.is_none() {
            errors.push(IngestError::malformed(
                Table::Schedule,
                index,
                format!("unknown day {raw:?}"),
            ));
        }
        day
    });
    let date = date_raw.and_then(|raw| {
        let date = parse_date(raw, &policy.date_formats);
        if date.is_none() {
            errors.push(IngestError::malformed(
                Table::Schedule,
                index,
                format!("unparseable date {raw:?}"),
            ));
        }
        date
    });
    let slot = slot_raw.and_then(|raw| {
        let slot = slots.resolve(raw);
        if slot.is_none() {
            errors.push(IngestError::UnmappedSlot {
                row: index,
                raw: raw.to_string(),
            });
        }
        slot
    });
    let week = match cell(row, &cols.week) {
        None => None,
        Some(raw) => match whole_number(raw) {
            Some(w) if w > 0 => Some(w),
            _ => {
                errors.push(IngestError::malformed(
                    Table::Schedule,
                    index,
                    format!("invalid week {raw:?}"),
                ));
                None
            }
        },
    };

    if let (Some(day), Some(date)) = (day, date) {
        let actual = Day::from(date.weekday());
        if day != actual {
            errors.push(IngestError::malformed(
                Table::Schedule,
                index,
                format!("day {day} does not match date {date} ({actual})"),
            ));
        }
    }

    if errors.len() > before {
        return None;
    }
    Some(ScheduleRow {
        row: index,
        date: date?,
        week,
        slot: slot?.to_string(),
        room: room?.to_string(),
        section_id: section_id?.to_string(),
    })
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Normalizes the schedule table into sessions, in input order.
pub fn normalize_schedule(
    rows: &[RawRecord],
    policy: &PolicyConfig,
) -> Result<Vec<Session>, Vec<IngestError>> {
    let slots = SlotTable::from_policy(policy);
    let mut errors = Vec::new();
    let parsed: Vec<ScheduleRow> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| parse_schedule_row(i, row, policy, &slots, &mut errors))
        .collect();

    let with_week = parsed.iter().filter(|r| r.week.is_some()).count();
    if with_week > 0 && with_week < parsed.len() {
        for r in parsed.iter().filter(|r| r.week.is_none()) {
            errors.push(IngestError::malformed(
                Table::Schedule,
                r.row,
                format!("empty {} while other rows carry one", policy.columns.week),
            ));
        }
    }
    if !errors.is_empty() {
        errors.sort_by_key(ingest_row);
        return Err(errors);
    }

    let first_monday = parsed.iter().map(|r| monday_of(r.date)).min();
    Ok(parsed
        .into_iter()
        .map(|r| {
            let week = r.week.unwrap_or_else(|| {
                let origin = first_monday.unwrap_or(r.date);
                ((monday_of(r.date) - origin).num_days() / 7 + 1) as u32
            });
            Session::new(r.date, week, r.slot, r.room, r.section_id)
        })
        .collect())
}

fn ingest_row(e: &IngestError) -> usize {
    match e {
        IngestError::MalformedRecord { row, .. }
        | IngestError::UnmappedSlot { row, .. }
        | IngestError::NonNumericRoom { row, .. } => *row,
    }
}

/// Normalizes the enrolment roster. Duplicate pairs are dropped.
pub fn normalize_enrolment(
    rows: &[RawRecord],
    policy: &PolicyConfig,
) -> Result<Vec<Enrolment>, Vec<IngestError>> {
    let cols = &policy.columns;
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();

    for (i, row) in rows.iter().enumerate() {
        let student = cell(row, &cols.student);
        let section = cell(row, &cols.enrolment_section);
        match (student, section) {
            (Some(student), Some(section)) => {
                if !seen.insert(Enrolment::new(student, section)) {
                    debug!("dropping duplicate enrolment {student} in {section} at row {i}");
                }
            }
            (student, _) => {
                let column = if student.is_none() {
                    &cols.student
                } else {
                    &cols.enrolment_section
                };
                errors.push(IngestError::malformed(
                    Table::Enrolment,
                    i,
                    format!("empty {column}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(seen.into_iter().collect())
    } else {
        Err(errors)
    }
}

/// Normalizes the square conflict-matrix table.
///
/// Each row names its section in one of the policy's index columns;
/// every other non-empty cell is a shared-student count.
pub fn normalize_matrix(
    rows: &[RawRecord],
    policy: &PolicyConfig,
) -> Result<ConflictMatrix, Vec<IngestError>> {
    let mut matrix = ConflictMatrix::new(policy.sentinel);
    let mut errors = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let label = policy
            .columns
            .matrix_index
            .iter()
            .find_map(|col| cell(row, col).map(|v| (col.as_str(), v)));
        let Some((label_col, label)) = label else {
            errors.push(IngestError::malformed(
                Table::ConflictMatrix,
                i,
                "missing row label",
            ));
            continue;
        };

        for (column, value) in row {
            let value = value.trim();
            if column == label_col || value.is_empty() {
                continue;
            }
            match whole_number(value) {
                Some(count) => {
                    if !matrix.record(label, column.trim(), count) {
                        warn!("asymmetric conflict matrix cell {label}/{column}; keeping larger value");
                    }
                }
                None => errors.push(IngestError::malformed(
                    Table::ConflictMatrix,
                    i,
                    format!("non-integer cell {value:?} in column {column:?}"),
                )),
            }
        }
    }

    if errors.is_empty() {
        Ok(matrix)
    } else {
        Err(errors)
    }
}

/// Builds the section table from every section id seen in sessions and
/// enrolments, with deterministic department and faculty.
pub fn derive_sections(
    sessions: &[Session],
    enrolments: &[Enrolment],
    policy: &PolicyConfig,
) -> BTreeMap<String, Section> {
    let ids: BTreeSet<&str> = sessions
        .iter()
        .map(|s| s.section_id.as_str())
        .chain(enrolments.iter().map(|e| e.section_id.as_str()))
        .collect();

    ids.into_iter()
        .map(|id| {
            let course = course_of(id, policy.section_separator);
            let section = Section::new(id, course)
                .with_department(department_of(course, &policy.departments).unwrap_or_default())
                .with_faculty(faculty_of(course, policy.faculty_pool).unwrap_or_default());
            (id.to_string(), section)
        })
        .collect()
}
