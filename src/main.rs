use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde_json::Value;

use schedule_integrity::{check, normalize, PolicyConfig, RawRecord};

/// Certify a generated timetable against room, faculty, student-overlap,
/// recurrence, slot, and room-capacity rules.
#[derive(Parser)]
#[command(name = "schedule-integrity", version)]
struct Cli {
    /// Schedule table: JSON array of row objects
    #[arg(long)]
    schedule: PathBuf,

    /// Enrolment roster: JSON array of row objects
    #[arg(long)]
    enrolment: PathBuf,

    /// Conflict matrix: JSON array of row objects
    #[arg(long)]
    matrix: PathBuf,

    /// Policy overrides (TOML)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Print one student's timetable instead of the report
    #[arg(long, conflicts_with = "room")]
    student: Option<String>,

    /// Print the sessions held in one room instead of the report
    #[arg(long)]
    room: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn cell_text(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("nested value {other} is not a table cell")),
    }
}

fn read_table(path: &Path) -> Result<Vec<RawRecord>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let rows: Vec<BTreeMap<String, Value>> = serde_json::from_str(&text)
        .map_err(|e| format!("{}: expected a JSON array of objects: {e}", path.display()))?;
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(column, value)| Ok((column, cell_text(&value)?)))
                .collect::<Result<RawRecord, String>>()
        })
        .collect::<Result<Vec<_>, String>>()
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn run(cli: &Cli) -> Result<bool, String> {
    let policy = match &cli.policy {
        Some(path) => PolicyConfig::from_path(path).map_err(|e| e.to_string())?,
        None => PolicyConfig::default(),
    };
    let schedule = read_table(&cli.schedule)?;
    let enrolment = read_table(&cli.enrolment)?;
    let matrix = read_table(&cli.matrix)?;

    let normalized = normalize(&schedule, &enrolment, &matrix, &policy);

    if let Some(student) = &cli.student {
        let timetable = normalized
            .snapshot
            .student_timetable(student)
            .ok_or_else(|| format!("student {student} not found"))?;
        println!("{}", to_json(&timetable, cli.pretty).map_err(|e| e.to_string())?);
        return Ok(true);
    }

    if let Some(room) = &cli.room {
        let sessions = normalized.snapshot.sessions_in_room(room);
        if sessions.is_empty() {
            return Err(format!("room {room} not found"));
        }
        println!("{}", to_json(&sessions, cli.pretty).map_err(|e| e.to_string())?);
        return Ok(true);
    }

    let report = check(&normalized, &policy).map_err(|e| e.to_string())?;
    println!("{}", report.to_json(cli.pretty).map_err(|e| e.to_string())?);
    Ok(report.passed())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}
