//! Bulk player registration from CSV (`name, age, phone, club_id, event_name`).

use crate::models::{ClubId, NewPlayer, Result, Tournament, TournamentError};
use serde::{Deserialize, Serialize};
use std::io::Read;

pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "age", "phone", "club_id", "event_name"];

/// One problem row. `row` is the 1-based file line the record starts on.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CsvImportReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub inserted_count: usize,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    name: String,
    age: String,
    phone: String,
    club_id: String,
    event_name: String,
}

fn parse_row(tournament: &Tournament, row: CsvRow) -> std::result::Result<NewPlayer, String> {
    if [&row.name, &row.age, &row.phone, &row.club_id, &row.event_name]
        .iter()
        .any(|v| v.is_empty())
    {
        return Err("Missing required fields".to_string());
    }
    let age: u32 = row
        .age
        .parse()
        .map_err(|_| format!("Invalid age '{}'", row.age))?;
    let event = tournament
        .event_by_name(&row.event_name)
        .ok_or_else(|| format!("Event '{}' not found", row.event_name))?;
    let club_id: ClubId = row
        .club_id
        .parse()
        .map_err(|_| format!("Club {} not found", row.club_id))?;
    tournament
        .club(club_id)
        .map_err(|_| format!("Club {} not found", row.club_id))?;
    Ok(NewPlayer {
        name: row.name,
        age,
        phone: row.phone,
        club_id,
        event_ids: vec![event.id],
    })
}

/// Register every valid row of a CSV file. Bad rows are reported, not fatal;
/// only an unreadable header or a missing column fails the whole import.
pub fn import_players_csv<R: Read>(tournament: &mut Tournament, input: R) -> Result<CsvImportReport> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(TournamentError::Csv(format!("missing required column: {missing}")));
    }

    let mut report = CsvImportReport::default();
    let mut last_row = 1;
    for record in reader.records() {
        // Line the record starts on; quoted fields may span several lines.
        let line = match &record {
            Ok(r) => r.position().map(|p| p.line()),
            Err(e) => e.position().map(|p| p.line()),
        };
        let row = line
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(last_row + 1);
        last_row = row;
        report.total_rows += 1;

        let parsed = record
            .map_err(|e| e.to_string())
            .and_then(|r| r.deserialize::<CsvRow>(Some(&headers)).map_err(|e| e.to_string()))
            .and_then(|r| parse_row(tournament, r));
        let outcome = parsed.and_then(|p| {
            tournament
                .add_player(p)
                .map(|_| ())
                .map_err(|e| match e {
                    TournamentError::DuplicatePlayerInEvent { name, .. } => {
                        format!("Player '{name}' already registered in this event")
                    }
                    other => other.to_string(),
                })
        });

        match outcome {
            Ok(()) => {
                report.valid_rows += 1;
                report.inserted_count += 1;
            }
            Err(error) => {
                log::warn!("csv row {}: {}", row, error);
                report.invalid_rows += 1;
                report.errors.push(RowError { row, error });
            }
        }
    }
    log::info!(
        "csv import: {} of {} rows registered",
        report.inserted_count,
        report.total_rows
    );
    Ok(report)
}
