//! CSV import normalizer.
//!
//! Turns a vendor calendar export into appointment records: a
//! character-level CSV parser that survives quoted multiline fields,
//! fuzzy column resolution over unpredictable header names, day-first
//! date disambiguation, and on-demand client creation. Imported
//! appointments land on the "Sin asignar" sentinel crew.
//!
//! The import is best-effort per row: once the header row validates,
//! row failures are collected and reported next to the success count
//! rather than aborting the run.

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info};

use shared::CreateClientRequest;

use crate::domain::appointment_service::AppointmentService;
use crate::domain::client_service::ClientService;
use crate::domain::commands::appointments::CreateAppointmentCommand;
use crate::domain::commands::import::{ImportCsvCommand, ImportReport};
use crate::domain::crew_service::CrewService;
use crate::domain::time_grid::to_minutes;

const SUBJECT_COLUMNS: &[&str] = &["Subject", "Asunto", "Cliente", "Nombre", "Client"];
const START_DATE_COLUMNS: &[&str] = &["Start Date", "Fecha inicio", "StartDate", "Date"];
const START_TIME_COLUMNS: &[&str] = &["Start Time", "Hora inicio", "StartTime", "Time"];
const END_DATE_COLUMNS: &[&str] = &["End Date", "Fecha fin", "EndDate"];
const END_TIME_COLUMNS: &[&str] = &["End Time", "Hora fin", "EndTime"];
const DESCRIPTION_COLUMNS: &[&str] = &["Description", "Descripcion", "Notes", "Notas"];
const LOCATION_COLUMNS: &[&str] = &["Location", "Ubicacion", "Address", "Direccion"];

/// Address placeholder for auto-created clients whose row carries no
/// location text.
const PLACEHOLDER_ADDRESS: &str = "Sin direccion";
const CARE_INSTRUCTIONS_CAP: usize = 500;

/// Service that imports vendor CSV exports into the appointment store.
#[derive(Clone)]
pub struct ImportService {
    appointments: AppointmentService,
    clients: ClientService,
    crews: CrewService,
}

impl ImportService {
    /// Create a new ImportService.
    pub fn new(
        appointments: AppointmentService,
        clients: ClientService,
        crews: CrewService,
    ) -> Self {
        Self {
            appointments,
            clients,
            crews,
        }
    }

    /// Import a CSV export. Header validation failures return a report
    /// with zero imports and a single error; everything after that is
    /// collected per row.
    pub fn import_csv(&self, command: ImportCsvCommand) -> Result<ImportReport> {
        let rows = parse_csv(&command.content);
        if rows.is_empty() {
            return Ok(ImportReport {
                imported_count: 0,
                errors: vec!["file contains no rows".to_string()],
            });
        }

        let headers = &rows[0];
        let Some(subject_col) = find_column(headers, SUBJECT_COLUMNS) else {
            return Ok(ImportReport {
                imported_count: 0,
                errors: vec!["no client/subject column found in header".to_string()],
            });
        };
        let Some(date_col) = find_column(headers, START_DATE_COLUMNS) else {
            return Ok(ImportReport {
                imported_count: 0,
                errors: vec!["no start date column found in header".to_string()],
            });
        };
        let time_col = find_column(headers, START_TIME_COLUMNS);
        let end_date_col = find_column(headers, END_DATE_COLUMNS);
        let end_time_col = find_column(headers, END_TIME_COLUMNS);
        let description_col = find_column(headers, DESCRIPTION_COLUMNS);
        let location_col = find_column(headers, LOCATION_COLUMNS);

        let unassigned = self.crews.get_or_create_unassigned()?;

        // Clients created earlier in this run, keyed by lowercased name,
        // so repeated rows reuse the record instead of duplicating it.
        let mut run_cache: HashMap<String, String> = HashMap::new();

        let mut imported_count = 0;
        let mut errors = Vec::new();

        for (index, row) in rows.iter().skip(1).enumerate() {
            // Data row i sits on CSV line i+2 (header is line 1).
            let line = index + 2;

            let name = cell(row, Some(subject_col));
            if name.is_empty() {
                debug!("Skipping CSV line {} with empty subject", line);
                continue;
            }

            let date_text = cell(row, Some(date_col));
            let Some(date) = parse_date(date_text) else {
                errors.push(format!("Row {}: invalid date/time '{}'", line, date_text));
                continue;
            };

            let time_text = cell(row, time_col);
            let (start_hour, start_minute) = parse_clock(time_text);

            let end_date_text = match end_date_col {
                Some(col) => cell(row, Some(col)),
                None => date_text,
            };
            let end_time_text = match end_time_col {
                Some(col) => cell(row, Some(col)),
                None => time_text,
            };
            let duration_minutes =
                infer_duration(&date, start_hour, start_minute, end_date_text, end_time_text);

            let description = cell(row, description_col);
            let location = cell(row, location_col);

            let client_id = match self.resolve_client(&mut run_cache, name, location, description) {
                Ok(id) => id,
                Err(err) => {
                    errors.push(format!("Row {}: {}", line, err));
                    continue;
                }
            };

            let command = CreateAppointmentCommand {
                client_id,
                crew_id: unassigned.id.clone(),
                date: date.clone(),
                start_hour,
                start_minute,
                duration_minutes,
                tasks: None,
                notes: if description.is_empty() {
                    None
                } else {
                    Some(description.to_string())
                },
            };
            match self.appointments.create(command) {
                Ok(_) => imported_count += 1,
                Err(err) => errors.push(format!("Row {}: {}", line, err)),
            }
        }

        info!(
            "CSV import finished: {} appointments created, {} row errors",
            imported_count,
            errors.len()
        );
        Ok(ImportReport {
            imported_count,
            errors,
        })
    }

    /// Resolve a client by name: this run's cache first, then the store,
    /// then auto-create from the row's location and description.
    fn resolve_client(
        &self,
        run_cache: &mut HashMap<String, String>,
        name: &str,
        location: &str,
        description: &str,
    ) -> Result<String> {
        let key = name.to_lowercase();
        if let Some(id) = run_cache.get(&key) {
            return Ok(id.clone());
        }
        if let Some(existing) = self.clients.find_by_name(name)? {
            run_cache.insert(key, existing.id.clone());
            return Ok(existing.id);
        }

        let address = if location.is_empty() {
            PLACEHOLDER_ADDRESS.to_string()
        } else {
            location.to_string()
        };
        let client = self.clients.create(CreateClientRequest {
            name: name.to_string(),
            phone: String::new(),
            email: String::new(),
            address,
            city: String::new(),
            state: "MO".to_string(),
            zip: String::new(),
            sqft: 0,
            bedrooms: 0,
            bathrooms: 0,
            care_instructions: description.chars().take(CARE_INSTRUCTIONS_CAP).collect(),
            images: None,
        })?;
        run_cache.insert(key, client.id.clone());
        Ok(client.id)
    }
}

enum ParseState {
    Field,
    QuotedField,
}

/// Character-level CSV parser. Doubled quotes inside a quoted field are
/// literal quotes, CR, LF and CRLF all end a record, and a record that
/// is a single empty field (a blank line) is dropped. Fields are
/// trimmed. All other rows, short ones included, are kept.
fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = ParseState::Field;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            ParseState::QuotedField => {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        state = ParseState::Field;
                    }
                } else {
                    field.push(c);
                }
            }
            ParseState::Field => match c {
                '"' => state = ParseState::QuotedField,
                ',' => {
                    row.push(field.trim().to_string());
                    field.clear();
                }
                '\r' | '\n' => {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    finish_row(&mut rows, &mut row, &mut field);
                }
                _ => field.push(c),
            },
        }
    }
    if !row.is_empty() || !field.trim().is_empty() {
        finish_row(&mut rows, &mut row, &mut field);
    }
    rows
}

fn finish_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String) {
    row.push(field.trim().to_string());
    field.clear();
    let is_blank_line = row.len() == 1 && row[0].is_empty();
    if !is_blank_line {
        rows.push(std::mem::take(row));
    } else {
        row.clear();
    }
}

/// Resolve a logical field to a header index. Header names and
/// candidates are compared lowercased with non-alphanumeric characters
/// stripped, matching when either is a substring of the other. The
/// candidate list is the outer loop so more specific names win over
/// generic ones ("Start Date" claims its header before "Date" can).
fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
    for candidate in candidates {
        let candidate = normalize(candidate);
        for (index, header) in normalized.iter().enumerate() {
            if !header.is_empty()
                && (header.contains(&candidate) || candidate.contains(header.as_str()))
            {
                return Some(index);
            }
        }
    }
    None
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.as_str())
        .unwrap_or("")
}

/// Parse a vendor date token into ISO `YYYY-MM-DD`.
///
/// The token splits on `/`, `-` or `.` into at least three numeric
/// parts, year last. Whichever of the first two parts exceeds 12 is the
/// day; when neither does, day-first order is assumed. Two-digit years
/// mean `2000 + yy`; anything above 100 is taken literally.
fn parse_date(text: &str) -> Option<String> {
    let parts: Vec<&str> = text
        .split(['/', '-', '.'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 {
        return None;
    }
    let first: u32 = parts[0].parse().ok()?;
    let second: u32 = parts[1].parse().ok()?;
    let year_raw: i32 = parts[2].parse().ok()?;

    let year = if year_raw > 100 { year_raw } else { 2000 + year_raw };
    let (day, month) = if first > 12 {
        (first, second)
    } else if second > 12 {
        (second, first)
    } else {
        (first, second)
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Parse an `H:MM` clock token with an optional am/pm marker. A `pm`
/// marker adds 12 to hours below 12; `am` turns hour 12 into 0.
/// Missing or unrecognizable tokens default to 09:00.
fn parse_clock(text: &str) -> (u32, u32) {
    const DEFAULT: (u32, u32) = (9, 0);

    let lower = text.trim().to_lowercase();
    let bytes = lower.as_bytes();
    let Some(colon) = lower.find(':') else {
        return DEFAULT;
    };

    let mut hour_start = colon;
    while hour_start > 0 && bytes[hour_start - 1].is_ascii_digit() && colon - hour_start < 2 {
        hour_start -= 1;
    }
    if hour_start == colon || colon + 2 >= lower.len() {
        return DEFAULT;
    }
    if !bytes[colon + 1].is_ascii_digit() || !bytes[colon + 2].is_ascii_digit() {
        return DEFAULT;
    }

    let Ok(mut hour) = lower[hour_start..colon].parse::<u32>() else {
        return DEFAULT;
    };
    let Ok(minute) = lower[colon + 1..colon + 3].parse::<u32>() else {
        return DEFAULT;
    };
    if minute > 59 {
        return DEFAULT;
    }

    if lower.contains("pm") && hour < 12 {
        hour += 12;
    }
    if lower.contains("am") && hour == 12 {
        hour = 0;
    }
    (hour, minute)
}

/// Infer the appointment duration from the row's end columns. Only an
/// end on the same calendar date contributes; a non-positive span is
/// floored to 60, and rows without a usable end default to 60.
fn infer_duration(
    start_date: &str,
    start_hour: u32,
    start_minute: u32,
    end_date_text: &str,
    end_time_text: &str,
) -> u32 {
    let Some(end_date) = parse_date(end_date_text) else {
        return 60;
    };
    if end_date != start_date {
        return 60;
    }
    let (end_hour, end_minute) = parse_clock(end_time_text);
    let start = to_minutes(start_hour, start_minute) as i64;
    let end = to_minutes(end_hour, end_minute) as i64;
    if end - start <= 0 {
        60
    } else {
        (end - start) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{
        AppointmentRepository, ClientRepository, CrewRepository, MemoryConnection,
    };
    use std::sync::Arc;

    struct Fixture {
        import: ImportService,
        appointments: AppointmentService,
        clients: ClientService,
        crews: CrewService,
    }

    fn setup() -> Fixture {
        let connection = Arc::new(MemoryConnection::new());
        let appointments = AppointmentService::new(AppointmentRepository::new(connection.clone()));
        let clients = ClientService::new(ClientRepository::new(connection.clone()));
        let crews = CrewService::new(CrewRepository::new(connection));
        let import = ImportService::new(appointments.clone(), clients.clone(), crews.clone());
        Fixture {
            import,
            appointments,
            clients,
            crews,
        }
    }

    fn run(fixture: &Fixture, content: &str) -> ImportReport {
        fixture
            .import
            .import_csv(ImportCsvCommand {
                content: content.to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_parse_csv_quoted_comma_and_doubled_quote() {
        let rows = parse_csv("\"a \"\"b\"\", c\",d\n");
        assert_eq!(rows, vec![vec!["a \"b\", c".to_string(), "d".to_string()]]);
    }

    #[test]
    fn test_parse_csv_drops_blank_lines_and_handles_crlf() {
        let rows = parse_csv("a,b\r\n\r\nc,d\n\ne");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()],
                vec!["e".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_csv_quoted_field_spans_lines() {
        let rows = parse_csv("\"line one\nline two\",x");
        assert_eq!(
            rows,
            vec![vec!["line one\nline two".to_string(), "x".to_string()]]
        );
    }

    #[test]
    fn test_find_column_prefers_specific_candidates() {
        let headers: Vec<String> = ["Subject", "End Date", "Start Date"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(find_column(&headers, START_DATE_COLUMNS), Some(2));
        assert_eq!(find_column(&headers, END_DATE_COLUMNS), Some(1));
    }

    #[test]
    fn test_date_disambiguation() {
        assert_eq!(parse_date("25/03/2026").as_deref(), Some("2026-03-25"));
        assert_eq!(parse_date("03/25/2026").as_deref(), Some("2026-03-25"));
        // Day-first tie-break and two-digit year.
        assert_eq!(parse_date("5/3/26").as_deref(), Some("2026-03-05"));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("31/02/2026"), None);
    }

    #[test]
    fn test_clock_parsing() {
        assert_eq!(parse_clock("2:30 PM"), (14, 30));
        assert_eq!(parse_clock("12:15 AM"), (0, 15));
        assert_eq!(parse_clock("12:00 PM"), (12, 0));
        assert_eq!(parse_clock("08:05"), (8, 5));
        assert_eq!(parse_clock(""), (9, 0));
        assert_eq!(parse_clock("noonish"), (9, 0));
    }

    #[test]
    fn test_import_scenario_creates_client_and_unassigned_appointment() {
        let fixture = setup();
        let report = run(
            &fixture,
            "Subject,Start Date,Start Time\n\"Acme Corp\",\"03/25/2026\",\"2:30 PM\"\n",
        );

        assert_eq!(report.imported_count, 1);
        assert!(report.errors.is_empty());

        let client = fixture.clients.find_by_name("Acme Corp").unwrap().unwrap();
        assert_eq!(client.address, "Sin direccion");
        assert_eq!(client.state, "MO");

        let unassigned = fixture.crews.get_or_create_unassigned().unwrap();
        let all = fixture
            .appointments
            .list(&Default::default())
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].client_id, client.id);
        assert_eq!(all[0].crew_id, unassigned.id);
        assert_eq!(all[0].date, "2026-03-25");
        assert_eq!((all[0].start_hour, all[0].start_minute), (14, 30));
        assert_eq!(all[0].duration_minutes, 60);
    }

    #[test]
    fn test_import_duration_from_end_columns() {
        let fixture = setup();
        let report = run(
            &fixture,
            "Subject,Start Date,Start Time,End Date,End Time\n\
             Acme Corp,25/03/2026,10:00,25/03/2026,11:30\n\
             Beta LLC,25/03/2026,10:00,26/03/2026,11:30\n",
        );

        assert_eq!(report.imported_count, 2);
        let all = fixture.appointments.list(&Default::default()).unwrap();
        let acme = all.iter().find(|a| a.duration_minutes == 90);
        assert!(acme.is_some(), "same-date end should yield 90 minutes");
        // End on a different date falls back to the default.
        assert!(all.iter().any(|a| a.duration_minutes == 60));
    }

    #[test]
    fn test_import_reuses_client_within_run() {
        let fixture = setup();
        let report = run(
            &fixture,
            "Subject,Start Date\nAcme Corp,25/03/2026\nacme corp,26/03/2026\n",
        );

        assert_eq!(report.imported_count, 2);
        assert_eq!(fixture.clients.list().unwrap().len(), 1);
    }

    #[test]
    fn test_import_missing_start_date_column_aborts() {
        let fixture = setup();
        let report = run(&fixture, "Subject,Time\nAcme Corp,2:30 PM\n");

        assert_eq!(report.imported_count, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("start date"));
        assert!(fixture.appointments.list(&Default::default()).unwrap().is_empty());
    }

    #[test]
    fn test_import_bad_date_is_row_error_and_continues() {
        let fixture = setup();
        let report = run(
            &fixture,
            "Subject,Start Date\nAcme Corp,yesterday\nBeta LLC,25/03/2026\n",
        );

        assert_eq!(report.imported_count, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Row 2:"));
    }

    #[test]
    fn test_import_skips_empty_subject_silently() {
        let fixture = setup();
        let report = run(&fixture, "Subject,Start Date\n,25/03/2026\n");

        assert_eq!(report.imported_count, 0);
        assert!(report.errors.is_empty());
    }
}
