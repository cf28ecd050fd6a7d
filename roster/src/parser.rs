//! CSV roster import.
//!
//! Two shapes are accepted:
//!
//! - **Gradebook export**: header row with at least the columns `Student`,
//!   `ID`, `SIS User ID` and `SIS Login ID` (any order, any case). Rows
//!   whose `ID` is not purely numeric are summary rows ("Points Possible",
//!   test students) and are skipped without an error.
//! - **Legacy**: headerless, exactly positional `name, canvas id,
//!   sis user id, sis login id`.
//!
//! Row-level problems are collected as positional messages and never abort
//! the rest of the parse. A successful import replaces the whole roster.

use crate::name_match::canonicalize_name;
use crate::types::{RosterEntry, is_numeric_id};
use csv::ReaderBuilder;

/// Outcome of a roster import: the rows that parsed cleanly plus one
/// message per rejected row.
#[derive(Debug, Default)]
pub struct RosterParseResult {
    pub entries: Vec<RosterEntry>,
    pub errors: Vec<String>,
}

/// Parse roster CSV text, auto-detecting the shape from the first row.
pub fn parse_roster(text: &str) -> RosterParseResult {
    let raw = text.trim();
    if raw.is_empty() {
        return RosterParseResult {
            entries: Vec::new(),
            errors: vec!["Empty CSV".to_string()],
        };
    }

    let mut result = if detects_gradebook_header(raw) {
        parse_gradebook(raw)
    } else {
        parse_legacy(raw)
    };

    if result.entries.is_empty() && result.errors.is_empty() {
        result.errors.push("No valid student rows found".to_string());
    }
    result
}

/// Peek at the first record (no header interpretation) and report whether
/// it names all four gradebook columns, case-insensitively, in any order.
fn detects_gradebook_header(raw: &str) -> bool {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let first = match reader.records().next() {
        Some(Ok(record)) => record,
        _ => return false,
    };

    let lower: Vec<String> = first
        .iter()
        .map(|cell| cell.trim().to_lowercase())
        .collect();
    ["student", "id", "sis user id", "sis login id"]
        .iter()
        .all(|wanted| lower.iter().any(|cell| cell == wanted))
}

fn parse_gradebook(raw: &str) -> RosterParseResult {
    let mut result = RosterParseResult::default();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        Err(err) => {
            result.errors.push(format!("Header row unreadable: {err}"));
            return result;
        }
    };
    let column = |name: &str| headers.iter().position(|h| h == name);

    let student_col = column("student");
    let id_col = column("id");
    let sis_user_col = column("sis user id");
    let sis_login_col = column("sis login id");

    for (idx, record) in reader.records().enumerate() {
        // Header is row 1; the first data row is row 2.
        let row = idx + 2;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                result.errors.push(format!("Row {row}: {err}"));
                continue;
            }
        };
        let field = |col: Option<usize>| {
            col.and_then(|c| record.get(c)).unwrap_or("").trim().to_string()
        };

        let canvas_id = field(id_col);
        if !is_numeric_id(&canvas_id) {
            // Summary / non-student row.
            continue;
        }

        let name = canonicalize_name(&field(student_col));
        if name.is_empty() {
            result.errors.push(format!("Row {row}: empty Student"));
            continue;
        }

        let sis_user_id = field(sis_user_col);
        let sis_login_id = field(sis_login_col);
        if sis_user_id.is_empty() || sis_login_id.is_empty() {
            result
                .errors
                .push(format!("Row {row}: empty SIS User ID or SIS Login ID"));
            continue;
        }

        result.entries.push(RosterEntry {
            name,
            canvas_id,
            sis_user_id,
            sis_login_id,
        });
    }

    result
}

fn parse_legacy(raw: &str) -> RosterParseResult {
    let mut result = RosterParseResult::default();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                result.errors.push(format!("Row {row}: {err}"));
                continue;
            }
        };

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        // Tolerate a decorative header row.
        let c0 = record.get(0).unwrap_or("").trim().to_lowercase();
        let c1 = record.get(1).unwrap_or("").trim().to_lowercase();
        if c0 == "name" && c1.contains("canvas") {
            continue;
        }

        if record.len() < 4 {
            result.errors.push(format!("Row {row}: expected 4 columns"));
            continue;
        }

        let name = canonicalize_name(record.get(0).unwrap_or(""));
        let canvas_id = record.get(1).unwrap_or("").trim().to_string();
        let sis_user_id = record.get(2).unwrap_or("").trim().to_string();
        let sis_login_id = record.get(3).unwrap_or("").trim().to_string();

        if name.is_empty() || canvas_id.is_empty() || sis_user_id.is_empty()
            || sis_login_id.is_empty()
        {
            result.errors.push(format!("Row {row}: empty field"));
            continue;
        }
        if !is_numeric_id(&canvas_id) {
            result
                .errors
                .push(format!("Row {row}: Canvas ID not numeric: {canvas_id}"));
            continue;
        }

        result.entries.push(RosterEntry {
            name,
            canvas_id,
            sis_user_id,
            sis_login_id,
        });
    }

    result
}
