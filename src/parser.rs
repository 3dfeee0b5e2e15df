// 🧾 Export Parser - tolerant row extraction
// Turns a semicolon-delimited scheduler export into normalized billing records

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// Base column offsets of the scheduler export (0-indexed, shift 0)
pub const TIMESTAMP_COLUMN: usize = 2;
pub const EMPLOYEE_COLUMN: usize = 3;
pub const TARIFF_COLUMN: usize = 7;

/// Timestamp format of the export: `DD.MM.YYYY HH:MM`
fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})\s+\d{2}:\d{2}$").unwrap())
}

/// Tariff sub-field: `Pos: <code> <n>min`, anywhere in the field
fn tariff_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Pos:\s*([A-Za-z0-9.]+)\s+(\d+)\s*min").unwrap())
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// One successfully parsed billing line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// Billing period, `"YYYY-MM"`
    pub month: String,
    /// Employee name in raw casing (display name is upper-cased later)
    pub employee: String,
    /// Tariff code as written in the export
    pub tariff: String,
    /// Billed minutes, always > 0
    pub minutes: u32,
}

/// Result of attempting to read one raw row.
///
/// The three-way split drives the skipped/valid/total statistic: rows that
/// are not billing lines at all (section headers, separators) must not
/// inflate the skip count, while genuinely broken billing lines must.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Not a billing line (no parseable timestamp, or employee/tariff
    /// field missing). Skipped silently, not counted.
    NotCandidate,
    /// Looks like a billing line but the tariff sub-field does not parse.
    /// Counted toward the total, contributes no record.
    Malformed,
    /// A complete billing line.
    Valid(NormalizedRecord),
}

/// Result of parsing a whole export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Every candidate billing row, whether or not its tariff field parsed
    pub total_rows: usize,
    /// Successfully parsed records, in input order
    pub records: Vec<NormalizedRecord>,
    /// Advisory warning from the delimited-text layer (empty = none)
    pub warning: String,
}

// ============================================================================
// ROW PARSER
// ============================================================================

/// `"01.03.2024 08:00"` → `"2024-03"`. Day 1-31 and month 1-12 only;
/// no further calendar validation (Feb 30 is accepted).
fn month_key_from_timestamp(timestamp: &str) -> Option<String> {
    let caps = timestamp_re().captures(timestamp.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    // Month key keeps the raw two-digit month text from the export
    Some(format!("{}-{}", &caps[3], &caps[2]))
}

/// Extract `(tariff_code, minutes)` from the tariff field.
/// Zero minutes are rejected; negative values never match the pattern.
fn parse_tariff_field(field: &str) -> Option<(String, u32)> {
    let caps = tariff_re().captures(field.trim())?;
    let minutes: u32 = caps[2].parse().ok()?;
    if minutes == 0 {
        return None;
    }
    Some((caps[1].to_string(), minutes))
}

fn field_at<'a>(fields: &'a [&'a str], base: usize, shift: i32) -> Option<&'a str> {
    let index = base as i32 + shift;
    if index < 0 {
        return None;
    }
    fields.get(index as usize).map(|f| f.trim())
}

/// Attempt extraction of a billing record from one raw row, reading the
/// fixed columns under the given shift (0, or -1 for exports that went
/// through a spreadsheet tool and lost their leading column).
pub fn parse_row(fields: &[&str], shift: i32) -> RowOutcome {
    let timestamp = field_at(fields, TIMESTAMP_COLUMN, shift);
    let employee = field_at(fields, EMPLOYEE_COLUMN, shift);
    let tariff_field = field_at(fields, TARIFF_COLUMN, shift);

    let month = timestamp.and_then(month_key_from_timestamp);

    let (month, employee, tariff_field) = match (month, employee, tariff_field) {
        (Some(m), Some(e), Some(t)) if !e.is_empty() && !t.is_empty() => (m, e, t),
        _ => return RowOutcome::NotCandidate,
    };

    match parse_tariff_field(tariff_field) {
        Some((tariff, minutes)) => RowOutcome::Valid(NormalizedRecord {
            month,
            employee: employee.to_string(),
            tariff,
            minutes,
        }),
        None => RowOutcome::Malformed,
    }
}

// ============================================================================
// TEXT PARSER
// ============================================================================

/// Group physical lines into logical rows, keeping line breaks inside
/// balanced quoted fields. A row whose quotes never re-balance before end
/// of input is quoting damage: it is broken back into its physical lines,
/// so one stray quote cannot swallow every row after it. Returns the rows
/// plus whether such damage was seen.
fn split_logical_rows(text: &str) -> (Vec<String>, bool) {
    let mut rows = Vec::new();
    let mut pending = String::new();
    let mut balanced = true;

    for line in text.lines() {
        if !pending.is_empty() {
            pending.push('\n');
        }
        pending.push_str(line);
        if line.matches('"').count() % 2 == 1 {
            balanced = !balanced;
        }
        if balanced {
            rows.push(std::mem::take(&mut pending));
        }
    }

    let damaged = !pending.is_empty();
    if damaged {
        rows.extend(pending.split('\n').map(|l| l.to_string()));
    }
    (rows, damaged)
}

/// Read the fields of one logical row. `Ok(None)` for a row the reader
/// yields nothing for (blank line).
fn read_row_fields(row: &str) -> Result<Option<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(row.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => Ok(Some(record.iter().map(|f| f.to_string()).collect())),
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Parse a whole decoded export. Semicolon-delimited, standard CSV quoting,
/// blank lines skipped without counting. Each row is tried at shift 0
/// first; the shift -1 fallback only fires when shift 0 sees no candidate,
/// so a row valid under shift 0 is never reinterpreted.
///
/// Quoting damage (a quote that never closes) is advisory: it sets the
/// warning string and the affected line parses as well as it can, while
/// every other row is processed normally.
pub fn parse_text(text: &str) -> ParseOutcome {
    let (rows, mut reader_errors) = split_logical_rows(text);

    let mut outcome = ParseOutcome {
        total_rows: 0,
        records: Vec::new(),
        warning: String::new(),
    };

    for raw in &rows {
        let row = match read_row_fields(raw) {
            Ok(Some(fields)) => fields,
            Ok(None) => continue,
            Err(_) => {
                reader_errors = true;
                continue;
            }
        };

        let fields: Vec<&str> = row.iter().map(|f| f.as_str()).collect();
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let parsed = match parse_row(&fields, 0) {
            RowOutcome::NotCandidate => parse_row(&fields, -1),
            candidate => candidate,
        };

        match parsed {
            RowOutcome::NotCandidate => {}
            RowOutcome::Malformed => outcome.total_rows += 1,
            RowOutcome::Valid(record) => {
                outcome.total_rows += 1;
                outcome.records.push(record);
            }
        }
    }

    if reader_errors {
        outcome.warning = "CSV parsing reported errors; some rows may be skipped.".to_string();
    }

    outcome
}

// ============================================================================
// TESTS
// ============================================================================
