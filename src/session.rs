// 🗂️ Session State
// The boundary a front end drives: month selection, file submission,
// parse statistics, report generation, export trigger

use crate::aggregate::{build_reports, EmployeeReport};
use crate::catalog::TariffCatalog;
use crate::export::{build_csv, export_file_name};
use crate::parser::{parse_text, NormalizedRecord};
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use std::fs;
use std::path::Path;

// ============================================================================
// PARSE STATISTICS
// ============================================================================

/// Skipped/valid/total counts surfaced next to the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Candidate billing rows seen in the file, across all months
    pub total_rows: usize,
    /// Parsed records matching the selected month
    pub valid_rows: usize,
    /// `max(total - valid, 0)`
    pub skipped_rows: usize,
}

// ============================================================================
// SESSION
// ============================================================================

/// Everything recomputes from `records` on demand; loading a file or
/// changing the month never mutates derived state in place.
pub struct Session {
    selected_month: String,
    file_name: String,
    records: Vec<NormalizedRecord>,
    total_rows: usize,
    warning: String,
    loaded: bool,
}

impl Session {
    /// Fresh session, selected month defaulting to the current one
    pub fn new() -> Self {
        Session {
            selected_month: current_month_key(),
            file_name: String::new(),
            records: Vec::new(),
            total_rows: 0,
            warning: String::new(),
            loaded: false,
        }
    }

    pub fn selected_month(&self) -> &str {
        &self.selected_month
    }

    pub fn set_selected_month(&mut self, month: impl Into<String>) {
        self.selected_month = month.into();
    }

    /// Display name of the last loaded file (empty before the first load)
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Advisory warning from the last parse (empty = none)
    pub fn warning(&self) -> &str {
        &self.warning
    }

    /// Whether a file has been parsed yet. Distinguishes "nothing
    /// uploaded" from "uploaded but the month has no data".
    pub fn has_data(&self) -> bool {
        self.loaded
    }

    /// Submit a file: read its bytes, decode the legacy encoding, parse.
    /// A read failure leaves the previously loaded data untouched.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        let text = decode_latin1(&bytes);

        self.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.load_text(&text);
        Ok(())
    }

    /// Parse already-decoded text, replacing the previous record set
    pub fn load_text(&mut self, text: &str) {
        let outcome = parse_text(text);
        self.total_rows = outcome.total_rows;
        self.records = outcome.records;
        self.warning = outcome.warning;
        self.loaded = true;
    }

    /// Valid rows are counted against the selected month
    pub fn stats(&self) -> ParseStats {
        let valid_rows = self
            .records
            .iter()
            .filter(|r| r.month == self.selected_month)
            .count();
        ParseStats {
            total_rows: self.total_rows,
            valid_rows,
            skipped_rows: self.total_rows.saturating_sub(valid_rows),
        }
    }

    /// Reports for the selected month, in first-occurrence order of the
    /// employees. Empty when no record matches.
    pub fn employee_reports(&self, catalog: &TariffCatalog) -> Vec<EmployeeReport> {
        build_reports(&self.records, &self.selected_month, catalog)
    }

    /// Summary CSV for the selected month
    pub fn export_csv(&self, catalog: &TariffCatalog) -> Result<String> {
        build_csv(&self.employee_reports(catalog))
    }

    /// Conventional file name for the export
    pub fn export_file_name(&self) -> String {
        export_file_name(&self.selected_month)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn current_month_key() -> String {
    let now = Local::now();
    format!("{:04}-{:02}", now.year(), now.month())
}

/// The scheduler exports ISO-8859-1; its 256 byte values map one-to-one
/// onto the first 256 Unicode scalars, so decoding is a direct widening.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

// ============================================================================
// TESTS
// ============================================================================
