// 📊 Aggregation Pipeline
// Groups normalized records by employee and sums minutes per tariff code

use crate::catalog::{Tariff, TariffCatalog};
use crate::parser::NormalizedRecord;
use crate::profession::{guess_profession, UNKNOWN_PROFESSION};
use crate::rules::{check_violations, Violation};
use indexmap::IndexMap;
use serde::Serialize;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Aggregated minutes for one tariff code, with catalog metadata attached
/// when the code is known. Unknown codes are still tracked and reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffSum {
    pub minutes: u32,
    pub tariff: Option<Tariff>,
}

/// Per-tariff sums in first-occurrence order
pub type TariffSums = IndexMap<String, TariffSum>;

/// One employee's share of the selected month
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeReport {
    /// Upper-cased display name
    pub name: String,
    /// Inferred profession, `"Unbekannt"` when ambiguous
    pub profession: String,
    pub sums: TariffSums,
    /// Rule violations; empty for employees classified `"Unbekannt"`
    pub violations: Vec<Violation>,
}

impl EmployeeReport {
    /// Total billed minutes across all tariffs
    pub fn total_minutes(&self) -> u32 {
        self.sums
            .values()
            .fold(0u32, |total, s| total.saturating_add(s.minutes))
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Sum minutes per tariff code over one employee's records.
/// Commutative and associative over the input order; the map iterates in
/// first-occurrence order of the codes.
pub fn sum_by_tariff(records: &[&NormalizedRecord], catalog: &TariffCatalog) -> TariffSums {
    let mut sums = TariffSums::new();
    for record in records {
        let entry = sums
            .entry(record.tariff.clone())
            .or_insert_with(|| TariffSum {
                minutes: 0,
                tariff: catalog.lookup(&record.tariff).cloned(),
            });
        // Saturate rather than panic on absurd minute values the row
        // parser still accepts
        entry.minutes = entry.minutes.saturating_add(record.minutes);
    }
    sums
}

/// Group the selected month's records by employee (exact, case-sensitive
/// name match), preserving first-occurrence order of the employees.
pub fn group_by_employee<'a>(
    records: &'a [NormalizedRecord],
    month: &str,
) -> IndexMap<&'a str, Vec<&'a NormalizedRecord>> {
    let mut groups: IndexMap<&str, Vec<&NormalizedRecord>> = IndexMap::new();
    for record in records.iter().filter(|r| r.month == month) {
        groups.entry(record.employee.as_str()).or_default().push(record);
    }
    groups
}

/// Full pipeline for one month: group, sum, classify, check rules.
/// Violations are suppressed when the classifier could not settle on a
/// profession, so its own uncertainty never turns into spurious findings.
pub fn build_reports(
    records: &[NormalizedRecord],
    month: &str,
    catalog: &TariffCatalog,
) -> Vec<EmployeeReport> {
    group_by_employee(records, month)
        .into_iter()
        .map(|(employee, rows)| {
            let sums = sum_by_tariff(&rows, catalog);
            let profession = guess_profession(&sums);
            let violations = if profession == UNKNOWN_PROFESSION {
                Vec::new()
            } else {
                check_violations(&profession, &sums)
            };
            EmployeeReport {
                name: employee.to_uppercase(),
                profession,
                sums,
                violations,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
