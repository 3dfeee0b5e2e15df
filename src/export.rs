// 📤 Summary Export
// Re-exportable CSV of (employee, tariff, totalMinutes) triples

use crate::aggregate::EmployeeReport;
use anyhow::{Context, Result};

/// Conventional download name for an exported month
pub fn export_file_name(month: &str) -> String {
    format!("calculateur-{}.csv", month)
}

/// Serialize the reports to semicolon-delimited text, header
/// `employee;tariff;totalMinutes`. Employees sort ascending by display
/// name, tariff codes ascending within an employee. Values are quoted
/// only when necessary, mirroring the input convention.
pub fn build_csv(reports: &[EmployeeReport]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer
        .write_record(["employee", "tariff", "totalMinutes"])
        .context("Failed to write CSV header")?;

    // Byte-wise ordering, not locale collation: umlauts sort after Z
    let mut sorted: Vec<&EmployeeReport> = reports.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for report in sorted {
        let mut codes: Vec<&String> = report.sums.keys().collect();
        codes.sort();

        for code in codes {
            let minutes = report.sums[code.as_str()].minutes.to_string();
            writer
                .write_record([report.name.as_str(), code.as_str(), minutes.as_str()])
                .context("Failed to write CSV row")?;
        }
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("Exported CSV is not valid UTF-8")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{TariffSum, TariffSums};
    use crate::profession::UNKNOWN_PROFESSION;

    fn report(name: &str, sums: &[(&str, u32)]) -> EmployeeReport {
        let sums: TariffSums = sums
            .iter()
            .map(|(code, minutes)| {
                (
                    code.to_string(),
                    TariffSum {
                        minutes: *minutes,
                        tariff: None,
                    },
                )
            })
            .collect();
        EmployeeReport {
            name: name.to_string(),
            profession: UNKNOWN_PROFESSION.to_string(),
            sums,
            violations: Vec::new(),
        }
    }

    #[test]
    fn test_single_record_round_trip() {
        let reports = vec![report("JANE DOE", &[("AA.01", 30)])];

        let csv = build_csv(&reports).unwrap();
        assert_eq!(csv, "employee;tariff;totalMinutes\nJANE DOE;AA.01;30\n");
    }

    #[test]
    fn test_sorted_employees_and_tariffs() {
        let reports = vec![
            report("ZOE MÜLLER", &[("CC.03", 10), ("AA.01", 20)]),
            report("ADAM BERG", &[("BB.02", 5)]),
        ];

        let csv = build_csv(&reports).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "employee;tariff;totalMinutes",
                "ADAM BERG;BB.02;5",
                "ZOE MÜLLER;AA.01;20",
                "ZOE MÜLLER;CC.03;10",
            ]
        );
    }

    #[test]
    fn test_quoting_only_when_necessary() {
        let reports = vec![report("DOE; JANE", &[("AA.01", 30)])];

        let csv = build_csv(&reports).unwrap();
        assert_eq!(csv, "employee;tariff;totalMinutes\n\"DOE; JANE\";AA.01;30\n");
    }

    #[test]
    fn test_empty_reports_header_only() {
        let csv = build_csv(&[]).unwrap();
        assert_eq!(csv, "employee;tariff;totalMinutes\n");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("2024-03"), "calculateur-2024-03.csv");
    }
}
