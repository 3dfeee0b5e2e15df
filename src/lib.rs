// Calculateur - Core Library
// Aggregates billed minutes per employee and tariff from scheduler exports,
// infers professions and flags billing-rule violations

pub mod catalog;
pub mod parser;
pub mod aggregate;
pub mod profession;
pub mod rules;
pub mod export;
pub mod session;

// Re-export commonly used types
pub use catalog::{Tariff, TariffCatalog};
pub use parser::{
    parse_row, parse_text, NormalizedRecord, ParseOutcome, RowOutcome,
    EMPLOYEE_COLUMN, TARIFF_COLUMN, TIMESTAMP_COLUMN,
};
pub use aggregate::{
    build_reports, group_by_employee, sum_by_tariff, EmployeeReport, TariffSum, TariffSums,
};
pub use profession::{guess_profession, UNKNOWN_PROFESSION};
pub use rules::{check_violations, Violation};
pub use export::{build_csv, export_file_name};
pub use session::{decode_latin1, ParseStats, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
