// ⚖️ Billing Rule Checker
// Validates per-employee tariff sums against catalog constraints

use crate::aggregate::TariffSums;
use serde::Serialize;

// ============================================================================
// VIOLATION
// ============================================================================

/// One flagged mismatch between recorded billing and tariff rules.
/// Computed fresh per report generation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub tariff: String,
    pub minutes: u32,
    pub message: String,
}

// ============================================================================
// RULE CHECKS
// ============================================================================

/// Check one employee's sums against the tariff rules.
///
/// Two rules, both only for tariffs with known catalog metadata:
/// - the minute cap, enforced on the monthly aggregate the user sees
///   rather than on individual entries;
/// - profession eligibility for restricted tariffs.
///
/// Unknown codes and unrestricted tariffs never produce violations.
/// Output order follows the iteration order of `sums`.
pub fn check_violations(profession: &str, sums: &TariffSums) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (code, sum) in sums {
        let Some(tariff) = &sum.tariff else { continue };

        if let Some(max_minutes) = tariff.max_minutes {
            if sum.minutes > max_minutes {
                violations.push(Violation {
                    tariff: code.clone(),
                    minutes: sum.minutes,
                    message: format!(
                        "Es können max. {} Minuten für Tarif {} abgerechnet werden",
                        max_minutes, code
                    ),
                });
            }
        }

        if tariff.is_restricted() && !tariff.professions.iter().any(|p| p == profession) {
            violations.push(Violation {
                tariff: code.clone(),
                minutes: sum.minutes,
                message: format!("Tarif {} passt nicht zum Beruf {}", code, profession),
            });
        }
    }

    violations
}

// ============================================================================
// TESTS
// ============================================================================
