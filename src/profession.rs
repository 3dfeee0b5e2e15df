// 🩺 Profession Classifier
// Majority heuristic over the tariff codes an employee billed

use crate::aggregate::TariffSums;
use indexmap::IndexMap;

/// Distinguished label for "could not settle on a profession"
pub const UNKNOWN_PROFESSION: &str = "Unbekannt";

/// Infer a profession from an employee's tariff sums.
///
/// Every known tariff restricted to exactly one profession scores one
/// point for it. Unrestricted tariffs, tariffs open to several
/// professions, and unknown codes carry no signal. No score at all, or a
/// tie at the top, yields `"Unbekannt"` rather than a guess.
///
/// This is approximate by design; it never errors.
pub fn guess_profession(sums: &TariffSums) -> String {
    let mut scores: IndexMap<&str, u32> = IndexMap::new();

    for sum in sums.values() {
        let Some(tariff) = &sum.tariff else { continue };
        if let [profession] = tariff.professions.as_slice() {
            *scores.entry(profession.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u32)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    if ranked.is_empty() || (ranked.len() >= 2 && ranked[0].1 == ranked[1].1) {
        return UNKNOWN_PROFESSION.to_string();
    }

    ranked[0].0.to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TariffSum;
    use crate::catalog::Tariff;

    fn sum_for(code: &str, professions: &[&str]) -> (String, TariffSum) {
        (
            code.to_string(),
            TariffSum {
                minutes: 30,
                tariff: Some(Tariff {
                    tardoc: code.to_string(),
                    tarmed: None,
                    professions: professions.iter().map(|p| p.to_string()).collect(),
                    description: String::new(),
                    max_minutes: None,
                    presence: None,
                }),
            },
        )
    }

    fn unknown_sum(code: &str) -> (String, TariffSum) {
        (
            code.to_string(),
            TariffSum {
                minutes: 30,
                tariff: None,
            },
        )
    }

    #[test]
    fn test_single_profession_wins() {
        let sums: TariffSums = [
            sum_for("AA.01", &["Arzt"]),
            sum_for("AA.02", &["Arzt"]),
            sum_for("CG.01", &["Psychologe"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(guess_profession(&sums), "Arzt");
    }

    #[test]
    fn test_tie_is_unknown_even_with_lower_third() {
        let sums: TariffSums = [
            sum_for("AA.01", &["Arzt"]),
            sum_for("AA.02", &["Arzt"]),
            sum_for("CG.01", &["Psychologe"]),
            sum_for("CG.02", &["Psychologe"]),
            sum_for("DF.01", &["Physiotherapeut"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(guess_profession(&sums), UNKNOWN_PROFESSION);
    }

    #[test]
    fn test_no_signal_is_unknown() {
        // Unrestricted and multi-profession tariffs carry no signal
        let sums: TariffSums = [
            sum_for("AG.01", &[]),
            sum_for("CG.15", &["Arzt", "Psychologe"]),
            unknown_sum("ZZ.99"),
        ]
        .into_iter()
        .collect();

        assert_eq!(guess_profession(&sums), UNKNOWN_PROFESSION);
    }

    #[test]
    fn test_empty_sums_is_unknown() {
        let sums = TariffSums::new();
        assert_eq!(guess_profession(&sums), UNKNOWN_PROFESSION);
    }

    #[test]
    fn test_unknown_tariffs_do_not_score() {
        let sums: TariffSums = [
            sum_for("AA.01", &["Arzt"]),
            unknown_sum("ZZ.98"),
            unknown_sum("ZZ.99"),
        ]
        .into_iter()
        .collect();

        assert_eq!(guess_profession(&sums), "Arzt");
    }
}
