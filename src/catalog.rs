// 📚 Tariff Catalog - Reference Data as Data
// Static TARDOC/TARMED lookup table, loaded once and immutable

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Built-in reference dataset, embedded at compile time
const BUILTIN_TARIFFS: &str = include_str!("../data/tariffs.json");

// ============================================================================
// TARIFF DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    /// Primary code (TARDOC scheme)
    pub tardoc: String,

    /// Alternate code (TARMED scheme), when the position also exists there
    pub tarmed: Option<String>,

    /// Professions allowed to bill this position (empty = unrestricted)
    pub professions: Vec<String>,

    /// Human-readable description for the report
    pub description: String,

    /// Ceiling on billed minutes per employee and month (None = unbounded)
    #[serde(rename = "maxMinutes")]
    pub max_minutes: Option<u32>,

    /// Whether the position requires patient presence (None = unknown)
    pub presence: Option<bool>,
}

impl Tariff {
    /// A tariff with a non-empty profession list may only be billed
    /// by one of those professions
    pub fn is_restricted(&self) -> bool {
        !self.professions.is_empty()
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Process-wide tariff reference table. Loaded once at startup, never
/// mutated afterwards. Codes are disjoint across entries by construction
/// of the dataset, so a lookup matches at most one tariff.
pub struct TariffCatalog {
    tariffs: Vec<Tariff>,
}

impl TariffCatalog {
    /// Catalog from the embedded reference dataset
    pub fn builtin() -> Self {
        let tariffs: Vec<Tariff> = serde_json::from_str(BUILTIN_TARIFFS)
            .expect("embedded tariff dataset is valid JSON");
        TariffCatalog { tariffs }
    }

    /// Catalog from an external JSON file (same shape as the built-in data)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read tariff file: {:?}", path.as_ref()))?;

        let tariffs: Vec<Tariff> = serde_json::from_str(&content)
            .context("Failed to parse tariff JSON")?;

        Ok(TariffCatalog { tariffs })
    }

    /// Catalog from an in-memory list
    pub fn from_tariffs(tariffs: Vec<Tariff>) -> Self {
        TariffCatalog { tariffs }
    }

    /// Exact-match lookup against either coding scheme
    pub fn lookup(&self, code: &str) -> Option<&Tariff> {
        self.tariffs
            .iter()
            .find(|t| t.tardoc == code || t.tarmed.as_deref() == Some(code))
    }

    /// Number of tariffs loaded
    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tariff() -> Tariff {
        Tariff {
            tardoc: "AA.00.0020".to_string(),
            tarmed: Some("00.0020".to_string()),
            professions: vec!["Arzt".to_string()],
            description: "Konsultation, jede weitere 1 Min.".to_string(),
            max_minutes: Some(120),
            presence: Some(true),
        }
    }

    #[test]
    fn test_lookup_by_primary_code() {
        let catalog = TariffCatalog::from_tariffs(vec![sample_tariff()]);

        let found = catalog.lookup("AA.00.0020");
        assert!(found.is_some());
        assert_eq!(found.unwrap().max_minutes, Some(120));
    }

    #[test]
    fn test_lookup_by_alternate_code() {
        let catalog = TariffCatalog::from_tariffs(vec![sample_tariff()]);

        let found = catalog.lookup("00.0020");
        assert!(found.is_some());
        assert_eq!(found.unwrap().tardoc, "AA.00.0020");
    }

    #[test]
    fn test_lookup_unknown_code() {
        let catalog = TariffCatalog::from_tariffs(vec![sample_tariff()]);

        assert!(catalog.lookup("ZZ.99.9999").is_none());
    }

    #[test]
    fn test_lookup_without_alternate_code() {
        let tariff = Tariff {
            tarmed: None,
            ..sample_tariff()
        };
        let catalog = TariffCatalog::from_tariffs(vec![tariff]);

        assert!(catalog.lookup("AA.00.0020").is_some());
        assert!(catalog.lookup("00.0020").is_none());
    }

    #[test]
    fn test_builtin_dataset_loads() {
        let catalog = TariffCatalog::builtin();

        assert!(!catalog.is_empty());
        // Spot-check one entry reachable under both schemes
        let by_tardoc = catalog.lookup("AA.00.0010").expect("tardoc lookup");
        let by_tarmed = catalog.lookup("00.0010").expect("tarmed lookup");
        assert_eq!(by_tardoc, by_tarmed);
    }

    #[test]
    fn test_restriction_flag() {
        let restricted = sample_tariff();
        let unrestricted = Tariff {
            professions: vec![],
            ..sample_tariff()
        };

        assert!(restricted.is_restricted());
        assert!(!unrestricted.is_restricted());
    }
}
