//! Bundled threat reference catalog.
//!
//! Stores that have no catalog of their own fall back to this one.

use serde::Deserialize;
use site_risk_intelligence_models::ThreatDefinition;

use crate::IntelligenceError;

/// Embedded threat catalog.
const THREAT_CATALOG_TOML: &str = include_str!("../data/threat_catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogConfig {
    threats: Vec<ThreatEntry>,
}

#[derive(Debug, Deserialize)]
struct ThreatEntry {
    name: String,
    category: String,
    typical_likelihood: String,
}

impl From<ThreatEntry> for ThreatDefinition {
    fn from(entry: ThreatEntry) -> Self {
        Self {
            name: entry.name,
            category: entry.category,
            typical_likelihood: entry.typical_likelihood,
        }
    }
}

/// Parses a catalog from TOML with a `[[threats]]` array.
///
/// # Errors
///
/// Returns [`IntelligenceError::Toml`] if the TOML is malformed.
pub fn parse_catalog_toml(toml_str: &str) -> Result<Vec<ThreatDefinition>, IntelligenceError> {
    let config: CatalogConfig = toml::de::from_str(toml_str)?;
    Ok(config.threats.into_iter().map(ThreatDefinition::from).collect())
}

/// Returns the catalog compiled into the binary.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn bundled_catalog() -> Vec<ThreatDefinition> {
    parse_catalog_toml(THREAT_CATALOG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse threat_catalog.toml: {e}"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use site_risk_crime_models::SeverityTier;

    use super::*;

    #[test]
    fn loads_bundled_catalog() {
        let catalog = bundled_catalog();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn threat_names_are_unique() {
        let catalog = bundled_catalog();
        let mut seen = BTreeSet::new();
        for threat in &catalog {
            assert!(seen.insert(&threat.name), "Duplicate threat: {}", threat.name);
        }
    }

    #[test]
    fn typical_likelihoods_are_valid_tiers() {
        for threat in &bundled_catalog() {
            assert!(
                threat.typical_likelihood.parse::<SeverityTier>().is_ok(),
                "{}: bad likelihood '{}'",
                threat.name,
                threat.typical_likelihood
            );
        }
    }
}
