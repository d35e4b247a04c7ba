//! Population estimation for sources that publish counts without rates.
//!
//! Rates are backfilled best-effort: first from the sibling category's
//! published rate, then from a [`PopulationLookup`] keyed by city. When
//! both fail the rate stays unknown and severity falls back to absolute
//! counts.

use std::collections::BTreeMap;

use serde::Deserialize;
use site_risk_crime_models::{CrimeCounts, CrimeType};

use crate::IntelligenceError;
use crate::severity::usable_rate;

const PER_100K: f64 = 100_000.0;

/// Resolves a jurisdiction name to a population.
pub trait PopulationLookup: Send + Sync {
    /// Returns the population for `city_key`, if known.
    ///
    /// Implementations should ignore case and surrounding whitespace.
    fn population_of(&self, city_key: &str) -> Option<u64>;
}

#[derive(Debug, Deserialize)]
struct PopulationTableConfig {
    cities: BTreeMap<String, u64>,
}

/// Embedded city population table.
const CITY_POPULATIONS_TOML: &str = include_str!("../data/city_populations.toml");

/// A fixed city-name to population map.
#[derive(Debug, Clone, Default)]
pub struct StaticPopulationTable {
    cities: BTreeMap<String, u64>,
}

impl StaticPopulationTable {
    /// Parses a table from TOML with a `[cities]` section.
    ///
    /// # Errors
    ///
    /// Returns [`IntelligenceError::Toml`] if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, IntelligenceError> {
        let config: PopulationTableConfig = toml::de::from_str(toml_str)?;
        Ok(Self::from_entries(config.cities))
    }

    /// Builds a table from `(city, population)` pairs.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            cities: entries
                .into_iter()
                .map(|(city, population)| (normalize_city(&city), population))
                .collect(),
        }
    }

    /// Returns the table compiled into the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so this is caught by the tests below.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_toml(CITY_POPULATIONS_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse city_populations.toml: {e}"))
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl PopulationLookup for StaticPopulationTable {
    fn population_of(&self, city_key: &str) -> Option<u64> {
        self.cities.get(&normalize_city(city_key)).copied()
    }
}

fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Rates after backfilling, plus the population used, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackfilledRates {
    /// Violent crimes per 100k residents.
    pub violent_rate: Option<f64>,
    /// Property crimes per 100k residents.
    pub property_rate: Option<f64>,
    /// Population the missing rates were derived from.
    pub population: Option<f64>,
}

impl BackfilledRates {
    fn rate_mut(&mut self, crime_type: CrimeType) -> &mut Option<f64> {
        match crime_type {
            CrimeType::Violent => &mut self.violent_rate,
            CrimeType::Property => &mut self.property_rate,
        }
    }

    fn any_missing(&self) -> bool {
        self.violent_rate.is_none() || self.property_rate.is_none()
    }

    fn fill_missing(&mut self, violent: &CrimeCounts, property: &CrimeCounts, population: f64) {
        for (crime_type, counts) in [(CrimeType::Violent, violent), (CrimeType::Property, property)]
        {
            let rate = self.rate_mut(crime_type);
            if rate.is_none() {
                *rate = Some(rate_for(counts.total, population));
            }
        }
        self.population = Some(population);
    }
}

#[allow(clippy::cast_precision_loss)]
fn rate_for(total: u64, population: f64) -> f64 {
    total as f64 / population * PER_100K
}

/// Derives population from a category with both a rate and a total.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_from_rate(counts: &CrimeCounts) -> Option<f64> {
    let rate = usable_rate(counts.rate_per_100k)?;
    (counts.total > 0).then(|| counts.total as f64 / rate * PER_100K)
}

/// Fills in missing violent/property rates.
///
/// 1. If either category has a usable rate and a nonzero total, the
///    population it implies is used for the other category.
/// 2. Otherwise, if `city` resolves through `lookup`, that population is
///    used for every missing rate.
/// 3. Otherwise missing rates stay `None`.
#[must_use]
pub fn backfill_rates(
    violent: &CrimeCounts,
    property: &CrimeCounts,
    city: Option<&str>,
    lookup: &dyn PopulationLookup,
) -> BackfilledRates {
    let mut rates = BackfilledRates {
        violent_rate: usable_rate(violent.rate_per_100k),
        property_rate: usable_rate(property.rate_per_100k),
        population: None,
    };

    if let Some(population) = population_from_rate(violent).or_else(|| population_from_rate(property))
    {
        if rates.any_missing() {
            log::debug!("Backfilling crime rate from sibling category (population {population:.0})");
        }
        rates.fill_missing(violent, property, population);
        return rates;
    }

    if !rates.any_missing() {
        return rates;
    }

    let Some(city) = city.filter(|c| !c.trim().is_empty()) else {
        return rates;
    };

    match lookup.population_of(city) {
        Some(population) if population > 0 => {
            log::debug!("Backfilling crime rates from population table: {city} = {population}");
            #[allow(clippy::cast_precision_loss)]
            let population = population as f64;
            rates.fill_missing(violent, property, population);
        }
        _ => {
            log::debug!("No population known for '{city}'; severity will use absolute counts");
        }
    }

    rates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(total: u64, rate: Option<f64>) -> CrimeCounts {
        CrimeCounts {
            total,
            rate_per_100k: rate,
        }
    }

    #[test]
    fn bundled_table_loads() {
        let table = StaticPopulationTable::bundled();
        assert!(!table.is_empty());
        assert_eq!(table.population_of("chicago"), Some(2_746_388));
    }

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let table = StaticPopulationTable::bundled();
        assert_eq!(table.population_of("  Chicago "), Some(2_746_388));
        assert_eq!(table.population_of("NEW YORK"), Some(8_804_190));
        assert_eq!(table.population_of("Smallville"), None);
    }

    #[test]
    fn sibling_rate_backfills_missing_rate() {
        // 500 violent at 50/100k implies 1,000,000 residents.
        let rates = backfill_rates(
            &counts(500, Some(50.0)),
            &counts(3000, None),
            None,
            &StaticPopulationTable::default(),
        );
        assert_eq!(rates.violent_rate, Some(50.0));
        let property = rates.property_rate.unwrap();
        assert!((property - 300.0).abs() < 1e-9);
        assert!((rates.population.unwrap() - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn property_rate_can_backfill_violent() {
        let rates = backfill_rates(
            &counts(200, None),
            &counts(4000, Some(400.0)),
            Some("chicago"),
            &StaticPopulationTable::bundled(),
        );
        // Sibling derivation wins over the city table.
        assert!((rates.violent_rate.unwrap() - 20.0).abs() < 1e-9);
        assert!((rates.population.unwrap() - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn city_table_backfills_both_rates() {
        let rates = backfill_rates(
            &counts(600, None),
            &counts(0, None),
            Some("chicago"),
            &StaticPopulationTable::bundled(),
        );
        let violent = rates.violent_rate.unwrap();
        assert!((violent - 21.847).abs() < 0.01, "got {violent}");
        assert_eq!(rates.property_rate, Some(0.0));
        assert!((rates.population.unwrap() - 2_746_388.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_city_leaves_rates_missing() {
        let rates = backfill_rates(
            &counts(600, None),
            &counts(900, None),
            Some("Smallville"),
            &StaticPopulationTable::bundled(),
        );
        assert_eq!(rates.violent_rate, None);
        assert_eq!(rates.property_rate, None);
        assert_eq!(rates.population, None);
    }

    #[test]
    fn published_rates_are_kept() {
        let rates = backfill_rates(
            &counts(0, Some(120.0)),
            &counts(0, Some(900.0)),
            Some("chicago"),
            &StaticPopulationTable::bundled(),
        );
        assert_eq!(rates.violent_rate, Some(120.0));
        assert_eq!(rates.property_rate, Some(900.0));
        assert_eq!(rates.population, None);
    }
}
